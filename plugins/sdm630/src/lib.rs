//! Eastron SDM630 三相电能表插件
//!
//! 通过 Modbus RTU 读取输入寄存器（float32，高字在前），
//! 接入方式为串口、USB 列表设备或 HF2211 网关。

use async_trait::async_trait;
use solar_core::{ProviderError, Result};
use solar_modbus::{ModbusConfigurationBuilder, ModbusConnectionFactory};
use solar_protocol::{KnownProtocol, Setting, SupportedInterface};
use solar_provider::base::ModbusConnectionFactoryRef;
use solar_provider::{
    EmbeddedResources, HtmlInputType, HtmlWidth, ModbusProviderBase, PluginMetadata,
    PluginRegistry, Provider, ProviderData, ProviderProperty, ResourceBundle, Table,
    UiInputElementBuilder, UiList,
};
use solar_types::{Activity, TimeEvent, TimeUnit, Variables};
use std::sync::Arc;
use tracing::{debug, error, info};

pub const BUNDLE_NAME: &str = "sdm630";
pub const FIELDS_FILE: &str = "sdm630_fields.json";
pub const TABLES_FILE: &str = "sdm630_tables.json";

pub static METADATA: PluginMetadata = PluginMetadata {
    name: "Sdm630",
    version: "1.0.1",
    author: "Stefan Töngi",
    url: "https://github.com/solarreader-plugins/plugin-Sdm630",
    svg_image: "sdm630.svg",
    supported_interfaces: &[
        SupportedInterface::NamedUsb,
        SupportedInterface::ListedUsb,
        SupportedInterface::Hf2211,
    ],
    used_protocol: KnownProtocol::Modbus,
    supports: "SDM630",
};

static RESOURCE_FILES: &[(&str, &str)] = &[
    (FIELDS_FILE, include_str!("../resources/sdm630_fields.json")),
    (TABLES_FILE, include_str!("../resources/sdm630_tables.json")),
    ("sdm630.svg", include_str!("../resources/sdm630.svg")),
    ("i18n/sdm630_en.toml", include_str!("../resources/i18n/sdm630_en.toml")),
    ("i18n/sdm630_de.toml", include_str!("../resources/i18n/sdm630_de.toml")),
];

/// 插件内嵌的全部资源
pub fn resources() -> EmbeddedResources {
    EmbeddedResources::new(RESOURCE_FILES)
}

/// 在注册表中登记本插件
pub fn register(registry: &PluginRegistry) -> Result<()> {
    registry.register(&METADATA, || {
        let provider: Box<dyn Provider> = Box::new(Sdm630::new()?);
        Ok(provider)
    })
}

pub struct Sdm630 {
    base: ModbusProviderBase,
}

impl Sdm630 {
    /// 使用默认的 Modbus 连接工厂
    pub fn new() -> Result<Self> {
        Self::with_factory(Arc::new(ModbusConnectionFactory))
    }

    pub fn with_factory(connection_factory: ModbusConnectionFactoryRef) -> Result<Self> {
        let base = ModbusProviderBase::new(connection_factory, resources(), BUNDLE_NAME)?;
        debug!(plugin = %METADATA.name, "Instantiate provider");
        Ok(Self { base })
    }

    fn connection_error(&self) -> ProviderError {
        ProviderError::Connection(self.base.resource_bundle().get_string("sdm630.connection.error"))
    }
}

#[async_trait]
impl Provider for Sdm630 {
    fn metadata(&self) -> &'static PluginMetadata {
        &METADATA
    }

    fn plugin_resource_bundle(&self) -> &ResourceBundle {
        self.base.resource_bundle()
    }

    fn locale(&self) -> &str {
        self.base.locale()
    }

    fn set_locale(&mut self, locale: &str) -> Result<()> {
        self.base.set_locale(locale)
    }

    fn provider_data(&self) -> Option<&ProviderData> {
        self.base.provider_data()
    }

    fn set_provider_data(&mut self, data: ProviderData) {
        self.base.set_provider_data(data);
    }

    fn default_activity(&self) -> Activity {
        Activity::new(TimeEvent::Time, 0, TimeEvent::Time, 86399, 20, TimeUnit::Seconds)
    }

    fn provider_dialog(&self) -> Option<UiList> {
        let bundle = self.base.resource_bundle();
        let mut list = UiList::new();
        list.add_element(
            UiInputElementBuilder::new()
                .with_id("id-address")
                .with_required(true)
                .with_type(HtmlInputType::Text)
                .with_column_width(HtmlWidth::Half)
                .with_label(bundle.get_string("sdm630.address.text"))
                .with_name(Setting::PROVIDER_ADDRESS)
                .with_placeholder(bundle.get_string("sdm630.address.text"))
                .with_tooltip(bundle.get_string("sdm630.address.tooltip"))
                .with_invalid_feedback(bundle.get_string("sdm630.address.error"))
                .build(),
        );

        Some(list)
    }

    fn supported_properties(&self) -> Result<Option<Vec<ProviderProperty>>> {
        self.base.supported_properties_from_file(FIELDS_FILE)
    }

    fn default_tables(&self) -> Result<Option<Vec<Table>>> {
        self.base.default_tables_from_file(TABLES_FILE)
    }

    fn default_provider_setting(&self) -> Setting {
        ModbusConfigurationBuilder::new()
            .with_baudrate(19200)
            .with_rtu_encoding()
            .with_provider_address(1)
            .with_block_size(16)
            .build()
    }

    async fn test_provider_connection(&self, setting: &Setting) -> Result<String> {
        let outcome = match self.base.create_connection(setting) {
            Ok(mut connection) => {
                let connected = connection.connect().await;
                let released = ModbusProviderBase::release(connection.as_mut()).await;
                connected.and(released)
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                info!(plugin = %METADATA.name, "Connection test succeeded");
                Ok(String::new())
            }
            Err(e) => {
                error!(plugin = %METADATA.name, error = %e, "Connection test failed");
                Err(self.connection_error())
            }
        }
    }

    async fn do_on_first_run(&mut self) -> Result<()> {
        let properties = self.supported_properties()?.unwrap_or_default();
        let tables = self.default_tables()?.unwrap_or_default();
        self.base.do_standard_first_run(properties, tables)
    }

    async fn do_activity_work(&self, variables: &mut Variables) -> Result<bool> {
        let mut connection = self.base.connection()?;

        let result = match connection.connect().await {
            Ok(()) => {
                self.base
                    .do_standard_activity(connection.as_mut(), variables)
                    .await
            }
            Err(e) => Err(e),
        };

        // 采集失败时优先返回采集错误
        let released = ModbusProviderBase::release(connection.as_mut()).await;
        result.and(released).map(|()| true)
    }
}
