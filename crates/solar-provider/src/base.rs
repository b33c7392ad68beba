use crate::data::ProviderData;
use crate::i18n::{ResourceBundle, DEFAULT_LANGUAGE};
use crate::property::ProviderProperty;
use crate::resources::EmbeddedResources;
use crate::table::Table;
use solar_core::{ProviderError, Result};
use solar_modbus::types::{DEFAULT_BLOCK_SIZE, DEFAULT_READ_RETRIES};
use solar_modbus::{ModbusConnection, ReadBatch, ReadPlanner, RegisterCodec, RegisterSpan};
use solar_protocol::{ConnectionFactory, Setting};
use solar_types::Variables;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// 批次读取失败后的重试间隔
const RETRY_PAUSE: Duration = Duration::from_millis(100);

pub type ModbusConnectionFactoryRef = Arc<dyn ConnectionFactory<dyn ModbusConnection>>;

/// Modbus 插件的公共部分
///
/// 持有注入的连接工厂、嵌入资源、字符串表和 Host 下发的 [`ProviderData`]，
/// 并提供标准的首次运行与采集流程。
pub struct ModbusProviderBase {
    connection_factory: ModbusConnectionFactoryRef,
    resources: EmbeddedResources,
    bundle_name: &'static str,
    locale: String,
    resource_bundle: ResourceBundle,
    provider_data: Option<ProviderData>,
}

impl ModbusProviderBase {
    pub fn new(
        connection_factory: ModbusConnectionFactoryRef,
        resources: EmbeddedResources,
        bundle_name: &'static str,
    ) -> Result<Self> {
        let resource_bundle = ResourceBundle::load(&resources, bundle_name, DEFAULT_LANGUAGE)?;

        Ok(Self {
            connection_factory,
            resources,
            bundle_name,
            locale: DEFAULT_LANGUAGE.to_string(),
            resource_bundle,
            provider_data: None,
        })
    }

    pub fn resources(&self) -> &EmbeddedResources {
        &self.resources
    }

    pub fn resource_bundle(&self) -> &ResourceBundle {
        &self.resource_bundle
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn set_locale(&mut self, locale: &str) -> Result<()> {
        self.resource_bundle = ResourceBundle::load(&self.resources, self.bundle_name, locale)?;
        self.locale = locale.to_string();
        debug!(
            locale = %self.locale,
            language = %self.resource_bundle.language(),
            "Locale changed"
        );
        Ok(())
    }

    pub fn provider_data(&self) -> Option<&ProviderData> {
        self.provider_data.as_ref()
    }

    pub fn set_provider_data(&mut self, data: ProviderData) {
        self.provider_data = Some(data);
    }

    fn require_provider_data(&self) -> Result<&ProviderData> {
        self.provider_data
            .as_ref()
            .ok_or_else(|| ProviderError::NotInitialized("provider data is not set".to_string()))
    }

    /// 用指定配置创建连接（未打开）
    pub fn create_connection(&self, setting: &Setting) -> Result<Box<dyn ModbusConnection>> {
        self.connection_factory.create_connection(setting)
    }

    /// 用 Provider 自身配置创建连接（未打开）
    pub fn connection(&self) -> Result<Box<dyn ModbusConnection>> {
        let data = self.require_provider_data()?;
        self.create_connection(&data.setting)
    }

    /// 关闭连接；关闭失败返回给调用方
    pub async fn release(connection: &mut dyn ModbusConnection) -> Result<()> {
        connection.close().await.map_err(|e| {
            warn!(error = %e, "Failed to close connection");
            e
        })
    }

    pub fn supported_properties_from_file(&self, file: &str) -> Result<Option<Vec<ProviderProperty>>> {
        self.resources.load_json(file).map(Some)
    }

    pub fn default_tables_from_file(&self, file: &str) -> Result<Option<Vec<Table>>> {
        self.resources.load_json(file).map(Some)
    }

    /// 标准首次运行：校验并保存字段与表格
    ///
    /// 同名字段只保留第一个；表格中引用未知字段的单元格被清空。
    pub fn do_standard_first_run(
        &mut self,
        properties: Vec<ProviderProperty>,
        mut tables: Vec<Table>,
    ) -> Result<()> {
        let data = self
            .provider_data
            .as_mut()
            .ok_or_else(|| ProviderError::NotInitialized("provider data is not set".to_string()))?;

        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(properties.len());
        for property in properties {
            if seen.insert(property.name.clone()) {
                unique.push(property);
            } else {
                warn!(field = %property.name, "Duplicate field definition ignored");
            }
        }

        let known: HashSet<&str> = unique.iter().map(|p| p.name.as_str()).collect();
        for table in &mut tables {
            for field in table.retain_known(&known) {
                warn!(table = %table.name, field = %field, "Table references unknown field");
            }
        }

        debug!(
            provider = %data.name,
            fields = unique.len(),
            tables = tables.len(),
            "Standard first run completed"
        );

        data.properties = unique;
        data.tables = tables;
        Ok(())
    }

    /// 标准采集：按块读取所有字段并写入 `variables`
    ///
    /// 连接须已打开；调用方负责关闭。
    pub async fn do_standard_activity(
        &self,
        connection: &mut dyn ModbusConnection,
        variables: &mut Variables,
    ) -> Result<()> {
        let data = self.require_provider_data()?;
        if data.properties.is_empty() {
            return Err(ProviderError::NotInitialized(
                "no fields configured, first run has not completed".to_string(),
            ));
        }

        let block_size = data.setting.block_size.unwrap_or(DEFAULT_BLOCK_SIZE);
        let retries = data.setting.read_retries.unwrap_or(DEFAULT_READ_RETRIES);

        let spans: Vec<RegisterSpan> = data.properties.iter().map(ProviderProperty::span).collect();
        let batches = ReadPlanner::plan(&spans, block_size, block_size);

        for batch in &batches {
            let words = read_batch(connection, batch, retries).await?;

            for &idx in &batch.members {
                let property = &data.properties[idx];
                let slice = batch.slice(&words, &spans[idx]).ok_or_else(|| {
                    ProviderError::modbus(format!(
                        "Short response for {}: got {} registers from {}",
                        property.name,
                        words.len(),
                        batch.start
                    ))
                })?;

                let value = RegisterCodec::decode_scaled(
                    slice,
                    property.data_type,
                    property.factor,
                    property.decimals,
                )?;

                variables.insert(
                    property.name.clone(),
                    value.map(serde_json::Value::from).unwrap_or(serde_json::Value::Null),
                );
            }
        }

        debug!(
            provider = %data.name,
            batches = batches.len(),
            fields = data.properties.len(),
            "Standard activity completed"
        );

        Ok(())
    }
}

async fn read_batch(
    connection: &mut dyn ModbusConnection,
    batch: &ReadBatch,
    retries: u32,
) -> Result<Vec<u16>> {
    let mut attempt = 0u32;
    loop {
        match connection
            .read_registers(batch.register_type, batch.start, batch.quantity)
            .await
        {
            Ok(words) => return Ok(words),
            Err(e) if e.is_transient() && attempt < retries => {
                attempt += 1;
                warn!(
                    start = batch.start,
                    quantity = batch.quantity,
                    attempt = attempt,
                    error = %e,
                    "Register read failed, retrying"
                );
                tokio::time::sleep(RETRY_PAUSE).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use solar_modbus::{DataType, RegisterType};
    use solar_protocol::Connection;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static FILES: &[(&str, &str)] = &[
        ("i18n/demo_en.toml", "[demo]\nname = \"Demo\"\n"),
        (
            "demo_fields.json",
            r#"[{ "name": "Voltage", "address": 0, "data_type": "float32" }]"#,
        ),
    ];

    /// 内存中的寄存器表
    struct MemoryConnection {
        registers: HashMap<u16, u16>,
        failures_left: Arc<AtomicUsize>,
        reads: Arc<AtomicUsize>,
        connected: bool,
    }

    #[async_trait]
    impl Connection for MemoryConnection {
        async fn connect(&mut self) -> Result<()> {
            self.connected = true;
            Ok(())
        }

        async fn close(&mut self) -> Result<()> {
            self.connected = false;
            Ok(())
        }

        fn is_connected(&self) -> bool {
            self.connected
        }
    }

    #[async_trait]
    impl ModbusConnection for MemoryConnection {
        async fn read_input_registers(&mut self, addr: u16, count: u16) -> Result<Vec<u16>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(ProviderError::modbus("checksum mismatch"));
            }
            Ok((addr..addr + count)
                .map(|a| self.registers.get(&a).copied().unwrap_or(0))
                .collect())
        }

        async fn read_holding_registers(&mut self, _addr: u16, _count: u16) -> Result<Vec<u16>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::Exception("IllegalFunction".to_string()))
        }
    }

    fn memory_connection(values: &[(u16, f32)], failures: usize) -> (MemoryConnection, Arc<AtomicUsize>) {
        let mut registers = HashMap::new();
        for &(addr, value) in values {
            let bits = value.to_bits();
            registers.insert(addr, (bits >> 16) as u16);
            registers.insert(addr + 1, (bits & 0xFFFF) as u16);
        }
        let reads = Arc::new(AtomicUsize::new(0));
        (
            MemoryConnection {
                registers,
                failures_left: Arc::new(AtomicUsize::new(failures)),
                reads: reads.clone(),
                connected: true,
            },
            reads,
        )
    }

    fn float_property(name: &str, address: u16) -> ProviderProperty {
        ProviderProperty {
            name: name.to_string(),
            address,
            register_type: RegisterType::Input,
            data_type: DataType::Float32,
            unit: None,
            factor: None,
            decimals: Some(1),
        }
    }

    fn base() -> ModbusProviderBase {
        let factory: ModbusConnectionFactoryRef = Arc::new(|_: &Setting| -> Result<Box<dyn ModbusConnection>> {
            Err(ProviderError::config("unused"))
        });
        ModbusProviderBase::new(factory, EmbeddedResources::new(FILES), "demo").unwrap()
    }

    fn initialized_base(block_size: u16) -> ModbusProviderBase {
        let mut base = base();
        let setting = Setting {
            block_size: Some(block_size),
            ..Default::default()
        };
        base.set_provider_data(ProviderData::new("demo", "Demo", setting));
        base.do_standard_first_run(
            vec![
                float_property("Voltage_L1", 0),
                float_property("Voltage_L2", 2),
                float_property("Frequency", 70),
            ],
            Vec::new(),
        )
        .unwrap();
        base
    }

    #[tokio::test]
    async fn test_standard_activity_fills_variables() {
        let base = initialized_base(16);
        let (mut conn, reads) = memory_connection(&[(0, 230.04), (2, 229.96), (70, 50.0)], 0);

        let mut variables = Variables::new();
        base.do_standard_activity(&mut conn, &mut variables).await.unwrap();

        assert_eq!(variables["Voltage_L1"], serde_json::json!(230.0));
        assert_eq!(variables["Voltage_L2"], serde_json::json!(230.0));
        assert_eq!(variables["Frequency"], serde_json::json!(50.0));
        // 0..4 一批，70..72 一批
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_standard_activity_retries_transient_errors() {
        let base = initialized_base(16);
        let (mut conn, reads) = memory_connection(&[(0, 1.0), (2, 2.0), (70, 3.0)], 2);

        let mut variables = Variables::new();
        base.do_standard_activity(&mut conn, &mut variables).await.unwrap();
        assert_eq!(variables.len(), 3);
        assert_eq!(reads.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_standard_activity_gives_up_after_retries() {
        let base = initialized_base(16);
        let (mut conn, _) = memory_connection(&[], 10);

        let mut variables = Variables::new();
        let err = base.do_standard_activity(&mut conn, &mut variables).await.unwrap_err();
        assert!(matches!(err, ProviderError::Modbus(_)));
        assert!(variables.is_empty());
    }

    #[tokio::test]
    async fn test_standard_activity_does_not_retry_exception_response() {
        let mut base = base();
        base.set_provider_data(ProviderData::new("demo", "Demo", Setting::default()));
        let mut property = float_property("Setpoint", 10);
        property.register_type = RegisterType::Holding;
        base.do_standard_first_run(vec![property], Vec::new()).unwrap();

        let (mut conn, reads) = memory_connection(&[], 0);
        let err = base
            .do_standard_activity(&mut conn, &mut Variables::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Exception(_)));
        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_release_reports_close_failure() {
        struct StuckPort;

        #[async_trait]
        impl Connection for StuckPort {
            async fn connect(&mut self) -> Result<()> {
                Ok(())
            }

            async fn close(&mut self) -> Result<()> {
                Err(ProviderError::Io(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "port busy",
                )))
            }

            fn is_connected(&self) -> bool {
                true
            }
        }

        #[async_trait]
        impl ModbusConnection for StuckPort {
            async fn read_input_registers(&mut self, _addr: u16, _count: u16) -> Result<Vec<u16>> {
                Ok(Vec::new())
            }

            async fn read_holding_registers(&mut self, _addr: u16, _count: u16) -> Result<Vec<u16>> {
                Ok(Vec::new())
            }
        }

        let err = ModbusProviderBase::release(&mut StuckPort).await.unwrap_err();
        assert!(matches!(err, ProviderError::Io(_)));

        let (mut conn, _) = memory_connection(&[], 0);
        ModbusProviderBase::release(&mut conn).await.unwrap();
        assert!(!conn.is_connected());
    }

    #[tokio::test]
    async fn test_standard_activity_requires_first_run() {
        let mut base = base();
        base.set_provider_data(ProviderData::new("demo", "Demo", Setting::default()));
        let (mut conn, _) = memory_connection(&[], 0);

        let err = base
            .do_standard_activity(&mut conn, &mut Variables::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotInitialized(_)));
    }

    #[test]
    fn test_first_run_drops_duplicates_and_unknown_cells() {
        let mut base = base();
        base.set_provider_data(ProviderData::new("demo", "Demo", Setting::default()));

        let table: Table = serde_json::from_value(serde_json::json!({
            "name": "t",
            "columns": ["a"],
            "rows": [{ "label": "r", "cells": ["Voltage_L1", "Ghost"] }]
        }))
        .unwrap();

        base.do_standard_first_run(
            vec![float_property("Voltage_L1", 0), float_property("Voltage_L1", 2)],
            vec![table],
        )
        .unwrap();

        let data = base.provider_data().unwrap();
        assert_eq!(data.properties.len(), 1);
        assert_eq!(data.properties[0].address, 0);
        assert_eq!(data.tables[0].rows[0].cells, vec![Some("Voltage_L1".to_string()), None]);
    }

    #[test]
    fn test_first_run_without_provider_data() {
        let mut base = base();
        assert!(matches!(
            base.do_standard_first_run(Vec::new(), Vec::new()),
            Err(ProviderError::NotInitialized(_))
        ));
        assert!(base.connection().is_err());
    }

    #[test]
    fn test_properties_from_file() {
        let base = base();
        let properties = base.supported_properties_from_file("demo_fields.json").unwrap().unwrap();
        assert_eq!(properties.len(), 1);
        assert!(matches!(
            base.default_tables_from_file("demo_tables.json"),
            Err(ProviderError::MissingResource(_))
        ));
    }
}
