//! Provider 契约
//!
//! Host 通过 [`Provider`] 驱动插件：查询元数据与默认配置、测试连接、
//! 首次运行初始化以及周期性采集。Modbus 插件组合 [`ModbusProviderBase`]
//! 获得标准的首次运行与采集实现。

pub mod base;
pub mod data;
pub mod i18n;
pub mod metadata;
pub mod property;
pub mod provider;
pub mod registry;
pub mod resources;
pub mod table;
pub mod ui;

pub use base::ModbusProviderBase;
pub use data::ProviderData;
pub use i18n::ResourceBundle;
pub use metadata::PluginMetadata;
pub use property::ProviderProperty;
pub use provider::Provider;
pub use registry::PluginRegistry;
pub use resources::EmbeddedResources;
pub use table::{Table, TableRow};
pub use ui::{HtmlInputType, HtmlWidth, UiInputElement, UiInputElementBuilder, UiList};
