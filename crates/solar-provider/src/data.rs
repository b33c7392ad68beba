use crate::property::ProviderProperty;
use crate::table::Table;
use serde::{Deserialize, Serialize};
use solar_protocol::Setting;

/// Host 持有的 Provider 实例数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderData {
    pub name: String,
    pub plugin_name: String,
    pub setting: Setting,
    #[serde(default)]
    pub properties: Vec<ProviderProperty>,
    #[serde(default)]
    pub tables: Vec<Table>,
}

impl ProviderData {
    pub fn new(name: impl Into<String>, plugin_name: impl Into<String>, setting: Setting) -> Self {
        Self {
            name: name.into(),
            plugin_name: plugin_name.into(),
            setting,
            properties: Vec::new(),
            tables: Vec::new(),
        }
    }
}
