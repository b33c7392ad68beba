use serde::{Deserialize, Serialize};

/// 全局配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub system: SystemConfig,
}

/// 系统配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    pub name: String,
    /// 插件字符串表使用的语言，例如 "en"、"de-CH"
    pub locale: String,
    pub log_level: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            name: "solarreader".to_string(),
            locale: "en".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl GlobalConfig {
    /// 序列化为 TOML，供生成示例配置使用
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
