use crate::types::SupportedInterface;
use serde::{Deserialize, Serialize};
use solar_core::{ProviderError, Result};

/// Modbus 帧格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModbusEncoding {
    Rtu,
    Ascii,
    Tcp,
}

impl ModbusEncoding {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rtu" => Some(Self::Rtu),
            "ascii" => Some(Self::Ascii),
            "tcp" => Some(Self::Tcp),
            _ => None,
        }
    }
}

/// Provider 连接配置
///
/// 由插件填充默认值，由 Host 持久化并交给连接工厂。
/// 所有字段可选，未设置时由使用方取默认值。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<SupportedInterface>,

    /// 串口路径、USB 设备名或网关主机
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_port: Option<u16>,

    /// Modbus 从站地址
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_address: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baudrate: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<ModbusEncoding>,

    /// 单次请求最多读取的寄存器数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_size: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_timeout_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_retries: Option<u32>,
}

impl Setting {
    pub const INTERFACE: &'static str = "interface";
    pub const PROVIDER_HOST: &'static str = "provider_host";
    pub const PROVIDER_PORT: &'static str = "provider_port";
    pub const PROVIDER_ADDRESS: &'static str = "provider_address";
    pub const BAUDRATE: &'static str = "baudrate";
    pub const ENCODING: &'static str = "encoding";
    pub const BLOCK_SIZE: &'static str = "block_size";
    pub const READ_TIMEOUT_MS: &'static str = "read_timeout_ms";
    pub const READ_RETRIES: &'static str = "read_retries";

    pub const MAX_BLOCK_SIZE: u16 = 125;

    /// 将 UI 表单提交的值写入对应字段
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            Self::INTERFACE => {
                let iface = SupportedInterface::from_str(value).ok_or_else(|| {
                    ProviderError::invalid_input(format!("Unknown interface: {}", value))
                })?;
                self.interface = Some(iface);
            }
            Self::PROVIDER_HOST => {
                if value.is_empty() {
                    return Err(ProviderError::invalid_input("provider_host must not be empty"));
                }
                self.provider_host = Some(value.to_string());
            }
            Self::PROVIDER_PORT => {
                self.provider_port = Some(parse_number(key, value)?);
            }
            Self::PROVIDER_ADDRESS => {
                let address: u8 = parse_number(key, value)?;
                if !(1..=247).contains(&address) {
                    return Err(ProviderError::invalid_input(format!(
                        "provider_address must be within 1..=247, got {}",
                        address
                    )));
                }
                self.provider_address = Some(address);
            }
            Self::BAUDRATE => {
                let baudrate: u32 = parse_number(key, value)?;
                if baudrate == 0 {
                    return Err(ProviderError::invalid_input("baudrate must be greater than 0"));
                }
                self.baudrate = Some(baudrate);
            }
            Self::ENCODING => {
                let encoding = ModbusEncoding::from_str(value).ok_or_else(|| {
                    ProviderError::invalid_input(format!("Unknown encoding: {}", value))
                })?;
                self.encoding = Some(encoding);
            }
            Self::BLOCK_SIZE => {
                let block_size: u16 = parse_number(key, value)?;
                if block_size == 0 || block_size > Self::MAX_BLOCK_SIZE {
                    return Err(ProviderError::invalid_input(format!(
                        "block_size must be within 1..={}, got {}",
                        Self::MAX_BLOCK_SIZE,
                        block_size
                    )));
                }
                self.block_size = Some(block_size);
            }
            Self::READ_TIMEOUT_MS => {
                self.read_timeout_ms = Some(parse_number(key, value)?);
            }
            Self::READ_RETRIES => {
                self.read_retries = Some(parse_number(key, value)?);
            }
            _ => {
                return Err(ProviderError::invalid_input(format!("Unknown setting key: {}", key)));
            }
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| ProviderError::invalid_input(format!("Invalid number for {}: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_provider_address() {
        let mut setting = Setting::default();
        setting.apply(Setting::PROVIDER_ADDRESS, " 12 ").unwrap();
        assert_eq!(setting.provider_address, Some(12));

        assert!(setting.apply(Setting::PROVIDER_ADDRESS, "0").is_err());
        assert!(setting.apply(Setting::PROVIDER_ADDRESS, "248").is_err());
        assert!(setting.apply(Setting::PROVIDER_ADDRESS, "abc").is_err());
        assert_eq!(setting.provider_address, Some(12));
    }

    #[test]
    fn test_apply_block_size_bounds() {
        let mut setting = Setting::default();
        assert!(setting.apply(Setting::BLOCK_SIZE, "0").is_err());
        assert!(setting.apply(Setting::BLOCK_SIZE, "126").is_err());
        setting.apply(Setting::BLOCK_SIZE, "125").unwrap();
        assert_eq!(setting.block_size, Some(125));
    }

    #[test]
    fn test_apply_encoding_and_interface() {
        let mut setting = Setting::default();
        setting.apply(Setting::ENCODING, "RTU").unwrap();
        setting.apply(Setting::INTERFACE, "hf2211").unwrap();
        assert_eq!(setting.encoding, Some(ModbusEncoding::Rtu));
        assert_eq!(setting.interface, Some(SupportedInterface::Hf2211));
        assert!(setting.apply(Setting::ENCODING, "binary").is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut setting = Setting::default();
        let err = setting.apply("colour", "blue").unwrap_err();
        assert!(err.to_string().contains("Unknown setting key"));
    }

    #[test]
    fn test_serialize_skips_unset_fields() {
        let setting = Setting {
            baudrate: Some(9600),
            ..Default::default()
        };
        let json = serde_json::to_value(&setting).unwrap();
        assert_eq!(json, serde_json::json!({ "baudrate": 9600 }));
    }
}
