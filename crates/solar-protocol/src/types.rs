use serde::{Deserialize, Serialize};

/// 插件使用的协议
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnownProtocol {
    Modbus,
}

/// 设备接入方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportedInterface {
    /// 按路径指定的串口，例如 /dev/ttyUSB0
    NamedUsb,
    /// 从系统枚举的 USB 串口中选择
    ListedUsb,
    /// HF2211 以太网转 RS485 网关（TCP 透传 RTU 帧）
    Hf2211,
}

impl SupportedInterface {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "named_usb" | "namedusb" => Some(Self::NamedUsb),
            "listed_usb" | "listedusb" => Some(Self::ListedUsb),
            "hf2211" => Some(Self::Hf2211),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NamedUsb => "named_usb",
            Self::ListedUsb => "listed_usb",
            Self::Hf2211 => "hf2211",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_interface_from_str() {
        assert_eq!(SupportedInterface::from_str("named_usb"), Some(SupportedInterface::NamedUsb));
        assert_eq!(SupportedInterface::from_str("LISTED_USB"), Some(SupportedInterface::ListedUsb));
        assert_eq!(SupportedInterface::from_str("HF2211"), Some(SupportedInterface::Hf2211));
        assert_eq!(SupportedInterface::from_str("bluetooth"), None);
    }

    #[test]
    fn test_as_str_round_trips() {
        for iface in [
            SupportedInterface::NamedUsb,
            SupportedInterface::ListedUsb,
            SupportedInterface::Hf2211,
        ] {
            assert_eq!(SupportedInterface::from_str(iface.as_str()), Some(iface));
        }
        assert_eq!(serde_json::to_value(KnownProtocol::Modbus).unwrap(), "modbus");
    }
}
