use crate::client::{ModbusClient, ModbusTarget};
use crate::connection::ModbusConnection;
use crate::types::{DEFAULT_BAUDRATE, DEFAULT_SLAVE_ID, DEFAULT_TIMEOUT_MS};
use solar_core::{ProviderError, Result};
use solar_protocol::address::DEFAULT_BRIDGE_PORT;
use solar_protocol::{ConnectionFactory, ModbusEncoding, ProviderAddress, Setting, SupportedInterface};
use std::time::Duration;
use tracing::debug;

/// 默认连接工厂：根据 [`Setting`] 创建 [`ModbusClient`]
///
/// 只构造对象，不打开设备；打开发生在 `connect()`。
#[derive(Debug, Clone, Default)]
pub struct ModbusConnectionFactory;

impl ModbusConnectionFactory {
    pub fn new() -> Self {
        Self
    }

    /// 由配置解析连接目标
    pub fn resolve_target(setting: &Setting) -> Result<ModbusTarget> {
        let host = setting
            .provider_host
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ProviderError::config("provider_host is not configured"))?;

        let interface = setting.interface.unwrap_or(SupportedInterface::NamedUsb);

        let target = match interface {
            SupportedInterface::NamedUsb => ModbusTarget::Serial {
                path: host.to_string(),
            },
            SupportedInterface::ListedUsb => ModbusTarget::ListedSerial {
                name: host.to_string(),
            },
            SupportedInterface::Hf2211 => {
                let default_port = setting.provider_port.unwrap_or(DEFAULT_BRIDGE_PORT);
                let address = ProviderAddress::parse_network(host, default_port)?;
                debug!(bridge = %address, "Resolved HF2211 bridge address");
                ModbusTarget::Bridge {
                    host: address.host,
                    port: address.port,
                }
            }
        };

        Ok(target)
    }
}

impl ConnectionFactory<dyn ModbusConnection> for ModbusConnectionFactory {
    fn create_connection(&self, setting: &Setting) -> Result<Box<dyn ModbusConnection>> {
        match setting.encoding.unwrap_or(ModbusEncoding::Rtu) {
            ModbusEncoding::Rtu => {}
            other => {
                return Err(ProviderError::config(format!(
                    "Unsupported Modbus encoding: {:?}",
                    other
                )));
            }
        }

        let target = Self::resolve_target(setting)?;
        let interface = setting.interface.unwrap_or(SupportedInterface::NamedUsb);
        let baudrate = setting.baudrate.unwrap_or(DEFAULT_BAUDRATE);
        let slave_id = setting.provider_address.unwrap_or(DEFAULT_SLAVE_ID);
        let timeout = Duration::from_millis(setting.read_timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS));

        debug!(
            interface = %interface.as_str(),
            device = ?target,
            baudrate = %baudrate,
            slave_id = %slave_id,
            "Creating Modbus connection"
        );

        Ok(Box::new(ModbusClient::new(target, baudrate, slave_id, timeout)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ModbusConfigurationBuilder;

    #[test]
    fn test_named_usb_target() {
        let setting = ModbusConfigurationBuilder::new()
            .with_interface(SupportedInterface::NamedUsb)
            .with_provider_host("/dev/ttyUSB0")
            .build();
        assert_eq!(
            ModbusConnectionFactory::resolve_target(&setting).unwrap(),
            ModbusTarget::Serial {
                path: "/dev/ttyUSB0".to_string()
            }
        );
    }

    #[test]
    fn test_bridge_target_default_port() {
        let setting = ModbusConfigurationBuilder::new()
            .with_interface(SupportedInterface::Hf2211)
            .with_provider_host("192.168.1.50")
            .build();
        assert_eq!(
            ModbusConnectionFactory::resolve_target(&setting).unwrap(),
            ModbusTarget::Bridge {
                host: "192.168.1.50".to_string(),
                port: 8899
            }
        );
    }

    #[test]
    fn test_bridge_target_configured_port() {
        let setting = ModbusConfigurationBuilder::new()
            .with_interface(SupportedInterface::Hf2211)
            .with_provider_host("192.168.1.50")
            .with_provider_port(502)
            .build();
        assert_eq!(
            ModbusConnectionFactory::resolve_target(&setting).unwrap(),
            ModbusTarget::Bridge {
                host: "192.168.1.50".to_string(),
                port: 502
            }
        );
    }

    #[test]
    fn test_missing_host() {
        let setting = ModbusConfigurationBuilder::new().with_rtu_encoding().build();
        let err = ModbusConnectionFactory::new().create_connection(&setting).err().unwrap();
        assert!(matches!(err, ProviderError::Config(_)));
    }

    #[test]
    fn test_ascii_rejected() {
        let setting = ModbusConfigurationBuilder::new()
            .with_ascii_encoding()
            .with_provider_host("/dev/ttyUSB0")
            .build();
        let err = ModbusConnectionFactory::new().create_connection(&setting).err().unwrap();
        assert!(err.to_string().contains("Unsupported Modbus encoding"));
    }

    #[test]
    fn test_create_does_not_open() {
        let setting = ModbusConfigurationBuilder::new()
            .with_rtu_encoding()
            .with_provider_host("/dev/does-not-exist-sdm")
            .build();
        let conn = ModbusConnectionFactory::new().create_connection(&setting).unwrap();
        assert!(!conn.is_connected());
    }
}
