use serde::{Deserialize, Serialize};
use solar_core::{ProviderError, Result};
use std::fmt;
use url::Url;

/// HF2211 网关透传端口
pub const DEFAULT_BRIDGE_PORT: u16 = 8899;

/// 网关的网络地址
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderAddress {
    pub host: String,
    pub port: u16,
}

impl ProviderAddress {
    /// 解析网络地址
    ///
    /// 示例:
    /// - tcp://192.168.1.50:8899
    /// - 192.168.1.50:8899
    /// - gateway.local （使用 `default_port`）
    pub fn parse_network(input: &str, default_port: u16) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ProviderError::config("Missing host"));
        }

        let with_scheme = if input.contains("://") {
            input.to_string()
        } else {
            format!("tcp://{}", input)
        };

        let url = Url::parse(&with_scheme)
            .map_err(|e| ProviderError::config(format!("Invalid address {}: {}", input, e)))?;

        let host = url
            .host_str()
            .ok_or_else(|| ProviderError::config(format!("Missing host in {}", input)))?
            .trim_start_matches('[')
            .trim_end_matches(']')
            .to_string();

        let port = url.port().unwrap_or(default_port);

        Ok(Self { host, port })
    }
}

impl fmt::Display for ProviderAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
