use serde::Serialize;
use solar_protocol::{KnownProtocol, SupportedInterface};

/// 插件元数据，Host 按此发现并展示插件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginMetadata {
    pub name: &'static str,
    pub version: &'static str,
    pub author: &'static str,
    pub url: &'static str,
    pub svg_image: &'static str,
    pub supported_interfaces: &'static [SupportedInterface],
    pub used_protocol: KnownProtocol,
    /// 支持的设备型号
    pub supports: &'static str,
}

impl PluginMetadata {
    pub fn supports_interface(&self, interface: SupportedInterface) -> bool {
        self.supported_interfaces.contains(&interface)
    }
}
