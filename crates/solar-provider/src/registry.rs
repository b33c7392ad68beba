use crate::metadata::PluginMetadata;
use crate::provider::Provider;
use solar_core::{ProviderError, Result};
use solar_protocol::SupportedInterface;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

pub type ProviderConstructor = Arc<dyn Fn() -> Result<Box<dyn Provider>> + Send + Sync>;

struct PluginEntry {
    metadata: &'static PluginMetadata,
    constructor: ProviderConstructor,
}

/// 插件注册表：按元数据登记构造函数，按名称创建 Provider 实例
#[derive(Default)]
pub struct PluginRegistry {
    // 键为小写插件名
    entries: RwLock<HashMap<String, PluginEntry>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记插件；同名插件被覆盖
    pub fn register<F>(&self, metadata: &'static PluginMetadata, constructor: F) -> Result<()>
    where
        F: Fn() -> Result<Box<dyn Provider>> + Send + Sync + 'static,
    {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| ProviderError::Other(anyhow_lock(e)))?;

        let key = metadata.name.to_lowercase();
        if entries.contains_key(&key) {
            warn!(plugin = %metadata.name, "Plugin already registered, replacing");
        }

        entries.insert(
            key,
            PluginEntry {
                metadata,
                constructor: Arc::new(constructor),
            },
        );

        info!(plugin = %metadata.name, version = %metadata.version, "Plugin registered");
        Ok(())
    }

    /// 创建新的 Provider 实例（名称不区分大小写）
    pub fn create(&self, name: &str) -> Result<Box<dyn Provider>> {
        let constructor = {
            let entries = self
                .entries
                .read()
                .map_err(|e| ProviderError::Other(anyhow_lock(e)))?;
            entries
                .get(&name.to_lowercase())
                .map(|entry| entry.constructor.clone())
                .ok_or_else(|| ProviderError::NotFound(format!("Plugin not found: {}", name)))?
        };

        constructor()
    }

    pub fn metadata(&self, name: &str) -> Option<&'static PluginMetadata> {
        let entries = self.entries.read().ok()?;
        entries.get(&name.to_lowercase()).map(|entry| entry.metadata)
    }

    /// 所有插件元数据，按名称排序
    pub fn list(&self) -> Vec<&'static PluginMetadata> {
        let Ok(entries) = self.entries.read() else {
            return Vec::new();
        };
        let mut list: Vec<_> = entries.values().map(|entry| entry.metadata).collect();
        list.sort_by_key(|m| m.name);
        list
    }

    /// 支持指定接入方式的插件
    pub fn supporting(&self, interface: SupportedInterface) -> Vec<&'static PluginMetadata> {
        self.list()
            .into_iter()
            .filter(|m| m.supports_interface(interface))
            .collect()
    }
}

fn anyhow_lock<E: std::fmt::Display>(e: E) -> anyhow::Error {
    anyhow::anyhow!("Failed to acquire registry lock: {}", e)
}
