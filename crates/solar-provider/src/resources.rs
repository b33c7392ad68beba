use serde::de::DeserializeOwned;
use solar_core::{ProviderError, Result};

/// 编译期嵌入插件的资源文件（文件名 -> 内容）
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedResources {
    files: &'static [(&'static str, &'static str)],
}

impl EmbeddedResources {
    pub const fn new(files: &'static [(&'static str, &'static str)]) -> Self {
        Self { files }
    }

    pub fn get(&self, name: &str) -> Result<&'static str> {
        self.files
            .iter()
            .find(|(file, _)| *file == name)
            .map(|(_, content)| *content)
            .ok_or_else(|| ProviderError::MissingResource(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.iter().any(|(file, _)| *file == name)
    }

    pub fn load_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let content = self.get(name)?;
        serde_json::from_str(content).map_err(|source| ProviderError::MalformedResource {
            file: name.to_string(),
            source,
        })
    }
}
