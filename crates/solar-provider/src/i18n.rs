use crate::resources::EmbeddedResources;
use solar_core::{ProviderError, Result};
use std::collections::HashMap;
use tracing::warn;

pub const DEFAULT_LANGUAGE: &str = "en";

/// 本地化字符串表
///
/// 资源文件为 `i18n/<name>_<lang>.toml`，嵌套表按点号展开为键，
/// 例如 `[sdm630.address] text = "..."` 得到键 `sdm630.address.text`。
/// 查找顺序：请求语言 -> 英语 -> 键本身。
#[derive(Debug, Clone)]
pub struct ResourceBundle {
    name: String,
    language: String,
    strings: HashMap<String, String>,
    fallback: HashMap<String, String>,
}

impl ResourceBundle {
    pub fn load(resources: &EmbeddedResources, name: &str, locale: &str) -> Result<Self> {
        let language = language_of(locale);

        let fallback = parse_bundle(resources, name, DEFAULT_LANGUAGE)?;
        let strings = if language != DEFAULT_LANGUAGE
            && resources.contains(&bundle_file(name, &language))
        {
            parse_bundle(resources, name, &language)?
        } else {
            HashMap::new()
        };

        Ok(Self {
            name: name.to_string(),
            language,
            strings,
            fallback,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings
            .get(key)
            .or_else(|| self.fallback.get(key))
            .map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// 缺失时返回键本身
    pub fn get_string(&self, key: &str) -> String {
        match self.get(key) {
            Some(value) => value.to_string(),
            None => {
                warn!(bundle = %self.name, key = %key, "Missing localized string");
                key.to_string()
            }
        }
    }
}

/// "de-DE" / "de_DE" / "DE" -> "de"
fn language_of(locale: &str) -> String {
    let language = locale
        .split(['-', '_', '.'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    if language.is_empty() {
        DEFAULT_LANGUAGE.to_string()
    } else {
        language
    }
}

fn bundle_file(name: &str, language: &str) -> String {
    format!("i18n/{}_{}.toml", name, language)
}

fn parse_bundle(
    resources: &EmbeddedResources,
    name: &str,
    language: &str,
) -> Result<HashMap<String, String>> {
    let file = bundle_file(name, language);
    let content = resources.get(&file)?;

    let table: toml::Table = toml::from_str(content)
        .map_err(|e| ProviderError::config(format!("Invalid resource bundle {}: {}", file, e)))?;

    let mut strings = HashMap::new();
    flatten("", &table, &mut strings);
    Ok(strings)
}

fn flatten(prefix: &str, table: &toml::Table, out: &mut HashMap<String, String>) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            toml::Value::Table(nested) => flatten(&full_key, nested, out),
            toml::Value::String(s) => {
                out.insert(full_key, s.clone());
            }
            other => {
                out.insert(full_key, other.to_string());
            }
        }
    }
}
