use anyhow::{anyhow, Result};
use config::{Config, Environment, File, FileFormat};
use solar_protocol::Setting;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::GlobalConfig;

/// Provider 配置环境变量前缀，例如 `SOLAR_PROVIDER__BAUDRATE=9600`
pub const DEFAULT_ENV_PREFIX: &str = "SOLAR_PROVIDER";

/// 配置加载器
///
/// 目录结构：
/// - `global.toml`
/// - `providers/<name>.toml`
pub struct ConfigLoader {
    config_dir: PathBuf,
    env_prefix: String,
}

impl ConfigLoader {
    pub fn new<P: AsRef<Path>>(config_dir: P) -> Self {
        Self {
            config_dir: config_dir.as_ref().to_path_buf(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// 加载全局配置；文件不存在时返回默认值
    pub fn load_global(&self) -> Result<GlobalConfig> {
        let config_path = self.config_dir.join("global.toml");

        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let config = Config::builder()
            .add_source(File::new(path_str(&config_path)?, FileFormat::Toml))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// 加载 Provider 配置
    ///
    /// 优先级由低到高：插件默认值、`providers/<name>.toml`、环境变量。
    pub fn load_provider_setting(&self, name: &str, defaults: &Setting) -> Result<Setting> {
        let config_path = self
            .config_dir
            .join("providers")
            .join(format!("{}.toml", name.to_lowercase()));

        debug!(provider = %name, path = %config_path.display(), "Loading provider setting");

        let config = Config::builder()
            .add_source(Config::try_from(defaults)?)
            .add_source(File::new(path_str(&config_path)?, FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let setting: Setting = config.try_deserialize()?;
        check_setting(&setting)?;
        Ok(setting)
    }

    /// 验证配置
    pub fn validate(&self) -> Result<()> {
        let global = self.load_global()?;

        if global.system.locale.trim().is_empty() {
            return Err(anyhow!("system.locale must not be empty"));
        }

        tracing::Level::from_str(global.system.log_level.trim())
            .map_err(|_| anyhow!("Invalid system.log_level: {}", global.system.log_level))?;

        Ok(())
    }
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| anyhow!("Invalid config path"))
}

// 文件与环境变量绕过了 Setting::apply，这里补做范围检查
fn check_setting(setting: &Setting) -> Result<()> {
    if let Some(address) = setting.provider_address {
        if !(1..=247).contains(&address) {
            return Err(anyhow!("provider_address must be within 1..=247, got {}", address));
        }
    }
    if let Some(block_size) = setting.block_size {
        if block_size == 0 || block_size > Setting::MAX_BLOCK_SIZE {
            return Err(anyhow!(
                "block_size must be within 1..={}, got {}",
                Setting::MAX_BLOCK_SIZE,
                block_size
            ));
        }
    }
    if setting.baudrate == Some(0) {
        return Err(anyhow!("baudrate must be greater than 0"));
    }
    Ok(())
}
