use thiserror::Error;

/// Provider 统一错误类型
#[derive(Error, Debug)]
pub enum ProviderError {
    /// 连接失败（消息已本地化，原始错误只写日志）
    #[error("Connection error: {0}")]
    Connection(String),

    /// 传输层失败（帧错误、IO）
    #[error("Modbus error: {0}")]
    Modbus(String),

    /// 设备返回的异常响应，例如 IllegalDataAddress
    #[error("Modbus exception: {0}")]
    Exception(String),

    #[error("Timeout after {0} ms")]
    Timeout(u64),

    /// 插件内置资源不存在
    #[error("Missing resource: {0}")]
    MissingResource(String),

    /// 资源存在但内容无法解析
    #[error("Malformed resource {file}: {source}")]
    MalformedResource {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not initialized: {0}")]
    NotInitialized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ProviderError>;

impl ProviderError {
    pub fn config(msg: impl Into<String>) -> Self {
        ProviderError::Config(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        ProviderError::InvalidInput(msg.into())
    }

    pub fn modbus(msg: impl Into<String>) -> Self {
        ProviderError::Modbus(msg.into())
    }

    /// 是否值得重试（传输层问题，而非配置或资源问题）
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::Modbus(_) | ProviderError::Timeout(_) | ProviderError::Io(_)
        )
    }
}
