use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 分类服务调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误
    #[error("错误: {0}")]
    Other(String),
}

/// 分类服务调用错误
///
/// `Display` 输出即为面向用户的提示信息，批量处理中的限流判断也基于它。
#[derive(Debug, Error)]
pub enum ApiError {
    /// 无法连接到分类服务（网络不通、超时、读取响应失败）
    #[error("{hint}")]
    Connectivity {
        endpoint: String,
        hint: String,
        reason: String,
    },
    /// 服务可达，但返回了非成功状态码或无法解析的响应
    #[error("{message}")]
    Remote {
        endpoint: String,
        status: u16,
        message: String,
    },
}

impl ApiError {
    /// HTTP 状态码（连接失败时没有）
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Connectivity { .. } => None,
            ApiError::Remote { status, .. } => Some(*status),
        }
    }

    /// 请求的端点
    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::Connectivity { endpoint, .. } | ApiError::Remote { endpoint, .. } => endpoint,
        }
    }

    /// 面向用户的错误信息
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn is_connectivity(&self) -> bool {
        matches!(self, ApiError::Connectivity { .. })
    }
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("无法读取配置文件 {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 配置项取值非法
    #[error("配置项 {field} 非法: {reason}")]
    InvalidValue { field: String, reason: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            AppError::File(FileError::NotFound { path })
        } else {
            AppError::File(FileError::ReadFailed { path, source })
        }
    }
}

impl ApiError {
    /// 创建连接失败错误，附带后端地址提示
    pub fn connectivity(
        endpoint: impl Into<String>,
        base_url: &str,
        reason: impl std::fmt::Display,
    ) -> Self {
        ApiError::Connectivity {
            endpoint: endpoint.into(),
            hint: format!(
                "无法连接到分类服务，请确认后端正在 {} 运行",
                base_url
            ),
            reason: reason.to_string(),
        }
    }

    /// 创建服务端错误
    pub fn remote(endpoint: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        ApiError::Remote {
            endpoint: endpoint.into(),
            status,
            message: message.into(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
