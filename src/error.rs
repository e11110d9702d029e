use std::path::PathBuf;
use thiserror::Error;

/// 应用程序错误类型
///
/// 只覆盖会中断整个运行的错误。单个文件的处理失败不会走到这里，
/// 而是记录在 [`crate::models::Outcome`] 中。
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 服务不可达（启动探活失败）
    #[error("Dataseer 服务不可达 ({url}): {source}")]
    ServerUnavailable {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({}): {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 解析配置文件失败
    #[error("解析配置文件失败 ({}): {message}", .path.display())]
    ParseFailed { path: PathBuf, message: String },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置值不合法
    #[error("配置项 {key} 不合法: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 目录不存在
    #[error("目录不存在: {}", .path.display())]
    DirectoryNotFound { path: PathBuf },
    /// 读取文件失败
    #[error("读取文件失败 ({}): {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({}): {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建服务不可达错误
    pub fn server_unavailable(url: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::ServerUnavailable {
            url: url.into(),
            source,
        }
    }

    /// 创建配置值不合法错误
    pub fn invalid_config(key: &'static str, reason: impl Into<String>) -> Self {
        AppError::Config(ConfigError::Invalid {
            key,
            reason: reason.into(),
        })
    }
}

impl FileError {
    /// 创建文件读取错误
    pub fn read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FileError::ReadFailed {
            path: path.into(),
            source,
        }
    }

    /// 创建文件写入错误
    pub fn write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FileError::WriteFailed {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts_into_app_error() {
        let err: AppError = ConfigError::Invalid {
            key: "batch_size",
            reason: "必须大于 0".to_string(),
        }
        .into();

        assert!(matches!(err, AppError::Config(ConfigError::Invalid { .. })));
        assert_eq!(err.to_string(), "配置错误: 配置项 batch_size 不合法: 必须大于 0");
    }

    #[test]
    fn test_file_error_display_contains_path() {
        let err = FileError::DirectoryNotFound {
            path: PathBuf::from("/no/such/dir"),
        };

        assert!(err.to_string().contains("/no/such/dir"));
    }
}
