//! 程序配置
//!
//! 加载顺序：内置默认值 → 配置文件（JSON 或 TOML）→ 环境变量 → 校验。
//! 加载完成后配置只读，显式传给需要它的组件。

use crate::error::{AppError, AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "./config.json";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Dataseer 服务主机
    pub dataseer_server: String,
    /// Dataseer 服务端口（为空时不拼接端口）
    #[serde(deserialize_with = "deserialize_port")]
    pub dataseer_port: Option<String>,
    /// 单次请求超时（秒）
    pub timeout: f64,
    /// 服务过载（503）后的等待时间（秒）
    pub sleep_time: f64,
    /// 每批处理的文件数量
    pub batch_size: usize,
    /// 过载重试上限，不设置则无限重试
    pub max_retries: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataseer_server: "localhost".to_string(),
            dataseer_port: Some("8060".to_string()),
            timeout: 60.0,
            sleep_time: 5.0,
            batch_size: 100,
            max_retries: None,
        }
    }
}

impl Config {
    /// 加载配置：默认值 → 文件 → 环境变量，最后校验
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// 从配置文件读取，`.toml` 按 TOML 解析，其余按 JSON 解析
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed: Result<Self, String> = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| {
            ConfigError::ParseFailed {
                path: path.to_path_buf(),
                message,
            }
            .into()
        })
    }

    /// 用环境变量覆盖配置项
    ///
    /// `lookup` 通常是 `std::env::var`，测试时可以替换成固定的映射。
    pub fn with_overrides<F>(mut self, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(server) = lookup("DATASEER_SERVER") {
            self.dataseer_server = server;
        }
        if let Some(port) = lookup("DATASEER_PORT") {
            self.dataseer_port = normalize_port(port);
        }
        if let Some(value) = lookup("DATASEER_TIMEOUT") {
            self.timeout = parse_env("DATASEER_TIMEOUT", value, "f64")?;
        }
        if let Some(value) = lookup("DATASEER_SLEEP_TIME") {
            self.sleep_time = parse_env("DATASEER_SLEEP_TIME", value, "f64")?;
        }
        if let Some(value) = lookup("DATASEER_BATCH_SIZE") {
            self.batch_size = parse_env("DATASEER_BATCH_SIZE", value, "usize")?;
        }
        if let Some(value) = lookup("DATASEER_MAX_RETRIES") {
            self.max_retries = Some(parse_env("DATASEER_MAX_RETRIES", value, "u32")?);
        }
        Ok(self)
    }

    /// 校验配置
    pub fn validate(&self) -> AppResult<()> {
        if self.dataseer_server.trim().is_empty() {
            return Err(AppError::invalid_config("dataseer_server", "不能为空"));
        }
        if self.batch_size == 0 {
            return Err(AppError::invalid_config("batch_size", "必须大于 0"));
        }
        if self.timeout <= 0.0 || Duration::try_from_secs_f64(self.timeout).is_err() {
            return Err(AppError::invalid_config(
                "timeout",
                format!("必须是正数且可表示的秒数，当前值 {}", self.timeout),
            ));
        }
        if Duration::try_from_secs_f64(self.sleep_time).is_err() {
            return Err(AppError::invalid_config(
                "sleep_time",
                format!("必须是非负且可表示的秒数，当前值 {}", self.sleep_time),
            ));
        }
        Ok(())
    }

    /// 服务根地址，形如 `http://host:port/service/`
    pub fn service_url(&self) -> String {
        let mut url = format!("http://{}", self.dataseer_server);
        if let Some(port) = &self.dataseer_port {
            url.push(':');
            url.push_str(port);
        }
        url.push_str("/service/");
        url
    }

    /// 请求超时
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout)
    }

    /// 过载等待时间
    pub fn overload_sleep(&self) -> Duration {
        Duration::from_secs_f64(self.sleep_time)
    }
}

fn parse_env<T: std::str::FromStr>(var_name: &str, value: String, expected_type: &str) -> AppResult<T> {
    value.trim().parse().map_err(|_| {
        ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value,
            expected_type: expected_type.to_string(),
        }
        .into()
    })
}

fn normalize_port(port: String) -> Option<String> {
    let port = port.trim();
    if port.is_empty() {
        None
    } else {
        Some(port.to_string())
    }
}

/// 端口在原有配置文件里既可能是字符串也可能是数字
#[derive(Deserialize)]
#[serde(untagged)]
enum PortValue {
    Number(u16),
    Text(String),
}

fn deserialize_port<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<PortValue> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(PortValue::Number(port)) => Some(port.to_string()),
        Some(PortValue::Text(port)) => normalize_port(port),
        None => None,
    })
}
