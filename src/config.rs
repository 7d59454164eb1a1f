use std::path::Path;
use std::time::Duration;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::services::DEFAULT_MIN_LINE_LENGTH;

/// 默认的限流特征：HTTP 429、quota、limit（也覆盖葡语的 "limite"）
pub const DEFAULT_RATE_LIMIT_PATTERN: &str = "429|quota|limit";

/// 程序配置
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// 分类服务地址
    pub api_base_url: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 批量处理时两封邮件之间的固定间隔（毫秒）
    pub inter_item_delay_ms: u64,
    /// 触发限流后额外等待的时间（毫秒）
    pub rate_limit_cooldown_ms: u64,
    /// 识别限流错误的正则（不区分大小写），匹配错误信息
    pub rate_limit_pattern: String,
    /// 批量文件中短于等于该长度的行会被丢弃
    pub min_line_length: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 60,
            inter_item_delay_ms: 2000,
            rate_limit_cooldown_ms: 5000,
            rate_limit_pattern: DEFAULT_RATE_LIMIT_PATTERN.to_string(),
            min_line_length: DEFAULT_MIN_LINE_LENGTH,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 只从环境变量读取（未设置的项使用默认值）
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// 读取 TOML 配置文件（可选），再用环境变量覆盖
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        let config = base.with_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// 解析 TOML 配置文件，缺失的字段取默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    /// 用 `lookup` 提供的值覆盖当前配置，无法解析的值会被忽略
    pub fn with_overrides(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_base_url: lookup("FINMAIL_API_URL").unwrap_or(self.api_base_url),
            request_timeout_secs: lookup("FINMAIL_REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.request_timeout_secs),
            inter_item_delay_ms: lookup("FINMAIL_INTER_ITEM_DELAY_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.inter_item_delay_ms),
            rate_limit_cooldown_ms: lookup("FINMAIL_RATE_LIMIT_COOLDOWN_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.rate_limit_cooldown_ms),
            rate_limit_pattern: lookup("FINMAIL_RATE_LIMIT_PATTERN")
                .unwrap_or(self.rate_limit_pattern),
            min_line_length: lookup("FINMAIL_MIN_LINE_LENGTH")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.min_line_length),
            verbose_logging: lookup("VERBOSE_LOGGING")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.verbose_logging),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url".to_string(),
                reason: "不能为空".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        self.rate_limit_regex()?;
        Ok(())
    }

    /// 编译限流特征正则
    pub fn rate_limit_regex(&self) -> Result<Regex, ConfigError> {
        RegexBuilder::new(&self.rate_limit_pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                field: "rate_limit_pattern".to_string(),
                reason: e.to_string(),
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn inter_item_delay(&self) -> Duration {
        Duration::from_millis(self.inter_item_delay_ms)
    }

    pub fn rate_limit_cooldown(&self) -> Duration {
        Duration::from_millis(self.rate_limit_cooldown_ms)
    }
}
