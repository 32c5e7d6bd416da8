// ==========================================
// 上传对账系统 - 账本客户端配置
// ==========================================
// 职责: 账本地址、缓存 TTL、超时、重试次数的加载与校验
// 来源: 环境变量（可由 .env 提供），测试中可用 HashMap 注入
// ==========================================

use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    // 账本接口地址（必填）
    pub const NETWORK_API_URL: &str = "NETWORK_API_URL";

    // 快照缓存
    pub const LEDGER_CACHE_TTL_SECS: &str = "LEDGER_CACHE_TTL_SECS";

    // 请求
    pub const LEDGER_TIMEOUT_SECS: &str = "LEDGER_TIMEOUT_SECS";
    pub const LEDGER_MAX_ATTEMPTS: &str = "LEDGER_MAX_ATTEMPTS";
    pub const LEDGER_USER_AGENT: &str = "LEDGER_USER_AGENT";
}

/// 默认值
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

// ==========================================
// 配置错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("配置缺失 (key: {0})")]
    Missing(String),

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

// ==========================================
// ConfigSource Trait
// ==========================================
// 用途: 按键读取原始配置字符串
// 实现者: EnvConfigSource, HashMap<String, String>
pub trait ConfigSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// 从进程环境变量读取
pub struct EnvConfigSource;

impl ConfigSource for EnvConfigSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

// ==========================================
// LedgerConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub api_url: String,
    pub cache_ttl: Duration,
    pub request_timeout: Duration,
    pub max_attempts: u32,
    pub user_agent: String,
}

impl LedgerConfig {
    /// 指定地址，其余取默认值
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// 从环境变量加载
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&EnvConfigSource)
    }

    /// 从任意配置源加载并校验
    pub fn from_source(source: &dyn ConfigSource) -> Result<Self, ConfigError> {
        let api_url = source
            .get(config_keys::NETWORK_API_URL)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::Missing(config_keys::NETWORK_API_URL.to_string()))?;

        let mut config = Self::new(api_url);

        if let Some(secs) = read_number::<u64>(source, config_keys::LEDGER_CACHE_TTL_SECS)? {
            config.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = read_number::<u64>(source, config_keys::LEDGER_TIMEOUT_SECS)? {
            if secs == 0 {
                return Err(invalid(config_keys::LEDGER_TIMEOUT_SECS, "0", "超时必须大于 0"));
            }
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = read_number::<u32>(source, config_keys::LEDGER_MAX_ATTEMPTS)? {
            if attempts == 0 {
                return Err(invalid(config_keys::LEDGER_MAX_ATTEMPTS, "0", "尝试次数至少为 1"));
            }
            config.max_attempts = attempts;
        }
        if let Some(agent) = source.get(config_keys::LEDGER_USER_AGENT) {
            if !agent.trim().is_empty() {
                config.user_agent = agent.trim().to_string();
            }
        }

        Ok(config)
    }
}

fn invalid(key: &str, value: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
}

/// 读取数值配置；缺失或空白返回 None
fn read_number<T: std::str::FromStr>(
    source: &dyn ConfigSource,
    key: &str,
) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match source.get(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| invalid(key, &raw, &e.to_string())),
    }
}
