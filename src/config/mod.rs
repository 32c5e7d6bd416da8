// ==========================================
// 上传对账系统 - 配置层
// ==========================================
// 职责: 账本客户端配置加载（环境变量 / .env / 注入源）
// ==========================================

pub mod ledger_config;

// 重导出核心配置
pub use ledger_config::{config_keys, ConfigError, ConfigSource, EnvConfigSource, LedgerConfig};
