// ==========================================
// 上传对账系统 - API层错误类型
// ==========================================
// 职责: 汇总导入层 / 账本层 / 配置层错误，对外提供稳定的错误种类
// 红线: 任一错误中止整个调用，不返回部分结果
// ==========================================

use crate::config::ConfigError;
use crate::importer::error::ImportError;
use crate::ledger::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("上传文件处理失败: {0}")]
    Import(#[from] ImportError),

    #[error("订单账本不可用: {0}")]
    Ledger(#[from] LedgerError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 对外错误种类（调用方据此区分处理方式）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    UnsupportedFormat,
    FileIo,
    MalformedTable,
    LedgerUnavailable,
    LedgerMalformed,
    Configuration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorKind::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            ErrorKind::FileIo => "FILE_IO",
            ErrorKind::MalformedTable => "MALFORMED_TABLE",
            ErrorKind::LedgerUnavailable => "LEDGER_UNAVAILABLE",
            ErrorKind::LedgerMalformed => "LEDGER_MALFORMED",
            ErrorKind::Configuration => "CONFIGURATION",
        };
        f.write_str(text)
    }
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Import(ImportError::UnsupportedFormat(_)) => ErrorKind::UnsupportedFormat,
            ApiError::Import(e) if e.is_malformed_table() => ErrorKind::MalformedTable,
            ApiError::Import(_) => ErrorKind::FileIo,

            // 缺少接口地址属于配置问题
            ApiError::Ledger(LedgerError::MissingEndpoint) => ErrorKind::Configuration,
            ApiError::Ledger(e) if e.is_malformed() => ErrorKind::LedgerMalformed,
            ApiError::Ledger(_) => ErrorKind::LedgerUnavailable,

            ApiError::Config(_) => ErrorKind::Configuration,
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
