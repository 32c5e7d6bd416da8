// ==========================================
// 上传对账系统 - 账本模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类: 不可用（状态码/传输/重试耗尽） vs 响应损坏（非截断的 JSON 错误）
// ==========================================

use thiserror::Error;

/// 错误响应体预览的最大字符数
pub const BODY_PREVIEW_CHARS: usize = 300;

/// 账本模块错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    // ===== 配置错误 =====
    #[error("账本接口地址为空")]
    MissingEndpoint,

    // ===== 接口错误（不重试）=====
    #[error("账本接口返回状态 {status} | body: {body_preview}")]
    Status { status: u16, body_preview: String },

    // ===== 可重试错误 =====
    #[error("账本请求失败: {0}")]
    Transport(String),

    #[error("账本响应 JSON 不完整: {0}")]
    Truncated(String),

    // ===== 响应损坏（不重试）=====
    #[error("账本响应 JSON 解析失败: {0}")]
    Malformed(String),

    #[error("账本在 {attempts} 次尝试后仍不可用: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<LedgerError>,
    },
}

impl LedgerError {
    /// 是否进入下一次尝试
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Transport(_) | LedgerError::Truncated(_))
    }

    /// 是否为响应内容损坏
    pub fn is_malformed(&self) -> bool {
        matches!(self, LedgerError::Malformed(_))
    }

    /// 截取响应体前 300 个字符用于诊断
    pub fn status(status: u16, body: &[u8]) -> Self {
        LedgerError::Status {
            status,
            body_preview: String::from_utf8_lossy(body)
                .chars()
                .take(BODY_PREVIEW_CHARS)
                .collect(),
        }
    }
}

// 实现 From<serde_json::Error>
// 输入提前结束视为传输截断，其余为格式错误
impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_eof() {
            LedgerError::Truncated(err.to_string())
        } else {
            LedgerError::Malformed(err.to_string())
        }
    }
}

// 实现 From<reqwest::Error>
impl From<reqwest::Error> for LedgerError {
    fn from(err: reqwest::Error) -> Self {
        LedgerError::Transport(err.to_string())
    }
}

/// Result 类型别名
pub type LedgerResult<T> = Result<T, LedgerError>;
