// ==========================================
// 上传对账系统 - 外部订单账本模型
// ==========================================
// 用途: 账本客户端写入，校验引擎只读
// 红线: 快照整体替换，不做原地修改
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 状态码未知时的哨兵值
pub const STATUS_UNKNOWN: i64 = -1;

// ==========================================
// ExternalOrder - 账本订单
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalOrder {
    #[serde(rename = "ordertoken")]
    pub order_token: String,
    #[serde(rename = "subid")]
    pub subscriber_id: String,
    pub timestamp: String,
    #[serde(rename = "status")]
    pub status_code: i64, // 0=open, 1=confirmed, 2=cancelled, 3=paid-out, -1=未知
}

impl ExternalOrder {
    /// 去重键: (token, subid, timestamp)
    pub fn dedup_key(&self) -> (&str, &str, &str) {
        (&self.order_token, &self.subscriber_id, &self.timestamp)
    }

    /// 是否至少有一个标识字段
    pub fn has_identity(&self) -> bool {
        !self.order_token.is_empty() || !self.subscriber_id.is_empty() || !self.timestamp.is_empty()
    }
}

// ==========================================
// LedgerSnapshot - 单次拉取的账本快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub orders: Vec<ExternalOrder>,
    pub fetched_at: DateTime<Utc>,
}

impl LedgerSnapshot {
    pub fn new(orders: Vec<ExternalOrder>) -> Self {
        Self {
            orders,
            fetched_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
