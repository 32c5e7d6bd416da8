// ==========================================
// 上传对账系统 - 订单账本层
// ==========================================
// 职责: 通过 HTTP 拉取外部订单账本（TTL 缓存、有限重试、
//       结构无关的递归提取、去重）
// ==========================================

pub mod error;
pub mod extractor;
pub mod order_ledger_client;
pub mod snapshot_cache;
pub mod transport;

// 重导出核心类型
pub use error::{LedgerError, LedgerResult};
pub use extractor::{dedupe_orders, extract_orders, KeyValueView};
pub use order_ledger_client::OrderLedgerClient;
pub use snapshot_cache::SnapshotCache;
pub use transport::{HttpLedgerTransport, LedgerResponse, LedgerTransport};
