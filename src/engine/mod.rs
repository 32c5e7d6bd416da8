// ==========================================
// 上传对账系统 - 引擎层
// ==========================================
// 职责: 行记录与账本订单的逐单元格比对
// 红线: 引擎不做 I/O，单元格问题只体现为状态
// ==========================================

pub mod timestamp;
pub mod validation;

// 重导出核心引擎
pub use timestamp::{parse_flexible, parse_ledger_timestamp, same_calendar_day};
pub use validation::{order_token_candidates, ValidationEngine};
