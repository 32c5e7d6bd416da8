// ==========================================
// 上传对账系统 - 领域模型层
// ==========================================
// 职责: 定义上传表格、账本订单、校验结果等领域类型
// 红线: 不含 I/O，不含校验逻辑
// ==========================================

pub mod order;
pub mod types;
pub mod upload;

// 重导出核心类型
pub use order::{ExternalOrder, LedgerSnapshot, STATUS_UNKNOWN};
pub use types::{CanonicalField, CellKey, CellStatus, PlatformStatus};
pub use upload::{RawTable, Record, ValidatedCell, ValidatedRow, ValidationReport};
