// ==========================================
// 上传对账系统 - API 层
// ==========================================
// 职责: 对外业务入口，编排导入层 / 账本层 / 校验引擎
// ==========================================

pub mod error;
pub mod table_api;
pub mod validation_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult, ErrorKind};
pub use table_api::{TableApi, TablePreview};
pub use validation_api::{BatchItem, ValidationApi};
