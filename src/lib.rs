// ==========================================
// 上传对账系统 - 核心库
// ==========================================
// 系统定位: 发布方上传的退订申请表 与 网络订单账本 的对账校验
// 流程: 上传文件 → 表头定位 → 行记录 → 账本比对 → 逐单元格校验报告
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 表格、记录、订单、校验结果
pub mod domain;

// 导入层 - CSV / Excel 读写、表头定位
pub mod importer;

// 账本层 - HTTP 拉取、缓存、提取
pub mod ledger;

// 引擎层 - 校验规则
pub mod engine;

// 配置层
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 业务入口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    CanonicalField, CellKey, CellStatus, ExternalOrder, LedgerSnapshot, PlatformStatus, RawTable,
    Record, ValidatedCell, ValidatedRow, ValidationReport,
};

pub use api::{ApiError, ApiResult, ErrorKind, ValidationApi};
pub use config::LedgerConfig;
pub use engine::ValidationEngine;
pub use ledger::OrderLedgerClient;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "上传对账系统";
