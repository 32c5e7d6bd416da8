// ==========================================
// 上传对账系统 - 导入层
// ==========================================
// 职责: 上传文件 → 原始表格 → 表头定位 → 行记录；表格回写
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod error;
pub mod file_parser;
pub mod header_locator;
pub mod row_projector;
pub mod table_importer_trait;
pub mod table_writer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, TableFormat, UniversalFileParser};
pub use header_locator::HeaderLocator;
pub use row_projector::RowProjector;
pub use table_writer::{CsvTableWriter, ExcelTableWriter, UniversalTableWriter};

// 重导出 Trait 接口
pub use table_importer_trait::{FileParser, TableWriter};
