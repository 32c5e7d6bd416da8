// ==========================================
// 上传对账系统 - 表格读写 Trait
// ==========================================
// 职责: 定义表格解析 / 回写接口（不包含实现）
// ==========================================

use crate::domain::upload::RawTable;
use crate::importer::error::{ImportError, ImportResult};
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件 → 原始表格
// 实现者: CsvParser, ExcelParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    /// 解析内存中的文件内容为原始表格
    ///
    /// # 返回
    /// - Ok(RawTable): 全部行（字符串，行长度可不一致）
    /// - Err: 格式损坏
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawTable>;

    /// 读取并解析文件（句柄在函数内打开并关闭）
    fn parse_file(&self, file_path: &Path) -> ImportResult<RawTable> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let bytes = std::fs::read(file_path)?;
        self.parse_bytes(&bytes)
    }
}

// ==========================================
// TableWriter Trait
// ==========================================
// 用途: 原始表格 → 文件（覆盖写）
// 实现者: CsvTableWriter, ExcelTableWriter, UniversalTableWriter
pub trait TableWriter: Send + Sync {
    /// 将表格写入文件，已存在时覆盖
    fn write_table(&self, file_path: &Path, table: &RawTable) -> ImportResult<()>;
}
