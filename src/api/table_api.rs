// ==========================================
// 上传对账系统 - 表格API
// ==========================================
// 职责: 不依赖账本的表格操作（读取 / 回写 / 表头预览）
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::upload::{RawTable, Record};
use crate::importer::{
    FileParser, HeaderLocator, RowProjector, TableWriter, UniversalFileParser,
    UniversalTableWriter,
};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// 表格预览
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePreview {
    pub header_index: usize,
    pub header: Vec<String>,
    pub records: Vec<Record>,
}

#[derive(Default)]
pub struct TableApi {
    locator: HeaderLocator,
    projector: RowProjector,
}

impl TableApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取上传文件为原始表格
    pub fn load_table(&self, path: &Path) -> ApiResult<RawTable> {
        Ok(UniversalFileParser.parse_file(path)?)
    }

    /// 将表格回写为 CSV / Excel（按扩展名）
    pub fn save_table(&self, path: &Path, table: &RawTable) -> ApiResult<()> {
        UniversalTableWriter.write_table(path, table)?;
        info!(path = %path.display(), rows = table.len(), "表格已写出");
        Ok(())
    }

    /// 定位表头并投影为行记录
    pub fn records(&self, table: &RawTable) -> (usize, Vec<Record>) {
        let header_index = self.locator.locate(table);
        (header_index, self.projector.project(table, header_index))
    }

    /// 预览: 表头行、表头内容与行记录
    pub fn inspect(&self, path: &Path) -> ApiResult<TablePreview> {
        let table = self.load_table(path)?;
        let (header_index, records) = self.records(&table);
        let header = table
            .row(header_index)
            .map(|row| row.iter().map(|c| c.trim().to_string()).collect())
            .unwrap_or_default();

        Ok(TablePreview {
            header_index,
            header,
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_save_then_inspect() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("upload.csv");
        let table = RawTable::from(vec![
            vec!["Export vom 01.03.2024"],
            vec!["Publisher ID", "SubID", "Notiz"],
            vec!["P1", "S1", ""],
        ]);
        let api = TableApi::new();

        api.save_table(&path, &table).unwrap();
        let preview = api.inspect(&path).unwrap();

        assert_eq!(preview.header_index, 1);
        assert_eq!(preview.header, vec!["Publisher ID", "SubID", "Notiz"]);
        assert_eq!(preview.records.len(), 1);
        assert_eq!(preview.records[0].get("SubID"), Some("S1"));
    }

    #[test]
    fn test_missing_file_is_file_io() {
        let dir = TempDir::new().unwrap();

        let err = TableApi::new()
            .load_table(&dir.path().join("missing.xlsx"))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::FileIo);
    }
}
