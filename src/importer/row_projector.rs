// ==========================================
// 上传对账系统 - 行投影
// ==========================================
// 表头行之后的每一行 → 一条 Record（列名 → 去空白值）
// 空表头列跳过；数据行缺列按空串；全空行同样产出记录
// ==========================================

use crate::domain::upload::{RawTable, Record};
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
pub struct RowProjector;

impl RowProjector {
    pub fn project(&self, table: &RawTable, header_index: usize) -> Vec<Record> {
        let header = match table.row(header_index) {
            Some(header) => header,
            None => return Vec::new(),
        };

        let columns: Vec<(usize, &str)> = header
            .iter()
            .enumerate()
            .map(|(idx, col)| (idx, col.trim()))
            .filter(|(_, col)| !col.is_empty())
            .collect();

        let records: Vec<Record> = table
            .rows()
            .iter()
            .enumerate()
            .skip(header_index + 1)
            .map(|(row_number, row)| {
                let mut record = Record::new(row_number);
                for (col_idx, col) in &columns {
                    let value = row.get(*col_idx).map(|v| v.trim()).unwrap_or("");
                    record.insert(*col, value);
                }
                record
            })
            .collect();

        debug!(
            header_index = header_index,
            columns = columns.len(),
            records = records.len(),
            "行投影完成"
        );
        records
    }
}
