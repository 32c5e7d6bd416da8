// ==========================================
// 上传对账系统 - 表头行定位
// ==========================================
// 上传文件常在表头前带标题/说明行，不能假定第 0 行为表头
// 规则: 命中必填字段名最多的行；并列取最早一行；全部为 0 时取第 0 行
// ==========================================

use crate::domain::types::CanonicalField;
use crate::domain::upload::RawTable;
use std::collections::HashSet;
use tracing::debug;

pub struct HeaderLocator {
    expected: HashSet<String>,
}

impl HeaderLocator {
    pub fn new<I, S>(expected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            expected: expected
                .into_iter()
                .map(|e| e.as_ref().trim().to_string())
                .collect(),
        }
    }

    /// 以全部必填字段为期望表头
    pub fn for_canonical_fields() -> Self {
        Self::new(CanonicalField::labels())
    }

    /// 单行命中数（单元格去空白后精确匹配）
    pub fn score_row(&self, row: &[String]) -> usize {
        row.iter()
            .filter(|cell| self.expected.contains(cell.trim()))
            .count()
    }

    /// 返回表头行号
    pub fn locate(&self, table: &RawTable) -> usize {
        let mut best_idx = 0;
        let mut best_hits = 0;

        for (idx, row) in table.rows().iter().enumerate() {
            let hits = self.score_row(row);
            if hits > best_hits {
                best_hits = hits;
                best_idx = idx;
            }
        }

        debug!(header_index = best_idx, hits = best_hits, "表头行定位完成");
        best_idx
    }
}

impl Default for HeaderLocator {
    fn default() -> Self {
        Self::for_canonical_fields()
    }
}
