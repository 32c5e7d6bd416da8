// ==========================================
// 上传对账系统 - 上传表格领域模型
// ==========================================
// 职责: 原始表格、行记录、校验结果
// 生命周期: 表格与记录按调用创建，结果交给调用方后不再持有
// ==========================================

use crate::domain::types::{CanonicalField, CellKey, CellStatus};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

// ==========================================
// RawTable - 原始表格
// ==========================================
// 行长度可不一致（ragged），此阶段不做任何归一
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTable {
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<Vec<String>>> for RawTable {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self::new(rows)
    }
}

impl From<Vec<Vec<&str>>> for RawTable {
    fn from(rows: Vec<Vec<&str>>) -> Self {
        Self::new(
            rows.into_iter()
                .map(|r| r.into_iter().map(str::to_string).collect())
                .collect(),
        )
    }
}

// ==========================================
// Record - 行记录
// ==========================================
// 按表头顺序保存 列名 → 去空白值；必填字段经 CanonicalField 读取，
// 其余列（别名列、含 "order" 的附加列）按列名读取
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// 源表格中的行号（0 起）
    pub row_number: usize,
    columns: Vec<(String, String)>,
}

impl Record {
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            columns: Vec::new(),
        }
    }

    /// 写入列值；同名列重复出现时后者覆盖前者（位置不变）
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        let header = header.into();
        let value = value.into();
        match self.columns.iter_mut().find(|(h, _)| *h == header) {
            Some(slot) => slot.1 = value,
            None => self.columns.push((header, value)),
        }
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    /// 必填字段取值，缺列视为空串
    pub fn field(&self, field: CanonicalField) -> &str {
        self.get(field.label()).unwrap_or("")
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(h, _)| h.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (header, value) in &self.columns {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

// ==========================================
// ValidatedCell - 单元格校验结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedCell {
    pub value: String,
    pub status: CellStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ValidatedCell {
    pub fn ok(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            status: CellStatus::Ok,
            note: None,
        }
    }

    pub fn invalid(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            status: CellStatus::Invalid,
            note: None,
        }
    }

    pub fn empty() -> Self {
        Self {
            value: String::new(),
            status: CellStatus::Empty,
            note: None,
        }
    }

    /// 默认规则：非空 → ok，空 → empty
    pub fn from_value(value: &str) -> Self {
        if value.is_empty() {
            Self::empty()
        } else {
            Self::ok(value)
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

// ==========================================
// ValidatedRow - 行校验结果
// ==========================================
// remark_operator: 运营侧备注；remark_publisher: 发布方备注
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedRow {
    pub index: usize,
    pub cells: BTreeMap<CellKey, ValidatedCell>,
    #[serde(rename = "remarkO")]
    pub remark_operator: String,
    #[serde(rename = "remarkP")]
    pub remark_publisher: String,
}

impl ValidatedRow {
    pub fn cell(&self, key: impl Into<CellKey>) -> Option<&ValidatedCell> {
        self.cells.get(&key.into())
    }

    pub fn platform_status(&self) -> Option<&ValidatedCell> {
        self.cells.get(&CellKey::PlatformStatus)
    }
}

// ==========================================
// ValidationReport - 单个上传文件的对账结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// 本次校验的运行 ID
    pub run_id: Uuid,
    /// 识别出的表头行号
    pub header_index: usize,
    /// 参与比对的账本订单数
    pub orders_count: usize,
    pub rows: Vec<ValidatedRow>,
}
