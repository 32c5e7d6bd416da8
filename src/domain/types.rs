// ==========================================
// 上传对账系统 - 领域类型定义
// ==========================================
// 职责: 必填字段枚举、单元格状态、平台状态
// 红线: 字段名为精确匹配（德语表头），不做模糊归一
// ==========================================

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 必填字段 (Canonical Field)
// ==========================================
// 表头识别与记录取值共用同一组精确字符串
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CanonicalField {
    PublisherId,     // Publisher ID
    CustomerName,    // 终端客户全名
    CustomerAddress, // 终端客户地址
    CustomerEmail,   // 终端客户邮箱
    RequestReason,   // 申请原因
    Timestamp,       // 时间戳
    SubId,           // SubID
    OrderToken,      // Ordertoken/OrderID
}

impl CanonicalField {
    /// 全部必填字段（固定顺序，与上传模板一致）
    pub const ALL: [CanonicalField; 8] = [
        CanonicalField::PublisherId,
        CanonicalField::CustomerName,
        CanonicalField::CustomerAddress,
        CanonicalField::CustomerEmail,
        CanonicalField::RequestReason,
        CanonicalField::Timestamp,
        CanonicalField::SubId,
        CanonicalField::OrderToken,
    ];

    /// 上传文件中的精确表头文本
    pub fn label(&self) -> &'static str {
        match self {
            CanonicalField::PublisherId => "Publisher ID",
            CanonicalField::CustomerName => "Vollständiger Name des Endkunden",
            CanonicalField::CustomerAddress => "Adresse des Endkunden",
            CanonicalField::CustomerEmail => "E-Mailadresse des Endkunden",
            CanonicalField::RequestReason => "Grund der Anfrage",
            CanonicalField::Timestamp => "Timestamp",
            CanonicalField::SubId => "SubID",
            CanonicalField::OrderToken => "Ordertoken/OrderID",
        }
    }

    /// 按表头文本反查（精确匹配）
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.label() == label)
    }

    /// 全部表头文本
    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|f| f.label()).collect()
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 单元格状态 (Cell Status)
// ==========================================
// 序列化格式: 小写 (ok / invalid / empty)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellStatus {
    Ok,      // 有效
    Invalid, // 无效（格式错误 / 未匹配账本）
    Empty,   // 空值
}

impl fmt::Display for CellStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellStatus::Ok => write!(f, "ok"),
            CellStatus::Invalid => write!(f, "invalid"),
            CellStatus::Empty => write!(f, "empty"),
        }
    }
}

// ==========================================
// 平台订单状态 (Platform Status)
// ==========================================
// 账本状态码: 0=open, 1=confirmed, 2=cancelled, 3=paid-out; 其余视为未知
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformStatus {
    Open,
    Confirmed,
    Cancelled,
    PaidOut,
}

impl PlatformStatus {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(PlatformStatus::Open),
            1 => Some(PlatformStatus::Confirmed),
            2 => Some(PlatformStatus::Cancelled),
            3 => Some(PlatformStatus::PaidOut),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlatformStatus::Open => "open",
            PlatformStatus::Confirmed => "confirmed",
            PlatformStatus::Cancelled => "cancelled",
            PlatformStatus::PaidOut => "paid-out",
        }
    }
}

impl fmt::Display for PlatformStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 结果列键 (Cell Key)
// ==========================================
// 必填字段 + 派生的平台状态列；序列化为列标题文本
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CellKey {
    Field(CanonicalField),
    PlatformStatus,
}

impl CellKey {
    /// 平台状态列标题
    pub const PLATFORM_STATUS_LABEL: &'static str = "Status in der uppr Performance Platform";

    pub fn label(&self) -> &'static str {
        match self {
            CellKey::Field(field) => field.label(),
            CellKey::PlatformStatus => Self::PLATFORM_STATUS_LABEL,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        if label == Self::PLATFORM_STATUS_LABEL {
            return Some(CellKey::PlatformStatus);
        }
        CanonicalField::from_label(label).map(CellKey::Field)
    }
}

impl From<CanonicalField> for CellKey {
    fn from(field: CanonicalField) -> Self {
        CellKey::Field(field)
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for CellKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for CellKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CellKeyVisitor;

        impl<'de> Visitor<'de> for CellKeyVisitor {
            type Value = CellKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "列标题文本")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<CellKey, E> {
                CellKey::from_label(v).ok_or_else(|| E::custom(format!("未知列标题: {}", v)))
            }
        }

        deserializer.deserialize_str(CellKeyVisitor)
    }
}
