// ==========================================
// 上传对账系统 - 校验引擎
// ==========================================
// 输入: 行记录 + 账本订单
// 输出: 每条记录一行 ValidatedRow（必填字段单元格 + 平台状态列 + 两条备注）
// 红线: 单元格级问题只编码为状态（invalid/empty），不抛错
// ==========================================

use crate::domain::order::ExternalOrder;
use crate::domain::types::{CanonicalField, CellKey, CellStatus, PlatformStatus};
use crate::domain::upload::{Record, ValidatedCell, ValidatedRow};
use crate::engine::timestamp::{parse_flexible, same_calendar_day};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info};

// ==========================================
// 备注与提示文本
// ==========================================
pub const REMARK_OPERATOR_IN_NETWORK: &str = "already in network";
pub const REMARK_PUBLISHER_FOLLOW_UP: &str = "further processing follows advertiser feedback";
pub const NOTE_TIMESTAMP_UNREADABLE: &str = "timestamp unreadable";
pub const NOTE_TIMESTAMP_MISMATCH: &str = "timestamp does not match network";

/// 订单号列的已知别名列名
pub const ORDER_TOKEN_ALIAS_COLUMN: &str = "Ordertoken/Order ID";

// ==========================================
// LedgerIndex - 账本查找表
// ==========================================
// token 重复时后写入者覆盖
struct LedgerIndex<'a> {
    by_token: HashMap<&'a str, &'a ExternalOrder>,
    subscriber_ids: HashSet<&'a str>,
}

impl<'a> LedgerIndex<'a> {
    fn build(orders: &'a [ExternalOrder]) -> Self {
        let mut by_token = HashMap::new();
        let mut subscriber_ids = HashSet::new();

        for order in orders {
            let token = order.order_token.trim();
            if !token.is_empty() {
                by_token.insert(token, order);
            }
            if !order.subscriber_id.is_empty() {
                subscriber_ids.insert(order.subscriber_id.as_str());
            }
        }

        Self {
            by_token,
            subscriber_ids,
        }
    }

    fn order(&self, token: &str) -> Option<&'a ExternalOrder> {
        self.by_token.get(token).copied()
    }

    fn knows_subscriber(&self, subid: &str) -> bool {
        self.subscriber_ids.contains(subid)
    }
}

// ==========================================
// 订单号解析结果
// ==========================================
enum TokenResolution<'r, 'a> {
    /// 命中账本的候选值
    Matched {
        token: &'r str,
        order: &'a ExternalOrder,
    },
    /// 有候选值但均未命中，展示第一个
    Unmatched(&'r str),
    /// 无任何候选值
    Missing,
}

impl<'r, 'a> TokenResolution<'r, 'a> {
    fn order(&self) -> Option<&'a ExternalOrder> {
        match self {
            TokenResolution::Matched { order, .. } => Some(order),
            _ => None,
        }
    }
}

/// 订单号候选值，按固定顺序:
/// 必填列 → 别名列 → 其余列名含 "order"（不区分大小写）的列（表头顺序）
pub fn order_token_candidates(record: &Record) -> Vec<&str> {
    let canonical = CanonicalField::OrderToken.label();
    let mut candidates = Vec::new();

    for header in [canonical, ORDER_TOKEN_ALIAS_COLUMN] {
        if let Some(value) = record.get(header).map(str::trim) {
            if !value.is_empty() {
                candidates.push(value);
            }
        }
    }

    for (header, value) in record.columns() {
        if header == canonical || header == ORDER_TOKEN_ALIAS_COLUMN {
            continue;
        }
        let value = value.trim();
        if header.to_lowercase().contains("order") && !value.is_empty() {
            candidates.push(value);
        }
    }

    candidates
}

// ==========================================
// ValidationEngine
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidationEngine;

impl ValidationEngine {
    pub fn new() -> Self {
        Self
    }

    /// 校验全部记录（顺序与输入一致）
    pub fn validate(&self, records: &[Record], orders: &[ExternalOrder]) -> Vec<ValidatedRow> {
        let index = LedgerIndex::build(orders);
        info!(
            orders = orders.len(),
            tokens = index.by_token.len(),
            subids = index.subscriber_ids.len(),
            rows = records.len(),
            "开始校验上传记录"
        );

        let rows: Vec<ValidatedRow> = records
            .iter()
            .enumerate()
            .map(|(idx, record)| self.validate_record(&index, idx, record))
            .collect();

        let count = |status: CellStatus| {
            rows.iter()
                .flat_map(|r| r.cells.values())
                .filter(|c| c.status == status)
                .count()
        };
        info!(
            rows = rows.len(),
            in_network = rows.iter().filter(|r| !r.remark_operator.is_empty()).count(),
            invalid_cells = count(CellStatus::Invalid),
            empty_cells = count(CellStatus::Empty),
            "上传记录校验完成"
        );

        rows
    }

    fn validate_record(&self, index: &LedgerIndex<'_>, idx: usize, record: &Record) -> ValidatedRow {
        let resolution = self.resolve_order_token(index, record);
        let mut cells = BTreeMap::new();
        let mut in_network = false;

        for field in CanonicalField::ALL {
            let value = record.field(field).trim();

            let cell = match field {
                CanonicalField::OrderToken => match &resolution {
                    TokenResolution::Matched { token, .. } => {
                        in_network = true;
                        ValidatedCell::ok(*token)
                    }
                    TokenResolution::Unmatched(first) => ValidatedCell::invalid(*first),
                    TokenResolution::Missing => ValidatedCell::empty(),
                },
                CanonicalField::SubId => {
                    if value.is_empty() {
                        ValidatedCell::empty()
                    } else if index.knows_subscriber(value) {
                        in_network = true;
                        ValidatedCell::ok(value)
                    } else {
                        ValidatedCell::invalid(value)
                    }
                }
                CanonicalField::Timestamp => self.validate_timestamp(value, resolution.order()),
                _ => ValidatedCell::from_value(value),
            };

            cells.insert(CellKey::Field(field), cell);
        }

        // 候选列与订单号解析相同，未命中时重扫不会得到新结果
        if let Some(status) = resolution
            .order()
            .and_then(|order| PlatformStatus::from_code(order.status_code))
        {
            cells.insert(CellKey::PlatformStatus, ValidatedCell::ok(status.label()));
        }

        debug!(
            row = idx,
            source_row = record.row_number,
            token = ?resolution.order().map(|o| o.order_token.as_str()),
            in_network = in_network,
            "记录校验完成"
        );

        let (remark_operator, remark_publisher) = if in_network {
            (
                REMARK_OPERATOR_IN_NETWORK.to_string(),
                REMARK_PUBLISHER_FOLLOW_UP.to_string(),
            )
        } else {
            (String::new(), String::new())
        };

        ValidatedRow {
            index: idx,
            cells,
            remark_operator,
            remark_publisher,
        }
    }

    fn resolve_order_token<'r, 'a>(
        &self,
        index: &LedgerIndex<'a>,
        record: &'r Record,
    ) -> TokenResolution<'r, 'a> {
        let candidates = order_token_candidates(record);

        for &candidate in &candidates {
            if let Some(order) = index.order(candidate) {
                return TokenResolution::Matched {
                    token: candidate,
                    order,
                };
            }
        }

        match candidates.first() {
            Some(&first) => TokenResolution::Unmatched(first),
            None => TokenResolution::Missing,
        }
    }

    fn validate_timestamp(&self, value: &str, order: Option<&ExternalOrder>) -> ValidatedCell {
        if value.is_empty() {
            return ValidatedCell::empty();
        }

        if parse_flexible(value).is_none() {
            return ValidatedCell::invalid(value).with_note(NOTE_TIMESTAMP_UNREADABLE);
        }

        // 与账本订单的日期比对（仅当订单号已命中且账本时间可解析）
        let same_day = order
            .map(|o| o.timestamp.trim())
            .filter(|ts| !ts.is_empty())
            .and_then(|ts| same_calendar_day(value, ts));

        match same_day {
            Some(false) => ValidatedCell::invalid(value).with_note(NOTE_TIMESTAMP_MISMATCH),
            _ => ValidatedCell::ok(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(token: &str, subid: &str, timestamp: &str, status: i64) -> ExternalOrder {
        ExternalOrder {
            order_token: token.to_string(),
            subscriber_id: subid.to_string(),
            timestamp: timestamp.to_string(),
            status_code: status,
        }
    }

    fn record(pairs: &[(&str, &str)]) -> Record {
        let mut record = Record::new(1);
        for (header, value) in pairs {
            record.insert(*header, *value);
        }
        record
    }

    fn validate_one(record: Record, orders: &[ExternalOrder]) -> ValidatedRow {
        ValidationEngine::new()
            .validate(&[record], orders)
            .pop()
            .unwrap()
    }

    #[test]
    fn test_candidate_order() {
        let rec = record(&[
            ("Kunden-Order-Nr", "X1"),
            ("Ordertoken/Order ID", "A1"),
            ("Ordertoken/OrderID", "C1"),
            ("SubID", "S"),
            ("order ref", " "),
        ]);

        assert_eq!(order_token_candidates(&rec), vec!["C1", "A1", "X1"]);
    }

    #[test]
    fn test_token_found_in_extra_order_column() {
        let orders = vec![order("T9", "", "", 2)];
        let rec = record(&[("Ordertoken/OrderID", "WRONG"), ("Bestellnummer (Order)", "T9")]);

        let row = validate_one(rec, &orders);

        let cell = row.cell(CanonicalField::OrderToken).unwrap();
        assert_eq!(cell.status, CellStatus::Ok);
        assert_eq!(cell.value, "T9");
        assert_eq!(row.platform_status().unwrap().value, "cancelled");
        assert_eq!(row.remark_operator, REMARK_OPERATOR_IN_NETWORK);
    }

    #[test]
    fn test_token_missing_everywhere() {
        let row = validate_one(record(&[("Ordertoken/OrderID", "  ")]), &[]);

        let cell = row.cell(CanonicalField::OrderToken).unwrap();
        assert_eq!(cell.status, CellStatus::Empty);
        assert_eq!(cell.value, "");
        assert!(row.platform_status().is_none());
        assert_eq!(row.remark_publisher, "");
    }

    #[test]
    fn test_duplicate_tokens_last_write_wins() {
        let orders = vec![order("T1", "", "", 0), order(" T1 ", "", "", 3)];

        let row = validate_one(record(&[("Ordertoken/OrderID", "T1")]), &orders);

        assert_eq!(row.platform_status().unwrap().value, "paid-out");
    }

    #[test]
    fn test_unknown_status_code_has_no_platform_cell() {
        let orders = vec![order("T1", "", "", -1), order("T2", "", "", 7)];

        for token in ["T1", "T2"] {
            let row = validate_one(record(&[("Ordertoken/OrderID", token)]), &orders);
            assert_eq!(row.cell(CanonicalField::OrderToken).unwrap().status, CellStatus::Ok);
            assert!(row.platform_status().is_none());
        }
    }

    #[test]
    fn test_subid_match_alone_fires_remarks() {
        let orders = vec![order("T1", "S1", "", 1)];

        let row = validate_one(record(&[("SubID", "S1"), ("Ordertoken/OrderID", "NOPE")]), &orders);

        assert_eq!(row.cell(CanonicalField::SubId).unwrap().status, CellStatus::Ok);
        assert_eq!(row.cell(CanonicalField::OrderToken).unwrap().status, CellStatus::Invalid);
        assert_eq!(row.remark_operator, REMARK_OPERATOR_IN_NETWORK);
        assert_eq!(row.remark_publisher, REMARK_PUBLISHER_FOLLOW_UP);
    }

    #[test]
    fn test_timestamp_unreadable() {
        let row = validate_one(record(&[("Timestamp", "gestern")]), &[]);

        let cell = row.cell(CanonicalField::Timestamp).unwrap();
        assert_eq!(cell.status, CellStatus::Invalid);
        assert_eq!(cell.note.as_deref(), Some(NOTE_TIMESTAMP_UNREADABLE));
    }

    #[test]
    fn test_short_year_is_unreadable_even_when_matched() {
        let orders = vec![order("T1", "", "2024-03-20", 1)];

        for value in ["20.03.24", "1.3.2024"] {
            let row = validate_one(
                record(&[("Timestamp", value), ("Ordertoken/OrderID", "T1")]),
                &orders,
            );
            let cell = row.cell(CanonicalField::Timestamp).unwrap();
            assert_eq!(cell.status, CellStatus::Invalid, "{}", value);
            assert_eq!(cell.note.as_deref(), Some(NOTE_TIMESTAMP_UNREADABLE));
        }
    }

    #[test]
    fn test_timestamp_compared_only_with_resolved_order() {
        let orders = vec![order("T1", "", "2024-03-20", 1)];

        // 订单号未命中 → 不做日期比对
        let row = validate_one(
            record(&[("Timestamp", "01.01.2020"), ("Ordertoken/OrderID", "T2")]),
            &orders,
        );
        assert_eq!(row.cell(CanonicalField::Timestamp).unwrap().status, CellStatus::Ok);

        // 账本时间不可解析 → 不做日期比对
        let orders = vec![order("T1", "", "irgendwann", 1)];
        let row = validate_one(
            record(&[("Timestamp", "01.01.2020"), ("Ordertoken/OrderID", "T1")]),
            &orders,
        );
        assert_eq!(row.cell(CanonicalField::Timestamp).unwrap().status, CellStatus::Ok);
    }

    #[test]
    fn test_empty_timestamp_with_resolved_order_stays_empty() {
        let orders = vec![order("T1", "", "2024-03-20", 1)];

        let row = validate_one(record(&[("Ordertoken/OrderID", "T1")]), &orders);

        let cell = row.cell(CanonicalField::Timestamp).unwrap();
        assert_eq!(cell.status, CellStatus::Empty);
        assert!(cell.note.is_none());
    }

    #[test]
    fn test_all_mandatory_cells_present() {
        let row = validate_one(record(&[("Publisher ID", "P1")]), &[]);

        assert_eq!(row.cells.len(), 8);
        assert_eq!(row.cell(CanonicalField::PublisherId).unwrap().status, CellStatus::Ok);
        assert_eq!(row.cell(CanonicalField::CustomerEmail).unwrap().status, CellStatus::Empty);
    }

    #[test]
    fn test_index_follows_input_order() {
        let records = vec![record(&[("SubID", "a")]), record(&[("SubID", "b")])];

        let rows = ValidationEngine::new().validate(&records, &[]);

        assert_eq!(rows.iter().map(|r| r.index).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(rows[1].cell(CanonicalField::SubId).unwrap().value, "b");
    }
}
