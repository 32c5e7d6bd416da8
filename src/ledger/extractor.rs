// ==========================================
// 上传对账系统 - 账本订单提取
// ==========================================
// 上游响应没有固定结构: 递归遍历所有层级的数组与对象，
// 任一对象只要能按别名取到 token / subid / timestamp 之一即视为订单
// 提取后按 (token, subid, timestamp) 去重，先出现者保留
// ==========================================

use crate::domain::order::{ExternalOrder, STATUS_UNKNOWN};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

// ==========================================
// 字段别名（历史上出现过的拼写）
// ==========================================
pub const ORDER_TOKEN_KEYS: &[&str] = &[
    "ordertoken",
    "orderToken",
    "order_token",
    "orderid",
    "orderId",
];
pub const SUBSCRIBER_ID_KEYS: &[&str] = &["subid", "subId", "sub_id"];
pub const TIMESTAMP_KEYS: &[&str] = &["timestamp", "time", "created_at", "createdAt"];
pub const STATUS_KEYS: &[&str] = &["status"];

// ==========================================
// KeyValueView - 与具体结构无关的键值视图
// ==========================================
pub trait KeyValueView {
    /// 标量值的文本形式（已去空白）；缺失 / null / 嵌套结构返回 None
    fn scalar_text(&self, key: &str) -> Option<String>;

    /// 整数值: 整数、浮点（截断）或数字字符串；其余返回 None
    fn integer(&self, key: &str) -> Option<i64>;
}

impl KeyValueView for Map<String, Value> {
    fn scalar_text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    fn integer(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            }),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }
}

impl KeyValueView for BTreeMap<String, String> {
    fn scalar_text(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| v.trim().to_string())
    }

    fn integer(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.trim().parse::<i64>().ok())
    }
}

/// 按别名顺序取第一个非空文本
pub fn lookup_text<V: KeyValueView + ?Sized>(view: &V, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| view.scalar_text(key))
        .find(|v| !v.is_empty())
        .unwrap_or_default()
}

/// 按别名顺序取第一个可转换的状态码，否则为未知
pub fn lookup_status<V: KeyValueView + ?Sized>(view: &V, keys: &[&str]) -> i64 {
    keys.iter()
        .find_map(|key| view.integer(key))
        .unwrap_or(STATUS_UNKNOWN)
}

/// 将一个键值视图解释为订单；无任何标识字段时返回 None
pub fn order_from_view<V: KeyValueView + ?Sized>(view: &V) -> Option<ExternalOrder> {
    let order = ExternalOrder {
        order_token: lookup_text(view, ORDER_TOKEN_KEYS),
        subscriber_id: lookup_text(view, SUBSCRIBER_ID_KEYS),
        timestamp: lookup_text(view, TIMESTAMP_KEYS),
        status_code: lookup_status(view, STATUS_KEYS),
    };

    order.has_identity().then_some(order)
}

// ==========================================
// JSON 递归遍历
// ==========================================
pub trait JsonVisitor {
    fn visit_object(&mut self, object: &Map<String, Value>);

    fn visit_scalar(&mut self, _value: &Value) {}
}

/// 先序遍历: 对象本身先被访问，再进入其各个值
pub fn walk_json<V: JsonVisitor + ?Sized>(value: &Value, visitor: &mut V) {
    match value {
        Value::Array(items) => {
            for item in items {
                walk_json(item, visitor);
            }
        }
        Value::Object(object) => {
            visitor.visit_object(object);
            for child in object.values() {
                walk_json(child, visitor);
            }
        }
        scalar => visitor.visit_scalar(scalar),
    }
}

#[derive(Default)]
struct OrderCollector {
    orders: Vec<ExternalOrder>,
}

impl JsonVisitor for OrderCollector {
    fn visit_object(&mut self, object: &Map<String, Value>) {
        if let Some(order) = order_from_view(object) {
            self.orders.push(order);
        }
    }
}

/// 从任意结构的 JSON 中提取订单（已去重）
pub fn extract_orders(value: &Value) -> Vec<ExternalOrder> {
    let mut collector = OrderCollector::default();
    walk_json(value, &mut collector);
    dedupe_orders(collector.orders)
}

/// 按 (token, subid, timestamp) 去重，保留首次出现
pub fn dedupe_orders(orders: Vec<ExternalOrder>) -> Vec<ExternalOrder> {
    let keep: Vec<bool> = {
        let mut seen = HashSet::new();
        orders.iter().map(|o| seen.insert(o.dedup_key())).collect()
    };

    orders
        .into_iter()
        .zip(keep)
        .filter_map(|(order, keep)| keep.then_some(order))
        .collect()
}
