// ==========================================
// 上传对账系统 - 时间戳解析
// ==========================================
// 上传侧格式（按顺序尝试）:
//   RFC3339 / YYYY-MM-DD HH:MM:SS / DD.MM.YYYY / DD.MM.YYYY HH:MM / MM/DD/YYYY
// 账本侧在此基础上额外接受纯 ISO 日期与不带时区的 ISO 日期时间
// 日期比较不做时区换算，直接比较各自书写的年月日
// ==========================================

use chrono::{DateTime, NaiveDate, NaiveDateTime};

// 形状模板: 'D' 为一位数字，其余字符原样匹配
// chrono 的 %Y / %m / %d 接受不足位数，先按模板卡住字段宽度
#[derive(Debug, Clone, Copy)]
struct Shape {
    template: &'static str,
    // 模板之后允许带小数秒等后缀
    open_ended: bool,
}

impl Shape {
    const fn exact(template: &'static str) -> Self {
        Self {
            template,
            open_ended: false,
        }
    }

    const fn prefix(template: &'static str) -> Self {
        Self {
            template,
            open_ended: true,
        }
    }

    fn matches(&self, s: &str) -> bool {
        let (s, t) = (s.as_bytes(), self.template.as_bytes());
        if s.len() < t.len() || (!self.open_ended && s.len() != t.len()) {
            return false;
        }
        t.iter().zip(s).all(|(t, c)| match t {
            b'D' => c.is_ascii_digit(),
            _ => t == c,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Layout {
    Rfc3339,
    DateTime(&'static str, Shape),
    Date(&'static str, Shape),
}

const UPLOAD_LAYOUTS: &[Layout] = &[
    Layout::Rfc3339,
    Layout::DateTime("%Y-%m-%d %H:%M:%S", Shape::exact("DDDD-DD-DD DD:DD:DD")),
    Layout::Date("%d.%m.%Y", Shape::exact("DD.DD.DDDD")),
    Layout::DateTime("%d.%m.%Y %H:%M", Shape::exact("DD.DD.DDDD DD:DD")),
    Layout::Date("%m/%d/%Y", Shape::exact("DD/DD/DDDD")),
];

const LEDGER_EXTRA_LAYOUTS: &[Layout] = &[
    Layout::Date("%Y-%m-%d", Shape::exact("DDDD-DD-DD")),
    Layout::DateTime("%Y-%m-%dT%H:%M:%S%.f", Shape::prefix("DDDD-DD-DDTDD:DD:DD")),
    Layout::DateTime("%Y-%m-%d %H:%M:%S%.f", Shape::prefix("DDDD-DD-DD DD:DD:DD")),
];

impl Layout {
    fn parse(&self, s: &str) -> Option<NaiveDateTime> {
        match self {
            // 保留原始偏移下的本地时间
            Layout::Rfc3339 => DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_local()),
            Layout::DateTime(fmt, shape) => shape
                .matches(s)
                .then(|| NaiveDateTime::parse_from_str(s, fmt).ok())
                .flatten(),
            Layout::Date(fmt, shape) => shape
                .matches(s)
                .then(|| NaiveDate::parse_from_str(s, fmt).ok())
                .flatten()
                .and_then(|d| d.and_hms_opt(0, 0, 0)),
        }
    }
}

fn parse_with(layouts: &[Layout], s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    layouts.iter().find_map(|layout| layout.parse(s))
}

/// 解析上传文件中的时间戳
pub fn parse_flexible(s: &str) -> Option<NaiveDateTime> {
    parse_with(UPLOAD_LAYOUTS, s)
}

/// 解析账本订单中的时间戳
pub fn parse_ledger_timestamp(s: &str) -> Option<NaiveDateTime> {
    parse_flexible(s).or_else(|| parse_with(LEDGER_EXTRA_LAYOUTS, s))
}

/// 同一自然日判断；任一方无法解析时返回 None
pub fn same_calendar_day(upload: &str, ledger: &str) -> Option<bool> {
    let upload = parse_flexible(upload)?;
    let ledger = parse_ledger_timestamp(ledger)?;
    Some(upload.date() == ledger.date())
}
