//! 日期窗口过滤与日期解析 - 业务能力层

use crate::models::NA;
use chrono::{DateTime, Datelike, Duration, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

/// 按发布日期过滤的窗口
///
/// `days_back` 为空时不过滤。无法解析的日期一律放行（宁可多收，不误删）。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRangeFilter {
    days_back: Option<u32>,
}

impl DateRangeFilter {
    pub fn new(days_back: Option<u32>) -> Self {
        Self { days_back }
    }

    /// 不做任何过滤
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn days_back(&self) -> Option<u32> {
        self.days_back
    }

    /// 以给定日期为基准判断：`date >= today - days_back`
    pub fn includes_at(&self, date: &str, today: NaiveDate) -> bool {
        let Some(days) = self.days_back else {
            return true;
        };

        match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
            Ok(parsed) => parsed >= today - Duration::days(i64::from(days)),
            Err(_) => true,
        }
    }
}

const SWEDISH_MONTHS: [(&str, u32); 24] = [
    ("januari", 1),
    ("februari", 2),
    ("mars", 3),
    ("april", 4),
    ("maj", 5),
    ("juni", 6),
    ("juli", 7),
    ("augusti", 8),
    ("september", 9),
    ("oktober", 10),
    ("november", 11),
    ("december", 12),
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("sept", 9),
    ("okt", 10),
    ("nov", 11),
    ("dec", 12),
];

fn iso_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").expect("static regex"))
}

fn long_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d{1,2})\s+([a-zåäö]+)\.?(?:\s+(\d{4}))?").expect("static regex")
    })
}

fn relative_day_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bi\s?(dag|går)\b").expect("static regex"))
}

/// 将页面上的日期文本解析为 `YYYY-MM-DD`，无法识别时返回 `None`
///
/// 支持：
/// - ISO 日期 / 日期时间（`2024-01-05`、`2024-01-05T10:00:00+01:00`）
/// - 瑞典语长日期（`5 januari 2024`，缺年份时取 `today` 的年份）
/// - 相对日期（`idag`、`i dag`、`igår`、`i går`）
pub fn parse_listing_date(raw: &str, today: NaiveDate) -> Option<String> {
    let text = raw.trim().to_lowercase();
    if text.is_empty() || text == NA.to_lowercase() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(&text.to_uppercase()) {
        return Some(dt.date_naive().format("%Y-%m-%d").to_string());
    }

    if let Some(caps) = iso_date_re().captures(&text) {
        let date = NaiveDate::from_ymd_opt(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        )?;
        return Some(date.format("%Y-%m-%d").to_string());
    }

    if let Some(caps) = relative_day_re().captures(&text) {
        let date = if &caps[1] == "dag" {
            today
        } else {
            today - Duration::days(1)
        };
        return Some(date.format("%Y-%m-%d").to_string());
    }

    for caps in long_date_re().captures_iter(&text) {
        let Some(month) = swedish_month(&caps[2]) else {
            continue;
        };
        let day: u32 = caps[1].parse().ok()?;
        let year = match caps.get(3) {
            Some(y) => y.as_str().parse().ok()?,
            None => today.year(),
        };
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }

    None
}

fn swedish_month(word: &str) -> Option<u32> {
    SWEDISH_MONTHS
        .iter()
        .find(|(name, _)| *name == word)
        .map(|(_, month)| *month)
}
