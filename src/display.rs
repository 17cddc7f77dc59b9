//! Small formatting helpers shared by the console views

use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

/// Parses a backend timestamp.
///
/// Accepts RFC 3339 (normalised to UTC) and naive ISO-8601 with either a `T`
/// or a space separator, with or without fractional seconds.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// `2024-05-01`, or the raw text when it does not parse
pub fn format_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|ts| ts.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// `2024-05-01 14:03`, or the raw text when it does not parse
pub fn format_datetime(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// `N/A` for a missing date
pub fn format_optional_date(raw: Option<&str>) -> String {
    raw.map(format_date).unwrap_or_else(|| "N/A".to_string())
}

/// `1 email`, `3 emails`
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Cuts `text` to at most `max` characters, marking the cut with `...`
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Plain text for a loosely typed JSON value: strings unquoted, null empty
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `$12.50`; missing, null, empty or zero-like values render as `$0.00`
pub fn price_text(value: Option<&Value>) -> String {
    let text = value.map(value_text).unwrap_or_default();
    let is_blank = text.is_empty() || text.parse::<f64>().map(|v| v == 0.0).unwrap_or(false);
    if is_blank {
        "$0.00".to_string()
    } else {
        format!("${}", text)
    }
}
