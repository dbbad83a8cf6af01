// Utility helpers for parsing and formatting.
//
// The report service is loose about types (numbers arrive as strings, dates
// in several shapes), so all of that forgiveness lives here and the rest of
// the code works with clean, typed values.
use crate::types::ReportTime;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use num_format::{Locale, ToFormattedString};
use serde_json::Value;

/// Non-blank string value. Anything else is `None`.
pub fn parse_string(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Parse a head count. Accepts non-negative integers, integral floats and
/// numeric strings (`"1,200"` included); returns `None` for anything else.
pub fn parse_count(v: Option<&Value>) -> Option<u64> {
    match v? {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                return Some(u);
            }
            let f = n.as_f64()?;
            if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
                Some(f as u64)
            } else {
                None
            }
        }
        Value::String(s) => {
            let s = s.trim().replace(',', "");
            if s.is_empty() {
                return None;
            }
            s.parse::<u64>().ok()
        }
        _ => None,
    }
}

pub fn parse_f64_safe(v: Option<&Value>) -> Option<f64> {
    let f = match v? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() || s.chars().any(|c| c.is_ascii_alphabetic()) {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };
    f.is_finite().then_some(f)
}

/// Need tags as a list of strings; non-string entries are dropped.
pub fn parse_tags(v: Option<&Value>) -> Vec<String> {
    match v {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Anything that is not a usable point in time is `Absent`, including epoch
/// milliseconds outside the range chrono can represent.
pub fn parse_timestamp(v: Option<&Value>) -> ReportTime {
    let parsed = match v {
        Some(Value::String(s)) => parse_date_str(s.trim()),
        // Numbers are epoch milliseconds, as a browser `Date` would read them.
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            })
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    };
    parsed.map_or(ReportTime::Absent, ReportTime::At)
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals with thousands separators on the integer part,
    // e.g. `1,234,567.89`.
    let s = format!("{:.*}", decimals, n.abs());
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s.as_str(), None),
    };
    let int_val: u64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if n.is_sign_negative() && n != 0.0 {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
