// Date coercion across encodings: structured dates, epoch timestamps, spreadsheet
// day serials and free text
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use shared::models::{MonthKey, RawValue};

/// Above this a number is milliseconds since the Unix epoch.
const EPOCH_MILLIS_THRESHOLD: f64 = 1e12;
/// Above this (and up to the millisecond threshold) a number is epoch seconds.
const EPOCH_SECONDS_THRESHOLD: f64 = 1e9;
/// Above this (and up to the seconds threshold) a number is a spreadsheet day serial.
/// Anything smaller is not treated as a date at all.
const DAY_SERIAL_THRESHOLD: f64 = 10_000.0;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Day zero of spreadsheet serial dates. Starting on 1899-12-30 rather than
/// 1900-01-01 absorbs the fictitious 1900-02-29 those formats count.
fn spreadsheet_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

/// Converts a raw cell into a calendar date. Anything that cannot be read as a
/// plausible date yields `None`.
pub fn coerce_date(value: &RawValue) -> Option<NaiveDate> {
    match value {
        RawValue::Date(dt) => Some(dt.date()),
        RawValue::Number(n) => date_from_number(*n),
        RawValue::Text(s) => date_from_text(s),
        RawValue::Absent => None,
    }
}

pub fn date_from_number(v: f64) -> Option<NaiveDate> {
    if !v.is_finite() {
        None
    } else if v > EPOCH_MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(v as i64).map(|dt| dt.date_naive())
    } else if v > EPOCH_SECONDS_THRESHOLD {
        DateTime::from_timestamp_millis((v * 1000.0) as i64).map(|dt| dt.date_naive())
    } else if v > DAY_SERIAL_THRESHOLD {
        spreadsheet_epoch()?.checked_add_days(Days::new(v.round() as u64))
    } else {
        None
    }
}

pub fn date_from_text(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(n) = trimmed.parse::<f64>() {
        if n.is_finite() {
            return date_from_number(n);
        }
    }
    parse_calendar_text(trimmed)
}

fn parse_calendar_text(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local().date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_local().date());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    // Bare "YYYY-MM" means the first of that month.
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d").ok()
}

/// Year-month bucket of a date.
pub fn month_key(date: Option<NaiveDate>) -> Option<MonthKey> {
    date.map(MonthKey::from_date)
}
