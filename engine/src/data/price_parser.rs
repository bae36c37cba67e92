// Locale-ambiguous price parsing ("1.234,56", "12,5", "$ 20000", "10.000")
use once_cell::sync::Lazy;
use regex::Regex;
use shared::models::RawValue;

static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9,.\-]").expect("static pattern is valid"));

// Dot-grouped thousands: "10.000", "1.234.567".
static DOT_GROUPED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]{1,3}(\.[0-9]{3})+$").expect("static pattern is valid"));

/// Reads a cell as a price. `None` means "no usable price", which is distinct from a
/// valid zero.
pub fn parse_price(value: &RawValue) -> Option<f64> {
    match value {
        RawValue::Absent => None,
        RawValue::Number(n) => n.is_finite().then_some(*n),
        RawValue::Text(s) => parse_price_text(s),
        RawValue::Date(_) => None,
    }
}

pub fn parse_price_text(raw: &str) -> Option<f64> {
    let cleaned = DISALLOWED.replace_all(raw.trim(), "");
    if cleaned.is_empty() {
        return None;
    }

    let has_dot = cleaned.contains('.');
    let has_comma = cleaned.contains(',');
    let canonical = if has_dot && has_comma {
        cleaned.replace('.', "").replace(',', ".")
    } else if has_comma {
        cleaned.replace(',', ".")
    } else if DOT_GROUPED.is_match(&cleaned) {
        cleaned.replace('.', "")
    } else {
        cleaned.into_owned()
    };

    leading_float(&canonical).filter(|n| n.is_finite())
}

/// Parses the longest prefix of `s` that forms a decimal number, so trailing noise
/// such as a second decimal point or a dangling minus sign is ignored.
fn leading_float(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        let frac_digits = frac_end - frac_start;
        if digits + frac_digits > 0 {
            end = frac_end;
            digits += frac_digits;
        }
    }
    if digits == 0 {
        return None;
    }
    s[..end].parse::<f64>().ok()
}
