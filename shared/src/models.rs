use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

/// A single cell as handed over by the file decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
    Absent,
}

impl RawValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, RawValue::Absent)
    }

    /// Renders the value as plain text, the way a spreadsheet cell would be read back
    /// as a string. `None` for absent cells.
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Text(s) => Some(s.clone()),
            RawValue::Number(n) => Some(n.to_string()),
            RawValue::Date(dt) => Some(dt.date().format("%Y-%m-%d").to_string()),
            RawValue::Absent => None,
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

/// One input row: header text to raw cell, in original column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<(String, RawValue)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, header: impl Into<String>, value: RawValue) {
        self.cells.push((header.into(), value));
    }

    /// First cell stored under exactly `header`.
    pub fn get(&self, header: &str) -> Option<&RawValue> {
        self.cells
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v)
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(h, _)| h.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &RawValue> {
        self.cells.iter().map(|(_, v)| v)
    }
}

impl<K: Into<String>> FromIterator<(K, RawValue)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, RawValue)>>(iter: I) -> Self {
        RawRow {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Canonical purchase record, independent of how the export named its columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub title: Option<String>,
    pub place: String,
    /// `None` when the cell was missing or could not be read as a number.
    pub price: Option<f64>,
    pub purchase_date: Option<NaiveDate>,
    pub date_added: Option<NaiveDate>,
}

impl BookRecord {
    pub fn has_price(&self) -> bool {
        self.price.is_some()
    }

    /// Purchase date if known, otherwise the date the book was added.
    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.purchase_date.or(self.date_added)
    }
}

/// Calendar month bucket, ordered chronologically and rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// `None` unless `month` is in `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(MonthKey { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn succ(&self) -> Self {
        if self.month == 12 {
            MonthKey {
                year: self.year + 1,
                month: 1,
            }
        } else {
            MonthKey {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceCount {
    pub place: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceValue {
    pub place: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthCount {
    pub month: MonthKey,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthValue {
    pub month: MonthKey,
    pub value: f64,
}

/// Aggregate statistics over one loaded dataset.
///
/// Every place and month entry is derived from priced records only;
/// `total_record_count` counts every row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_record_count: usize,
    pub records_with_price_count: usize,
    pub total_value: f64,
    pub books_by_place: Vec<PlaceCount>,
    pub value_by_place: Vec<PlaceValue>,
    pub purchases_per_month: Vec<MonthCount>,
    pub value_per_month: Vec<MonthValue>,
}

impl StatsSummary {
    /// Copy of the summary keeping only the first `limit` entries of each place
    /// breakdown. A limit of zero keeps everything.
    pub fn with_top_places(&self, limit: usize) -> StatsSummary {
        let mut view = self.clone();
        if limit > 0 {
            view.books_by_place.truncate(limit);
            view.value_by_place.truncate(limit);
        }
        view
    }
}
