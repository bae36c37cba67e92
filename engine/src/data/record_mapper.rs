// Maps raw rows onto canonical BookRecords using headers resolved once per dataset
use shared::models::{BookRecord, RawRow, RawValue};

use super::date_coercer::coerce_date;
use super::header_resolver::resolve_header;
use super::price_parser::parse_price;
use crate::config::{EngineSettings, Field, FieldAliases};

/// Raw header chosen for each field, `None` when the dataset has no such column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedHeaders {
    pub title: Option<String>,
    pub place: Option<String>,
    pub price: Option<String>,
    pub purchase_date: Option<String>,
    pub date_added: Option<String>,
}

impl ResolvedHeaders {
    /// Resolves every field against a single representative row. Headers are
    /// assumed uniform across the dataset.
    pub fn resolve(sample: &RawRow, aliases: &FieldAliases) -> Self {
        let mut resolved = ResolvedHeaders::default();
        for field in Field::ALL {
            let header = resolve_header(sample, aliases.for_field(field)).map(str::to_string);
            match &header {
                Some(h) => tracing::debug!(field = field.name(), header = %h, "Resolved header"),
                None => tracing::warn!(
                    field = field.name(),
                    "No header matched; field is absent for every row"
                ),
            }
            *resolved.slot_mut(field) = header;
        }
        resolved
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Title => self.title.as_deref(),
            Field::Place => self.place.as_deref(),
            Field::Price => self.price.as_deref(),
            Field::PurchaseDate => self.purchase_date.as_deref(),
            Field::DateAdded => self.date_added.as_deref(),
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Place => &mut self.place,
            Field::Price => &mut self.price,
            Field::PurchaseDate => &mut self.purchase_date,
            Field::DateAdded => &mut self.date_added,
        }
    }
}

pub struct RecordMapper {
    headers: ResolvedHeaders,
    no_place_label: String,
}

impl RecordMapper {
    /// Resolves headers from the first row. An empty dataset leaves every field
    /// unresolved.
    pub fn for_rows(rows: &[RawRow], settings: &EngineSettings) -> Self {
        let headers = rows
            .first()
            .map(|sample| ResolvedHeaders::resolve(sample, &settings.aliases))
            .unwrap_or_default();
        RecordMapper::new(headers, settings.no_place_label.clone())
    }

    pub fn new(headers: ResolvedHeaders, no_place_label: impl Into<String>) -> Self {
        RecordMapper {
            headers,
            no_place_label: no_place_label.into(),
        }
    }

    pub fn headers(&self) -> &ResolvedHeaders {
        &self.headers
    }

    pub fn map_row(&self, row: &RawRow) -> BookRecord {
        BookRecord {
            title: self.cell(row, Field::Title).as_text(),
            place: self.place(row),
            price: parse_price(self.cell(row, Field::Price)),
            purchase_date: coerce_date(self.cell(row, Field::PurchaseDate)),
            date_added: coerce_date(self.cell(row, Field::DateAdded)),
        }
    }

    pub fn map_rows(&self, rows: &[RawRow]) -> Vec<BookRecord> {
        rows.iter().map(|row| self.map_row(row)).collect()
    }

    fn cell<'r>(&self, row: &'r RawRow, field: Field) -> &'r RawValue {
        self.headers
            .get(field)
            .and_then(|h| row.get(h))
            .unwrap_or(&RawValue::Absent)
    }

    fn place(&self, row: &RawRow) -> String {
        match self.cell(row, Field::Place).as_text() {
            Some(text) if !text.trim().is_empty() => text,
            _ => self.no_place_label.clone(),
        }
    }
}

/// Resolves headers once and maps every row, preserving order. Rows are never
/// dropped.
pub fn map_records(rows: &[RawRow], settings: &EngineSettings) -> Vec<BookRecord> {
    RecordMapper::for_rows(rows, settings).map_rows(rows)
}
