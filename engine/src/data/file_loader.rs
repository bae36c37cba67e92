// Decodes the first sheet of a CSV or spreadsheet export into generic raw rows
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use shared::models::{RawRow, RawValue};

use crate::config::EngineSettings;
use crate::error::{EngineError, EngineResult};

const CANDIDATE_DELIMITERS: [u8; 3] = [b',', b';', b'\t'];
const EMPTY_HEADER: &str = "__EMPTY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Spreadsheet,
}

impl FileFormat {
    /// Picks the decoder from the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> EngineResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(FileFormat::Spreadsheet),
            _ => Err(EngineError::UnsupportedFormat(format!(
                "'{}' (expected .csv, .xlsx, .xls, .xlsb or .ods)",
                path.display()
            ))),
        }
    }
}

pub struct FileLoader {
    delimiter: Option<u8>,
}

impl FileLoader {
    pub fn new(settings: &EngineSettings) -> Self {
        FileLoader {
            // Settings validation guarantees an ASCII delimiter.
            delimiter: settings.csv_delimiter.map(|c| c as u8),
        }
    }

    pub fn load_rows(&self, path: impl AsRef<Path>) -> EngineResult<Vec<RawRow>> {
        let path = path.as_ref();
        match FileFormat::from_path(path)? {
            FileFormat::Csv => {
                let bytes = fs::read(path)?;
                self.read_csv(&bytes)
            }
            FileFormat::Spreadsheet => read_first_sheet(path),
        }
    }

    /// Parses CSV bytes whose first record is the header row. Empty cells become
    /// `RawValue::Absent`; everything else is kept as untrimmed text. Bytes that are
    /// not valid UTF-8 (Latin-1 exports) are replaced rather than failing the file.
    pub fn read_csv(&self, bytes: &[u8]) -> EngineResult<Vec<RawRow>> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let delimiter = self.delimiter.unwrap_or_else(|| sniff_delimiter(bytes));
        let mut rdr = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers = header_names(rdr.byte_headers()?.iter().map(lossy_text));
        let mut rows = Vec::new();
        for result in rdr.byte_records() {
            let record = result?;
            let row: RawRow = headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let value = match record.get(i) {
                        Some(cell) if !cell.is_empty() => RawValue::Text(lossy_text(cell)),
                        _ => RawValue::Absent,
                    };
                    (header.clone(), value)
                })
                .collect();
            push_unless_blank(&mut rows, row);
        }
        Ok(rows)
    }
}

fn lossy_text(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}

fn read_first_sheet(path: &Path) -> EngineResult<Vec<RawRow>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(EngineError::EmptyWorkbook)??;

    let mut sheet_rows = range.rows();
    let Some(header_cells) = sheet_rows.next() else {
        return Ok(Vec::new());
    };
    let headers = header_names(header_cells.iter().map(header_text));

    let mut rows = Vec::new();
    for cells in sheet_rows {
        let row: RawRow = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let value = cells.get(i).map(cell_to_raw).unwrap_or(RawValue::Absent);
                (header.clone(), value)
            })
            .collect();
        push_unless_blank(&mut rows, row);
    }
    Ok(rows)
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        other => other.to_string(),
    }
}

/// Spreadsheet cell to raw value. Date-typed cells are handed on as day serials,
/// the same encoding an untyped spreadsheet read produces.
pub fn cell_to_raw(cell: &Data) -> RawValue {
    match cell {
        Data::Empty | Data::Error(_) => RawValue::Absent,
        Data::String(s) if s.is_empty() => RawValue::Absent,
        Data::String(s) => RawValue::Text(s.clone()),
        Data::Int(i) => RawValue::Number(*i as f64),
        Data::Float(f) => RawValue::Number(*f),
        Data::Bool(b) => RawValue::Text(b.to_string()),
        Data::DateTime(dt) => RawValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawValue::Text(s.clone()),
    }
}

/// Most frequent of `,` `;` tab in the header line; comma on ties or when none
/// appears.
pub fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let header_line = bytes.split(|&b| b == b'\n').next().unwrap_or_default();
    let mut best = CANDIDATE_DELIMITERS[0];
    let mut best_count = 0;
    for candidate in CANDIDATE_DELIMITERS {
        let count = header_line.iter().filter(|&&b| b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// Names every column: blank headers become `__EMPTY`, repeats get the first free
/// `_1`, `_2`, ... suffix, so every name is unique.
fn header_names<I: IntoIterator<Item = String>>(raw: I) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::new();
    for h in raw {
        let base = if h.is_empty() { EMPTY_HEADER.to_string() } else { h };
        let mut name = base.clone();
        while seen.contains_key(&name) {
            let counter = seen.entry(base.clone()).or_insert(0);
            *counter += 1;
            name = format!("{}_{}", base, counter);
        }
        seen.insert(name.clone(), 0);
        names.push(name);
    }
    names
}

fn push_unless_blank(rows: &mut Vec<RawRow>, row: RawRow) {
    if !row.values().all(RawValue::is_absent) {
        rows.push(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record_mapper::map_records;
    use std::io::Write;
    use tempfile::Builder;

    fn create_test_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    fn loader() -> FileLoader {
        FileLoader::new(&EngineSettings::default())
    }

    #[test]
    fn reads_comma_csv_with_absent_cells() {
        let file = create_test_file(
            ".csv",
            "Title,Purchase Price,Purchase Place\nDune,\"12,5\",\nEmma,,Lerner\n",
        );
        let rows = loader().load_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Title"), Some(&RawValue::Text("Dune".into())));
        assert_eq!(rows[0].get("Purchase Price"), Some(&RawValue::Text("12,5".into())));
        assert_eq!(rows[0].get("Purchase Place"), Some(&RawValue::Absent));
        assert_eq!(rows[1].get("Purchase Price"), Some(&RawValue::Absent));
    }

    #[test]
    fn sniffs_semicolon_delimiter_and_strips_bom() {
        let content = "\u{feff}Titulo;Precio de compra\nRayuela;35.900\n";
        let rows = loader().read_csv(content.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].headers().collect::<Vec<_>>(), vec!["Titulo", "Precio de compra"]);
        assert_eq!(rows[0].get("Precio de compra"), Some(&RawValue::Text("35.900".into())));
    }

    #[test]
    fn configured_delimiter_wins_over_sniffing() {
        let settings = EngineSettings {
            csv_delimiter: Some('|'),
            ..EngineSettings::default()
        };
        let rows = FileLoader::new(&settings)
            .read_csv(b"Title|Price\nA, B and C|10\n")
            .unwrap();
        assert_eq!(rows[0].get("Title"), Some(&RawValue::Text("A, B and C".into())));
    }

    #[test]
    fn ragged_rows_pad_with_absent() {
        let rows = loader().read_csv(b"Title,Price,Place\nDune,10\n").unwrap();
        assert_eq!(rows[0].get("Place"), Some(&RawValue::Absent));
    }

    #[test]
    fn blank_rows_are_skipped() {
        let rows = loader().read_csv(b"Title,Price\n,\nDune,10\n").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let file = create_test_file(".CSV", "Title,Price\n");
        assert!(loader().load_rows(file.path()).unwrap().is_empty());
    }

    #[test]
    fn empty_and_duplicate_headers_are_named() {
        let rows = loader().read_csv(b"Price,,Price,\n1,2,3,4\n").unwrap();
        assert_eq!(
            rows[0].headers().collect::<Vec<_>>(),
            vec!["Price", "__EMPTY", "Price_1", "__EMPTY_1"]
        );
    }

    #[test]
    fn suffixes_skip_names_already_taken() {
        let rows = loader().read_csv(b"Price,Price_1,Price,Price\n1,2,3,4\n").unwrap();
        assert_eq!(
            rows[0].headers().collect::<Vec<_>>(),
            vec!["Price", "Price_1", "Price_2", "Price_3"]
        );
        assert_eq!(rows[0].get("Price_2"), Some(&RawValue::Text("3".into())));
    }

    #[test]
    fn latin1_bytes_do_not_fail_the_file() {
        let bytes = b"Titulo,Lugar de compra,Precio de compra\nRayuela,Librer\xeda Lerner,35.900\nDune,Amazon,10\n";
        let rows = loader().read_csv(bytes).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].get("Lugar de compra"),
            Some(&RawValue::Text("Librer\u{FFFD}a Lerner".into()))
        );
        assert_eq!(rows[0].get("Precio de compra"), Some(&RawValue::Text("35.900".into())));
        assert_eq!(rows[1].get("Titulo"), Some(&RawValue::Text("Dune".into())));

        let records = map_records(&rows, &EngineSettings::default());
        assert_eq!(records[0].price, Some(35900.0));
        assert_eq!(records[1].place, "Amazon");
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let file = create_test_file(".txt", "Title\nDune\n");
        let err = loader().load_rows(file.path()).unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedFormat(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = loader().load_rows("does_not_exist.csv").unwrap_err();
        assert!(matches!(err, EngineError::IoError { .. }));
    }

    #[test]
    fn corrupt_spreadsheet_is_reported() {
        let file = create_test_file(".xlsx", "this is not a zip archive");
        let err = loader().load_rows(file.path()).unwrap_err();
        assert!(matches!(err, EngineError::SpreadsheetError(_)));
    }

    #[test]
    fn sniffing_prefers_most_frequent_candidate() {
        assert_eq!(sniff_delimiter(b"a;b;c,d\n1;2;3,4"), b';');
        assert_eq!(sniff_delimiter(b"a\tb\tc\n"), b'\t');
        assert_eq!(sniff_delimiter(b"single\n"), b',');
        assert_eq!(sniff_delimiter(b""), b',');
    }

    #[test]
    fn spreadsheet_cells_map_to_raw_values() {
        assert_eq!(cell_to_raw(&Data::Empty), RawValue::Absent);
        assert_eq!(cell_to_raw(&Data::String(String::new())), RawValue::Absent);
        assert_eq!(cell_to_raw(&Data::String("Dune".into())), RawValue::Text("Dune".into()));
        assert_eq!(cell_to_raw(&Data::Int(44000)), RawValue::Number(44000.0));
        assert_eq!(cell_to_raw(&Data::Float(12.5)), RawValue::Number(12.5));
        assert_eq!(cell_to_raw(&Data::Bool(true)), RawValue::Text("true".into()));
        assert_eq!(
            cell_to_raw(&Data::DateTimeIso("2023-05-01".into())),
            RawValue::Text("2023-05-01".into())
        );
    }
}
