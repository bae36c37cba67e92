use thiserror::Error;

/// Failures that can escape the engine. Individual malformed cells never produce
/// one of these; only configuration and whole-file decoding can fail.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Workbook has no sheets")]
    EmptyWorkbook,

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl From<calamine::Error> for EngineError {
    fn from(err: calamine::Error) -> Self {
        EngineError::SpreadsheetError(err.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
