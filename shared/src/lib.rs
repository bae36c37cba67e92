//! Data types shared between the report engine and whatever renders its output.
//!
//! Nothing here performs I/O or parsing; the engine crate owns the decision logic.

pub mod models;

pub use models::{
    BookRecord, MonthCount, MonthKey, MonthValue, PlaceCount, PlaceValue, RawRow, RawValue,
    StatsSummary,
};
