// Engine library root: header resolution, cell parsing, record mapping and
// aggregation for book-purchase exports.

pub mod config;
pub mod data;
pub mod error;
pub mod services;
pub mod stats;

pub use config::EngineSettings;
pub use error::{EngineError, EngineResult};
pub use services::ReportService;
