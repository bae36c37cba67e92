// engine/src/services/report_service/mod.rs
// ReportService ties decoding, mapping, aggregation and the library store together.

use std::path::Path;
use std::sync::{Arc, PoisonError};

use shared::models::{RawRow, StatsSummary};

use crate::config::EngineSettings;
use crate::data::library_store::{Dataset, LibraryStore, SharedLibrary};
use crate::data::record_mapper::map_records;
use crate::error::EngineResult;
use crate::stats::aggregate;

pub mod load_file;

pub struct ReportService {
    settings: EngineSettings,
    store: SharedLibrary,
}

impl ReportService {
    pub fn new(settings: EngineSettings, store: SharedLibrary) -> Self {
        ReportService { settings, store }
    }

    pub fn with_settings(settings: EngineSettings) -> Self {
        Self::new(settings, LibraryStore::shared())
    }

    pub fn load_file(&self, path: impl AsRef<Path>) -> EngineResult<Arc<Dataset>> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "Loading purchase export");
        load_file::handle_load_file(path, &self.settings, self.store.clone())
    }

    /// Snapshot of the current dataset; empty with an all-zero summary before the
    /// first successful load.
    pub fn current(&self) -> Arc<Dataset> {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .current()
    }

    /// Summary of already-decoded rows, without touching the store.
    pub fn summarize_rows(&self, rows: &[RawRow]) -> StatsSummary {
        aggregate(&map_records(rows, &self.settings))
    }
}
