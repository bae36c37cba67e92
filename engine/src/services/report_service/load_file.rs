// Handler for loading a file into the library store
use std::path::Path;
use std::sync::{Arc, PoisonError};

use crate::config::EngineSettings;
use crate::data::file_loader::FileLoader;
use crate::data::library_store::{Dataset, SharedLibrary};
use crate::data::record_mapper::map_records;
use crate::error::EngineResult;

/// Decodes, maps and aggregates `path`, then swaps the result into the store.
/// On a decoding failure the store keeps whatever it held before.
pub fn handle_load_file(
    path: &Path,
    settings: &EngineSettings,
    store: SharedLibrary,
) -> EngineResult<Arc<Dataset>> {
    let rows = match FileLoader::new(settings).load_rows(path) {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Could not read file; previous dataset kept");
            return Err(e);
        }
    };

    let records = map_records(&rows, settings);
    let dataset = Dataset::new(Some(path.to_path_buf()), records);

    // The store only ever holds complete snapshots, so a poisoned lock is still usable.
    let mut guard = store.write().unwrap_or_else(PoisonError::into_inner);
    let current = guard.replace(dataset);
    drop(guard);

    tracing::info!(
        path = %path.display(),
        rows = current.summary.total_record_count,
        priced = current.summary.records_with_price_count,
        "Dataset loaded"
    );
    Ok(current)
}
