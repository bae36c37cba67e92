// Holds the currently loaded dataset and its summary, replaced wholesale per load
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use shared::models::{BookRecord, StatsSummary};

use crate::stats::aggregate;

/// One loaded file together with everything derived from it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Dataset {
    pub source: Option<PathBuf>,
    pub records: Vec<BookRecord>,
    pub summary: StatsSummary,
}

impl Dataset {
    /// Builds a dataset, computing its summary up front.
    pub fn new(source: Option<PathBuf>, records: Vec<BookRecord>) -> Self {
        let summary = aggregate(&records);
        Dataset {
            source,
            records,
            summary,
        }
    }
}

pub struct LibraryStore {
    current: Arc<Dataset>,
}

pub type SharedLibrary = Arc<RwLock<LibraryStore>>;

impl LibraryStore {
    pub fn new() -> Self {
        LibraryStore {
            current: Arc::new(Dataset::default()),
        }
    }

    pub fn shared() -> SharedLibrary {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Swaps in a fully computed dataset. Holders of the previous snapshot keep
    /// seeing it unchanged.
    pub fn replace(&mut self, dataset: Dataset) -> Arc<Dataset> {
        self.current = Arc::new(dataset);
        self.current.clone()
    }

    pub fn current(&self) -> Arc<Dataset> {
        self.current.clone()
    }
}

impl Default for LibraryStore {
    fn default() -> Self {
        Self::new()
    }
}
