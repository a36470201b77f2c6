//! Source normalizers for national statistics extracts
//!
//! Each country publishes population and internal-migration statistics in
//! its own layout. A [`SourceNormalizer`] turns one country's extracts into
//! the common long-format records the rest of the pipeline works on.
//!
//! Available sources:
//! - Denmark: BY2 (population 1 January by municipality and age) and FLY66
//!   (moves between municipalities by age)
//! - Sweden: population by region and age, plus separate in- and
//!   out-migration tables

pub mod denmark;
pub mod factory;
pub mod names;
pub mod polygons;
pub mod sweden;
pub mod table;

use std::fmt::Debug;
use std::path::PathBuf;

use crate::config::SourceFile;
use crate::error::{IssueLog, Result};
use crate::models::{Country, RawMigrationRecord, RawPopulationRecord};

pub use denmark::DenmarkSource;
pub use factory::{normalizer_from_sources, normalizers_from_config};
pub use names::NameCanonicalizer;
pub use sweden::SwedenSource;
pub use table::RawTable;

/// Base trait for per-country extract normalizers
pub trait SourceNormalizer: Debug + Send + Sync {
    /// Country whose extracts this normalizer reads
    fn country(&self) -> Country;

    /// Read the population extract as (municipality, age label, year, value) records
    fn normalize_population(&self, issues: &mut IssueLog) -> Result<Vec<RawPopulationRecord>>;

    /// Read the migration extract(s) as directional records
    fn normalize_migration(&self, issues: &mut IssueLog) -> Result<Vec<RawMigrationRecord>>;
}

/// A configured extract with its path resolved against the data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub path: PathBuf,
    pub file: SourceFile,
}

impl ResolvedSource {
    /// Pair a resolved path with its format description
    #[must_use]
    pub fn new(path: PathBuf, file: SourceFile) -> Self {
        Self { path, file }
    }

    /// Read and tokenize the extract
    pub fn read(&self, source_name: &str) -> Result<RawTable> {
        crate::utils::logging::log_operation_start(&format!("Reading {source_name}"), &self.path);
        table::read_table(&self.path, &self.file, source_name)
    }
}
