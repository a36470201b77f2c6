//! Cross-border municipal demography pipeline.
//!
//! Reads Danish and Swedish population and internal-migration extracts,
//! classifies ages into three groups, keeps the municipalities of the
//! configured sub-regions and writes one Parquet table keyed by
//! (municipality, year, age group) with shares, migration and
//! year-over-year changes.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod schema;
pub mod sources;
pub mod utils;

pub use config::{CountrySources, GeometryBackend, PipelineConfig, SourceFile};
pub use error::{IssueLog, PipelineError, Result, SoftIssue};
pub use models::{AgeGroup, Country, NormalizedRow, Trend};
pub use pipeline::{PipelineSummary, build_table, load, run};
