//! Error handling for the demography pipeline.
//!
//! Fatal conditions are expressed as [`PipelineError`] and abort a run before
//! anything is written. Per-row data problems that the pipeline absorbs are
//! tracked separately in [`issues`].

pub mod issues;
pub mod util;

use std::io;
use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

pub use issues::{IssueLog, SoftIssue};

/// Specialized error type for the pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A raw extract does not have the shape its normalizer expects
    #[error("Source format error in {source_name}: {message}")]
    SourceFormat {
        /// Name of the extract (e.g. "DK population")
        source_name: String,
        /// What was wrong with it
        message: String,
    },

    /// A configured input file is missing or unreadable
    #[error("Missing source {}: {purpose}", .path.display())]
    MissingSource {
        /// The path that was looked up
        path: PathBuf,
        /// Why the file was needed
        purpose: String,
    },

    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error tokenizing a delimited extract
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error parsing the polygon table
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] Box<geojson::Error>),

    /// Error building Arrow data
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error writing or reading Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error converting typed rows to and from record batches
    #[error("Row conversion error: {0}")]
    Conversion(#[from] serde_arrow::Error),

    /// Error with the pipeline configuration
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl PipelineError {
    /// Shorthand for a [`PipelineError::SourceFormat`] error
    pub fn source_format(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceFormat {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

impl From<geojson::Error> for PipelineError {
    fn from(error: geojson::Error) -> Self {
        Self::GeoJson(Box::new(error))
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
