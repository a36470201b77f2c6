//! Transformation stages of the demography pipeline
//!
//! Each stage takes the previous stage's materialized output and produces
//! its own: age classification, migration aggregation, the geographic join,
//! population shares, the population/migration merge and the year-over-year
//! deltas. The summary module works on the finished table.

pub mod age_group;
pub mod geography;
pub mod merge;
pub mod migration;
pub mod percentage;
pub mod summary;
pub mod temporal;

pub use age_group::{classify, classify_population};
pub use geography::{PolygonIndex, join};
pub use merge::merge;
pub use temporal::attach_deltas;
