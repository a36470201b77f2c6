//! Domain models
//!
//! Raw source records, the intermediate records each stage produces, the
//! polygon reference data, and the canonical output row.

pub mod polygon;
pub mod records;
pub mod row;
pub mod types;

pub use polygon::{Centroid, MunicipalityPolygon};
pub use records::{
    Located, MigrationRow, MunicipalityKeyed, PopulationAggregate, PopulationObservation,
    RawMigrationRecord, RawPopulationRecord,
};
pub use row::NormalizedRow;
pub use types::{AGE_GROUP_BOUNDS, AgeGroup, Country, Trend};
