//! Intermediate records passed between pipeline stages.

use std::sync::Arc;

use crate::models::polygon::MunicipalityPolygon;
use crate::models::types::{AgeGroup, Country};

/// One population count as published by a statistics office, in long format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPopulationRecord {
    /// Country the extract came from
    pub country: Country,
    /// Municipality name after code stripping and exonym canonicalization
    pub municipality: String,
    /// Age label exactly as in the source (`None` for an empty cell)
    pub age_label: Option<String>,
    /// Snapshot year
    pub year: i32,
    /// Number of residents
    pub value: i64,
}

/// One directional migration count
///
/// Sources that only publish per-municipality inflow or outflow leave the
/// other end empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMigrationRecord {
    /// Country the extract came from
    pub country: Country,
    /// Municipality people moved out of
    pub origin: Option<String>,
    /// Municipality people moved into
    pub destination: Option<String>,
    /// Age label exactly as in the source
    pub age_label: Option<String>,
    /// Year of the move
    pub year: i32,
    /// Number of people who moved
    pub count: i64,
}

/// Population count after age classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationObservation {
    pub country: Country,
    pub municipality: String,
    pub year: i32,
    pub age_group: AgeGroup,
    pub value: i64,
}

/// Internal migration totals for one (municipality, year, age group)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRow {
    pub country: Country,
    pub municipality: String,
    pub year: i32,
    pub age_group: AgeGroup,
    /// People moving into the municipality
    pub inflow: i64,
    /// People moving out of the municipality
    pub outflow: i64,
    /// `inflow - outflow`
    pub net: i64,
}

impl MigrationRow {
    /// Build a row, deriving the net figure
    #[must_use]
    pub fn new(
        country: Country,
        municipality: String,
        year: i32,
        age_group: AgeGroup,
        inflow: i64,
        outflow: i64,
    ) -> Self {
        Self {
            country,
            municipality,
            year,
            age_group,
            inflow,
            outflow,
            net: inflow - outflow,
        }
    }
}

/// Population aggregate for one (municipality, year, age group)
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationAggregate {
    pub municipality: String,
    pub year: i32,
    pub age_group: AgeGroup,
    pub polygon: Arc<MunicipalityPolygon>,
    /// Sum of the bucket
    pub value_grouped: i64,
    /// Sum over every bucket of the municipality-year
    pub value_total: i64,
    /// Share of the total in percent, `None` when the total is zero
    pub percentage: Option<f64>,
}

/// Anything that is keyed by a source municipality name
pub trait MunicipalityKeyed {
    /// Municipality name used for the polygon lookup
    fn municipality(&self) -> &str;
    /// Country of the source the row came from
    fn country(&self) -> Country;
}

impl MunicipalityKeyed for PopulationObservation {
    fn municipality(&self) -> &str {
        &self.municipality
    }

    fn country(&self) -> Country {
        self.country
    }
}

impl MunicipalityKeyed for MigrationRow {
    fn municipality(&self) -> &str {
        &self.municipality
    }

    fn country(&self) -> Country {
        self.country
    }
}

/// A record that has been matched to its municipality polygon
#[derive(Debug, Clone, PartialEq)]
pub struct Located<T> {
    pub record: T,
    pub polygon: Arc<MunicipalityPolygon>,
}
