//! The canonical unit record of the output table.

use serde::{Deserialize, Serialize};

use crate::models::polygon::MunicipalityPolygon;
use crate::models::types::{AgeGroup, Trend};

/// One row of the canonical table, keyed by (municipality, year, age group)
///
/// Field order is column order. Every value field has a `_prev` counterpart
/// holding the same metric one year earlier for the same municipality and age
/// group, or `None` when that year is not in the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub municipality: String,
    pub year: i32,
    pub age_group: AgeGroup,
    pub sub_region: String,
    /// Two-letter country code
    pub country: String,
    /// GeoJSON geometry text
    pub geometry: String,
    pub lat: f64,
    pub lon: f64,

    pub value_grouped: Option<i64>,
    pub value_total: Option<i64>,
    pub percentage: Option<f64>,
    pub inflow: Option<i64>,
    pub outflow: Option<i64>,
    pub net_migration: Option<i64>,

    pub value_grouped_prev: Option<i64>,
    pub value_total_prev: Option<i64>,
    pub percentage_prev: Option<f64>,
    pub inflow_prev: Option<i64>,
    pub outflow_prev: Option<i64>,
    pub net_migration_prev: Option<i64>,

    pub value_grouped_change: Option<i64>,
    pub value_grouped_change_pct: Option<f64>,
    pub net_migration_change: Option<i64>,
    pub net_migration_per_1000: Option<f64>,
    pub net_migration_trend: Option<Trend>,
}

impl NormalizedRow {
    /// Create a row with location attributes taken from the polygon and no values
    #[must_use]
    pub fn located(
        municipality: String,
        year: i32,
        age_group: AgeGroup,
        polygon: &MunicipalityPolygon,
    ) -> Self {
        Self {
            municipality,
            year,
            age_group,
            sub_region: polygon.sub_region.clone(),
            country: polygon.country.code().to_string(),
            geometry: polygon.geometry.clone(),
            lat: polygon.centroid.lat,
            lon: polygon.centroid.lon,
            value_grouped: None,
            value_total: None,
            percentage: None,
            inflow: None,
            outflow: None,
            net_migration: None,
            value_grouped_prev: None,
            value_total_prev: None,
            percentage_prev: None,
            inflow_prev: None,
            outflow_prev: None,
            net_migration_prev: None,
            value_grouped_change: None,
            value_grouped_change_pct: None,
            net_migration_change: None,
            net_migration_per_1000: None,
            net_migration_trend: None,
        }
    }

    /// Sort key of the canonical table
    #[must_use]
    pub fn key(&self) -> (&str, i32, AgeGroup) {
        (&self.municipality, self.year, self.age_group)
    }
}
