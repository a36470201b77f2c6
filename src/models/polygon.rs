//! Municipality polygons (reference data).

use crate::models::types::Country;

/// Centroid of a municipality polygon in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centroid {
    pub lat: f64,
    pub lon: f64,
}

/// Boundary and administrative membership of one municipality
#[derive(Debug, Clone, PartialEq)]
pub struct MunicipalityPolygon {
    /// Native-language municipality name (the join key)
    pub municipality: String,
    /// Sub-region the municipality belongs to
    pub sub_region: String,
    /// Country the municipality belongs to
    pub country: Country,
    /// Boundary geometry as GeoJSON text
    pub geometry: String,
    /// Centroid of the boundary
    pub centroid: Centroid,
}
