//! Municipality polygon table
//!
//! The polygon file is a GeoJSON FeatureCollection with one feature per
//! Nordic municipality. Only the properties below are read; features outside
//! the target sub-regions are skipped before anything else is inspected.

use std::path::Path;

use geo::Centroid as _;
use geojson::{Feature, FeatureCollection, GeoJson};
use rustc_hash::FxHashSet;
use serde_json::Value as JsonValue;

use crate::config::GeometryBackend;
use crate::error::util::safe_read_bytes;
use crate::error::{PipelineError, Result};
use crate::models::{Centroid, Country, MunicipalityPolygon};

pub const POLYGON_SOURCE: &str = "municipality polygons";

/// Native municipality name property
pub const MUNICIPALITY_PROPERTY: &str = "MUN_NORDIC";
/// Sub-region property
pub const SUB_REGION_PROPERTY: &str = "REG_NORDIC";
/// Country code property
pub const COUNTRY_PROPERTY: &str = "CNTR";
/// Precomputed centroid latitude
pub const LAT_PROPERTY: &str = "lat";
/// Precomputed centroid longitude
pub const LON_PROPERTY: &str = "lon";

/// Load the polygons of the target sub-regions from a GeoJSON file
pub fn load_polygons(
    path: &Path,
    sub_regions: &[String],
    backend: GeometryBackend,
) -> Result<Vec<MunicipalityPolygon>> {
    let start = std::time::Instant::now();
    crate::utils::logging::log_operation_start("Loading polygons from", path);
    let bytes = safe_read_bytes(path, POLYGON_SOURCE)?;
    let text = String::from_utf8(bytes).map_err(|_| {
        PipelineError::source_format(POLYGON_SOURCE, "GeoJSON is not valid UTF-8")
    })?;
    let polygons = parse_polygons(&text, sub_regions, backend)?;
    crate::utils::logging::log_operation_complete(
        "loaded",
        path,
        polygons.len(),
        Some(start.elapsed()),
    );
    Ok(polygons)
}

/// Parse GeoJSON text, keeping features whose sub-region is in `sub_regions`
pub fn parse_polygons(
    text: &str,
    sub_regions: &[String],
    backend: GeometryBackend,
) -> Result<Vec<MunicipalityPolygon>> {
    let geojson: GeoJson = text.parse()?;
    let collection = FeatureCollection::try_from(geojson)?;

    let mut seen = FxHashSet::default();
    let mut polygons = Vec::new();
    for feature in &collection.features {
        let Some(sub_region) = string_property(feature, SUB_REGION_PROPERTY) else {
            continue;
        };
        if !sub_regions.iter().any(|target| target == sub_region) {
            continue;
        }

        let polygon = polygon_from_feature(feature, sub_region, backend)?;
        if !seen.insert(polygon.municipality.clone()) {
            return Err(PipelineError::source_format(
                POLYGON_SOURCE,
                format!("municipality '{}' appears more than once", polygon.municipality),
            ));
        }
        polygons.push(polygon);
    }

    for target in sub_regions {
        if !polygons.iter().any(|polygon| &polygon.sub_region == target) {
            log::warn!("No polygons found for sub-region {target}");
        }
    }

    Ok(polygons)
}

fn polygon_from_feature(
    feature: &Feature,
    sub_region: &str,
    backend: GeometryBackend,
) -> Result<MunicipalityPolygon> {
    let municipality = string_property(feature, MUNICIPALITY_PROPERTY).ok_or_else(|| {
        PipelineError::source_format(
            POLYGON_SOURCE,
            format!("feature in {sub_region} has no {MUNICIPALITY_PROPERTY}"),
        )
    })?;

    let country = string_property(feature, COUNTRY_PROPERTY)
        .and_then(Country::from_code)
        .ok_or_else(|| {
            PipelineError::source_format(
                POLYGON_SOURCE,
                format!("{municipality} has no recognised {COUNTRY_PROPERTY} code"),
            )
        })?;

    let geometry = feature.geometry.as_ref().ok_or_else(|| {
        PipelineError::source_format(POLYGON_SOURCE, format!("{municipality} has no geometry"))
    })?;

    let centroid = match backend {
        GeometryBackend::Geo => {
            let shape = geo::Geometry::<f64>::try_from(geometry.value.clone())?;
            let point = shape.centroid().ok_or_else(|| {
                PipelineError::source_format(
                    POLYGON_SOURCE,
                    format!("{municipality} has an empty geometry"),
                )
            })?;
            Centroid {
                lat: point.y(),
                lon: point.x(),
            }
        }
        GeometryBackend::Precomputed => {
            let coordinate = |key: &str| {
                feature.property(key).and_then(JsonValue::as_f64).ok_or_else(|| {
                    PipelineError::source_format(
                        POLYGON_SOURCE,
                        format!("{municipality} has no numeric '{key}' property"),
                    )
                })
            };
            Centroid {
                lat: coordinate(LAT_PROPERTY)?,
                lon: coordinate(LON_PROPERTY)?,
            }
        }
    };

    let geometry = serde_json::to_string(geometry).map_err(|e| {
        PipelineError::source_format(POLYGON_SOURCE, format!("{municipality}: {e}"))
    })?;

    Ok(MunicipalityPolygon {
        municipality: municipality.to_string(),
        sub_region: sub_region.to_string(),
        country,
        geometry,
        centroid,
    })
}

fn string_property<'a>(feature: &'a Feature, key: &str) -> Option<&'a str> {
    feature.property(key).and_then(JsonValue::as_str)
}
