//! Geographic join against the municipality polygon table
//!
//! Names are matched exactly (case and diacritics included) against the
//! native name of each polygon. A polygon belonging to another country than
//! the source row is treated as no match.

use std::collections::BTreeMap;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::{IssueLog, SoftIssue};
use crate::models::{Located, MunicipalityKeyed, MunicipalityPolygon};

/// Lookup over the polygons of the target sub-regions
#[derive(Debug, Clone, Default)]
pub struct PolygonIndex {
    by_name: FxHashMap<String, Arc<MunicipalityPolygon>>,
    members: BTreeMap<String, Vec<String>>,
}

impl PolygonIndex {
    /// Build the index; polygon names are unique after loading
    #[must_use]
    pub fn new(polygons: Vec<MunicipalityPolygon>) -> Self {
        let mut index = Self::default();
        for polygon in polygons {
            index
                .members
                .entry(polygon.sub_region.clone())
                .or_default()
                .push(polygon.municipality.clone());
            index
                .by_name
                .insert(polygon.municipality.clone(), Arc::new(polygon));
        }
        for names in index.members.values_mut() {
            names.sort();
        }
        index
    }

    /// Polygon of a municipality, if it is in scope
    #[must_use]
    pub fn get(&self, municipality: &str) -> Option<&Arc<MunicipalityPolygon>> {
        self.by_name.get(municipality)
    }

    /// Sub-region a municipality belongs to
    #[must_use]
    pub fn sub_region_of(&self, municipality: &str) -> Option<&str> {
        self.get(municipality).map(|polygon| polygon.sub_region.as_str())
    }

    /// Municipalities of each sub-region, sorted by name
    #[must_use]
    pub fn members(&self) -> &BTreeMap<String, Vec<String>> {
        &self.members
    }

    /// Number of polygons in scope
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Attach polygons to rows, dropping (and counting) rows with no match in scope
pub fn join<T: MunicipalityKeyed>(
    rows: Vec<T>,
    index: &PolygonIndex,
    issues: &mut IssueLog,
) -> Vec<Located<T>> {
    let total = rows.len();
    let located: Vec<Located<T>> = rows
        .into_iter()
        .filter_map(|record| {
            match index
                .get(record.municipality())
                .filter(|polygon| polygon.country == record.country())
            {
                Some(polygon) => Some(Located {
                    polygon: Arc::clone(polygon),
                    record,
                }),
                None => {
                    issues.record(SoftIssue::JoinMismatch {
                        municipality: record.municipality().to_string(),
                    });
                    None
                }
            }
        })
        .collect();

    log::debug!("Geographic join kept {} of {total} rows", located.len());
    located
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgeGroup, Centroid, Country, PopulationObservation};

    fn polygon(name: &str, sub_region: &str, country: Country) -> MunicipalityPolygon {
        MunicipalityPolygon {
            municipality: name.to_string(),
            sub_region: sub_region.to_string(),
            country,
            geometry: String::new(),
            centroid: Centroid { lat: 0.0, lon: 0.0 },
        }
    }

    fn observation(name: &str, country: Country) -> PopulationObservation {
        PopulationObservation {
            country,
            municipality: name.to_string(),
            year: 2020,
            age_group: AgeGroup::Youth,
            value: 1,
        }
    }

    fn index() -> PolygonIndex {
        PolygonIndex::new(vec![
            polygon("Malmö", "Skåne", Country::Sweden),
            polygon("Lund", "Skåne", Country::Sweden),
            polygon("København", "Hovedstaden", Country::Denmark),
        ])
    }

    #[test]
    fn test_membership() {
        let index = index();
        assert_eq!(index.len(), 3);
        assert_eq!(index.sub_region_of("Malmö"), Some("Skåne"));
        assert_eq!(index.members()["Skåne"], vec!["Lund", "Malmö"]);
    }

    #[test]
    fn test_join_is_exact_and_country_checked() {
        let mut issues = IssueLog::new();
        let located = join(
            vec![
                observation("Malmö", Country::Sweden),
                observation("Malmo", Country::Sweden),
                observation("Oslo", Country::Sweden),
                observation("København", Country::Sweden),
            ],
            &index(),
            &mut issues,
        );

        assert_eq!(located.len(), 1);
        assert_eq!(located[0].polygon.sub_region, "Skåne");
        assert_eq!(issues.unmatched_municipalities.len(), 3);
    }
}
