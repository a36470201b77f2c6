//! Age-group aggregation and percentage shares
//!
//! Values are summed per (municipality, year, age group); the total of a
//! municipality-year is the sum over its age groups. The share of a group is
//! `grouped / total * 100`, or null when the total is zero.

use std::collections::BTreeMap;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::error::{IssueLog, SoftIssue};
use crate::models::{AgeGroup, Located, MunicipalityPolygon, PopulationAggregate, PopulationObservation};

/// Group sums of one municipality-year, at most one entry per age group
type GroupSums = SmallVec<[(AgeGroup, i64); 3]>;

/// Share of `grouped` in `total` in percent
#[must_use]
pub fn share(grouped: i64, total: i64) -> Option<f64> {
    if total == 0 {
        None
    } else {
        #[allow(clippy::cast_precision_loss)]
        Some(grouped as f64 / total as f64 * 100.0)
    }
}

/// Aggregate located observations into one row per (municipality, year, age group)
///
/// Output is ordered by (municipality, year, age group).
pub fn aggregate(
    observations: Vec<Located<PopulationObservation>>,
    issues: &mut IssueLog,
) -> Vec<PopulationAggregate> {
    let mut years: BTreeMap<(String, i32), (Arc<MunicipalityPolygon>, GroupSums)> = BTreeMap::new();

    for Located { record, polygon } in observations {
        let (_, sums) = years
            .entry((record.municipality, record.year))
            .or_insert_with(|| (polygon, SmallVec::new()));
        match sums.iter_mut().find(|(group, _)| *group == record.age_group) {
            Some((_, sum)) => *sum += record.value,
            None => sums.push((record.age_group, record.value)),
        }
    }

    let mut aggregates = Vec::with_capacity(years.len() * AgeGroup::ALL.len());
    for ((municipality, year), (polygon, mut sums)) in years {
        let total: i64 = sums.iter().map(|(_, sum)| sum).sum();
        if total == 0 {
            issues.record(SoftIssue::ZeroTotal {
                municipality: municipality.clone(),
                year,
            });
        }

        sums.sort_unstable_by_key(|(group, _)| *group);
        aggregates.extend(sums.into_iter().map(|(age_group, grouped)| PopulationAggregate {
            municipality: municipality.clone(),
            year,
            age_group,
            polygon: Arc::clone(&polygon),
            value_grouped: grouped,
            value_total: total,
            percentage: share(grouped, total),
        }));
    }

    log::info!("Aggregated population into {} rows", aggregates.len());
    aggregates
}
