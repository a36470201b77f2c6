//! Internal migration aggregation
//!
//! Directional move counts are summed into per-municipality inflow (moves
//! whose destination is the municipality) and outflow (moves whose origin
//! is the municipality). The two sides are full-outer-joined on
//! (municipality, year, age group); a side that is absent for a key counts
//! as zero only after the join, so keys missing from both never appear.

use std::collections::BTreeMap;

use itertools::{EitherOrBoth, Itertools};

use crate::algorithm::age_group::classify_or_record;
use crate::error::IssueLog;
use crate::models::{AgeGroup, Country, MigrationRow, RawMigrationRecord};

type SideKey = (Country, String, i32, AgeGroup);

/// Aggregate directional records into one row per (municipality, year, age group)
///
/// Output is ordered by (country, municipality, year, age group).
pub fn aggregate(records: Vec<RawMigrationRecord>, issues: &mut IssueLog) -> Vec<MigrationRow> {
    let mut inflow: BTreeMap<SideKey, i64> = BTreeMap::new();
    let mut outflow: BTreeMap<SideKey, i64> = BTreeMap::new();

    for record in records {
        let Some(age_group) = classify_or_record(record.age_label.as_deref(), issues) else {
            continue;
        };
        if let Some(destination) = record.destination {
            *inflow
                .entry((record.country, destination, record.year, age_group))
                .or_insert(0) += record.count;
        }
        if let Some(origin) = record.origin {
            *outflow
                .entry((record.country, origin, record.year, age_group))
                .or_insert(0) += record.count;
        }
    }

    let rows: Vec<MigrationRow> = inflow
        .into_iter()
        .merge_join_by(outflow, |(a, _), (b, _)| a.cmp(b))
        .map(|pair| {
            let ((country, municipality, year, age_group), inflow, outflow) = match pair {
                EitherOrBoth::Both((key, inflow), (_, outflow)) => (key, inflow, outflow),
                EitherOrBoth::Left((key, inflow)) => (key, inflow, 0),
                EitherOrBoth::Right((key, outflow)) => (key, 0, outflow),
            };
            MigrationRow::new(country, municipality, year, age_group, inflow, outflow)
        })
        .collect();

    log::info!("Aggregated migration into {} rows", rows.len());
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        origin: Option<&str>,
        destination: Option<&str>,
        age: &str,
        count: i64,
    ) -> RawMigrationRecord {
        RawMigrationRecord {
            country: Country::Denmark,
            origin: origin.map(str::to_string),
            destination: destination.map(str::to_string),
            age_label: Some(age.to_string()),
            year: 2020,
            count,
        }
    }

    #[test]
    fn test_inflow_outflow_and_net() {
        let rows = aggregate(
            vec![
                record(Some("Gentofte"), Some("København"), "30 years", 20),
                record(Some("Frederiksberg"), Some("København"), "40 years", 30),
                record(Some("København"), Some("Gentofte"), "25 years", 30),
            ],
            &mut IssueLog::new(),
        );

        let kbh = rows
            .iter()
            .find(|row| row.municipality == "København")
            .unwrap();
        assert_eq!(kbh.age_group, AgeGroup::WorkingAge);
        assert_eq!(kbh.inflow, 50);
        assert_eq!(kbh.outflow, 30);
        assert_eq!(kbh.net, 20);
    }

    #[test]
    fn test_one_sided_keys_are_zero_filled() {
        let rows = aggregate(
            vec![
                record(None, Some("Lund"), "10", 4),
                record(Some("Lund"), None, "70", 3),
            ],
            &mut IssueLog::new(),
        );

        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].age_group, rows[0].inflow, rows[0].outflow), (AgeGroup::Youth, 4, 0));
        assert_eq!((rows[1].age_group, rows[1].inflow, rows[1].outflow), (AgeGroup::Elderly, 0, 3));
        assert!(rows.iter().all(|row| row.net == row.inflow - row.outflow));
    }

    #[test]
    fn test_unknown_age_is_excluded() {
        let mut issues = IssueLog::new();
        let rows = aggregate(vec![record(Some("A"), Some("B"), "abc", 9)], &mut issues);
        assert!(rows.is_empty());
        assert_eq!(issues.unknown_age_count(), 1);
    }
}
