//! Full outer merge of population aggregates and migration rows

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::models::{AgeGroup, Located, MigrationRow, NormalizedRow, PopulationAggregate};

/// Combine both sides on (municipality, year, age group)
///
/// Keys present only on the migration side keep null population values,
/// except `value_total`, which is taken from the municipality-year total when
/// the population side has one. Output is sorted by the canonical key.
#[must_use]
pub fn merge(
    population: Vec<PopulationAggregate>,
    migration: Vec<Located<MigrationRow>>,
) -> Vec<NormalizedRow> {
    let mut totals: FxHashMap<(String, i32), i64> = FxHashMap::default();
    let mut rows: BTreeMap<(String, i32, AgeGroup), NormalizedRow> = BTreeMap::new();

    for aggregate in population {
        totals.insert(
            (aggregate.municipality.clone(), aggregate.year),
            aggregate.value_total,
        );
        let mut row = NormalizedRow::located(
            aggregate.municipality.clone(),
            aggregate.year,
            aggregate.age_group,
            &aggregate.polygon,
        );
        row.value_grouped = Some(aggregate.value_grouped);
        row.value_total = Some(aggregate.value_total);
        row.percentage = aggregate.percentage;
        rows.insert(
            (aggregate.municipality, aggregate.year, aggregate.age_group),
            row,
        );
    }

    let mut migration_only = 0usize;
    for Located { record, polygon } in migration {
        let key = (record.municipality.clone(), record.year, record.age_group);
        let row = rows.entry(key).or_insert_with(|| {
            migration_only += 1;
            let mut row =
                NormalizedRow::located(record.municipality.clone(), record.year, record.age_group, &polygon);
            row.value_total = totals.get(&(record.municipality.clone(), record.year)).copied();
            row
        });
        row.inflow = Some(record.inflow);
        row.outflow = Some(record.outflow);
        row.net_migration = Some(record.net);
    }

    if migration_only > 0 {
        log::info!("{migration_only} rows have migration figures but no population figures");
    }
    rows.into_values().collect()
}
