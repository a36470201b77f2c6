//! Year-over-year deltas
//!
//! Each row is joined to the row with the same (municipality, age group) one
//! year earlier. Values of that row become the `_prev` fields; when it does
//! not exist they stay null, so gap years never borrow from older years.

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::models::{AgeGroup, NormalizedRow, Trend};

/// Values carried forward from the previous year
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct PriorValues {
    value_grouped: Option<i64>,
    value_total: Option<i64>,
    percentage: Option<f64>,
    inflow: Option<i64>,
    outflow: Option<i64>,
    net_migration: Option<i64>,
}

impl From<&NormalizedRow> for PriorValues {
    fn from(row: &NormalizedRow) -> Self {
        Self {
            value_grouped: row.value_grouped,
            value_total: row.value_total,
            percentage: row.percentage,
            inflow: row.inflow,
            outflow: row.outflow,
            net_migration: row.net_migration,
        }
    }
}

/// Attach previous-year values and derived change columns
///
/// The result is sorted by (municipality, year, age group) regardless of the
/// input order.
#[must_use]
pub fn attach_deltas(mut rows: Vec<NormalizedRow>) -> Vec<NormalizedRow> {
    let lookup: FxHashMap<(String, AgeGroup, i32), PriorValues> = rows
        .iter()
        .map(|row| ((row.municipality.clone(), row.age_group, row.year), PriorValues::from(row)))
        .collect();

    rows.par_iter_mut().for_each(|row| {
        let prior = lookup
            .get(&(row.municipality.clone(), row.age_group, row.year - 1))
            .copied()
            .unwrap_or_default();
        row.value_grouped_prev = prior.value_grouped;
        row.value_total_prev = prior.value_total;
        row.percentage_prev = prior.percentage;
        row.inflow_prev = prior.inflow;
        row.outflow_prev = prior.outflow;
        row.net_migration_prev = prior.net_migration;
        derive_changes(row);
    });

    rows.par_sort_unstable_by(|a, b| a.key().cmp(&b.key()));
    rows
}

/// Fill the change columns from the current and `_prev` values
pub fn derive_changes(row: &mut NormalizedRow) {
    row.value_grouped_change = row
        .value_grouped
        .zip(row.value_grouped_prev)
        .map(|(current, prev)| current - prev);
    row.value_grouped_change_pct = row
        .value_grouped_change
        .zip(row.value_grouped_prev)
        .and_then(|(change, prev)| relative(change, prev, 100.0));
    row.net_migration_change = row
        .net_migration
        .zip(row.net_migration_prev)
        .map(|(current, prev)| current - prev);
    row.net_migration_per_1000 = row
        .net_migration
        .zip(row.value_total)
        .and_then(|(net, total)| relative(net, total, 1000.0));
    row.net_migration_trend = row.net_migration.and_then(Trend::of);
}

#[allow(clippy::cast_precision_loss)]
fn relative(part: i64, base: i64, scale: f64) -> Option<f64> {
    (base != 0).then(|| part as f64 / base as f64 * scale)
}
