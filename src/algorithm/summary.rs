//! Descriptive summaries over the canonical table
//!
//! These are the figures behind the population-change charts: how each
//! year's change splits into internal migration and everything else, the
//! age structure over time, the per-municipality change, the shape of a
//! three-year trajectory and a banding of net migration relative to
//! population.

use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;

use crate::models::{AgeGroup, NormalizedRow};

/// Population change of one year split into its components
#[derive(Debug, Clone, PartialEq)]
pub struct YearComponents {
    pub year: i32,
    pub population: i64,
    pub population_prev: i64,
    /// `population - population_prev`
    pub total_change: i64,
    /// Sum of internal net migration
    pub net_migration: i64,
    /// Change not explained by internal migration (births, deaths, emigration)
    pub other: i64,
}

/// Population change of one municipality in one year
#[derive(Debug, Clone, PartialEq)]
pub struct MunicipalityChange {
    pub year: i32,
    pub municipality: String,
    pub population: i64,
    /// Change versus the previous year, `None` when that year is missing
    pub change: Option<i64>,
    /// Change in percent of the previous year
    pub change_pct: Option<f64>,
}

/// Shape of three consecutive yearly change percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trajectory {
    OverallDecline,
    NegativeEffect,
    PositiveEffect,
    OverallGrowth,
}

impl Trajectory {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Trajectory::OverallDecline => "Overall decline",
            Trajectory::NegativeEffect => "Negative effect",
            Trajectory::PositiveEffect => "Positive effect",
            Trajectory::OverallGrowth => "Overall growth",
        }
    }
}

impl fmt::Display for Trajectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a trajectory from change percentages of three consecutive years
#[must_use]
pub fn classify_trajectory(changes: [f64; 3]) -> Trajectory {
    let [p0, p1, p2] = changes;
    match (p1 > p0, p2 > p1) {
        (false, false) => Trajectory::OverallDecline,
        (false, true) => Trajectory::NegativeEffect,
        (true, false) => Trajectory::PositiveEffect,
        (true, true) => Trajectory::OverallGrowth,
    }
}

/// Net migration as a percentage of population, in right-closed bins
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MigrationShareBand {
    /// At most -0.5 %
    StrongOutflow,
    /// (-0.5, -0.1] %
    Outflow,
    /// (-0.1, 0.1] %
    Balanced,
    /// (0.1, 1] %
    Inflow,
    /// Above 1 %
    StrongInflow,
}

impl MigrationShareBand {
    pub const ALL: [MigrationShareBand; 5] = [
        MigrationShareBand::StrongOutflow,
        MigrationShareBand::Outflow,
        MigrationShareBand::Balanced,
        MigrationShareBand::Inflow,
        MigrationShareBand::StrongInflow,
    ];

    #[must_use]
    pub fn from_share(pct: f64) -> Self {
        if pct <= -0.5 {
            MigrationShareBand::StrongOutflow
        } else if pct <= -0.1 {
            MigrationShareBand::Outflow
        } else if pct <= 0.1 {
            MigrationShareBand::Balanced
        } else if pct <= 1.0 {
            MigrationShareBand::Inflow
        } else {
            MigrationShareBand::StrongInflow
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MigrationShareBand::StrongOutflow => "<-0.5",
            MigrationShareBand::Outflow => "-0.5 - -0.1",
            MigrationShareBand::Balanced => "-0.1 - 0.1",
            MigrationShareBand::Inflow => "0.1 - 1",
            MigrationShareBand::StrongInflow => ">1",
        }
    }
}

impl fmt::Display for MigrationShareBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    population: i64,
    net_migration: i64,
}

fn totals_by<K: Ord>(rows: &[NormalizedRow], key: impl Fn(&NormalizedRow) -> K) -> BTreeMap<K, Totals> {
    let mut totals: BTreeMap<K, Totals> = BTreeMap::new();
    for row in rows {
        let entry = totals.entry(key(row)).or_default();
        entry.population += row.value_grouped.unwrap_or(0);
        entry.net_migration += row.net_migration.unwrap_or(0);
    }
    totals
}

/// Per-year components of population change; years without a predecessor are skipped
#[must_use]
pub fn year_components(rows: &[NormalizedRow]) -> Vec<YearComponents> {
    let totals = totals_by(rows, |row| row.year);
    totals
        .iter()
        .filter_map(|(&year, current)| {
            let prev = totals.get(&(year - 1))?;
            let total_change = current.population - prev.population;
            Some(YearComponents {
                year,
                population: current.population,
                population_prev: prev.population,
                total_change,
                net_migration: current.net_migration,
                other: total_change - current.net_migration,
            })
        })
        .collect()
}

/// Population per (year, age group) over all municipalities
#[must_use]
pub fn age_structure(rows: &[NormalizedRow]) -> BTreeMap<(i32, AgeGroup), i64> {
    let mut structure: BTreeMap<(i32, AgeGroup), i64> = BTreeMap::new();
    for row in rows {
        if let Some(grouped) = row.value_grouped {
            *structure.entry((row.year, row.age_group)).or_default() += grouped;
        }
    }
    structure
}

/// Per (year, municipality) population and change versus the previous year
#[must_use]
pub fn municipality_changes(rows: &[NormalizedRow]) -> Vec<MunicipalityChange> {
    let totals = totals_by(rows, |row| (row.municipality.clone(), row.year));
    let mut changes: Vec<MunicipalityChange> = totals
        .iter()
        .map(|((municipality, year), current)| {
            let prev = totals
                .get(&(municipality.clone(), year - 1))
                .map(|prev| prev.population);
            let change = prev.map(|prev| current.population - prev);
            #[allow(clippy::cast_precision_loss)]
            let change_pct = change
                .zip(prev)
                .and_then(|(change, prev)| (prev != 0).then(|| change as f64 / prev as f64 * 100.0));
            MunicipalityChange {
                year: *year,
                municipality: municipality.clone(),
                population: current.population,
                change,
                change_pct,
            }
        })
        .collect();
    changes.sort_by(|a, b| (a.year, &a.municipality).cmp(&(b.year, &b.municipality)));
    changes
}

/// Count municipality-years per migration share band, for each year
#[must_use]
pub fn migration_share_bands(rows: &[NormalizedRow]) -> BTreeMap<i32, BTreeMap<MigrationShareBand, usize>> {
    totals_by(rows, |row| (row.year, row.municipality.clone()))
        .into_iter()
        .filter(|(_, totals)| totals.population != 0)
        .map(|((year, _), totals)| {
            #[allow(clippy::cast_precision_loss)]
            let pct = totals.net_migration as f64 / totals.population as f64 * 100.0;
            (year, MigrationShareBand::from_share(pct))
        })
        .into_group_map()
        .into_iter()
        .map(|(year, bands)| (year, bands.into_iter().counts().into_iter().collect::<BTreeMap<_, _>>()))
        .collect()
}

/// Trajectory of each municipality over its last three change percentages
#[must_use]
pub fn municipality_trajectories(changes: &[MunicipalityChange]) -> BTreeMap<String, Trajectory> {
    changes
        .iter()
        .filter_map(|change| Some((change.municipality.clone(), (change.year, change.change_pct?))))
        .into_group_map()
        .into_iter()
        .filter_map(|(municipality, mut series)| {
            series.sort_by_key(|(year, _)| *year);
            let [.., (_, p0), (_, p1), (_, p2)] = series.as_slice() else {
                return None;
            };
            Some((municipality, classify_trajectory([*p0, *p1, *p2])))
        })
        .collect()
}
