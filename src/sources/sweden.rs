//! Statistics Sweden extracts
//!
//! All three tables share one wide layout: a `region` column holding the
//! code-prefixed municipality name, an `age` column, then one column per
//! year. Migration comes as two tables, people moving into each
//! municipality and people moving out of it, so the records carry only one
//! end of each move.

use crate::error::{IssueLog, Result};
use crate::models::{Country, RawMigrationRecord, RawPopulationRecord};
use crate::sources::names::NameCanonicalizer;
use crate::sources::table::{LongRecord, RawTable};
use crate::sources::{ResolvedSource, SourceNormalizer};

pub const POPULATION_SOURCE: &str = "SE population";
pub const MIGRATION_IN_SOURCE: &str = "SE in-migration";
pub const MIGRATION_OUT_SOURCE: &str = "SE out-migration";

/// Municipality column of every Swedish table
pub const REGION_COLUMN: &str = "region";
/// Age column of every Swedish table
pub const AGE_COLUMN: &str = "age";

/// Which end of a move a migration table describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The municipality is the destination
    Inflow,
    /// The municipality is the origin
    Outflow,
}

/// Normalizer for the Swedish extracts
#[derive(Debug, Clone)]
pub struct SwedenSource {
    population: ResolvedSource,
    migration_in: ResolvedSource,
    migration_out: ResolvedSource,
    names: NameCanonicalizer,
}

impl SwedenSource {
    /// Create a normalizer over the three Swedish extracts
    #[must_use]
    pub fn new(
        population: ResolvedSource,
        migration_in: ResolvedSource,
        migration_out: ResolvedSource,
        names: NameCanonicalizer,
    ) -> Self {
        Self {
            population,
            migration_in,
            migration_out,
            names,
        }
    }
}

impl SourceNormalizer for SwedenSource {
    fn country(&self) -> Country {
        Country::Sweden
    }

    fn normalize_population(&self, issues: &mut IssueLog) -> Result<Vec<RawPopulationRecord>> {
        let table = self.population.read(POPULATION_SOURCE)?;
        population_from_table(table, &self.names, issues)
    }

    fn normalize_migration(&self, issues: &mut IssueLog) -> Result<Vec<RawMigrationRecord>> {
        let inflow = self.migration_in.read(MIGRATION_IN_SOURCE)?;
        let outflow = self.migration_out.read(MIGRATION_OUT_SOURCE)?;

        let mut records = migration_from_table(inflow, Direction::Inflow, &self.names, issues)?;
        records.extend(migration_from_table(outflow, Direction::Outflow, &self.names, issues)?);
        Ok(records)
    }
}

fn melt(
    mut table: RawTable,
    names: &NameCanonicalizer,
    issues: &mut IssueLog,
) -> Result<Vec<LongRecord>> {
    let region = table.column_index(REGION_COLUMN)?;
    let age = table.column_index(AGE_COLUMN)?;
    table.drop_blank_rows();
    table.melt_years(region, age, names, issues)
}

/// Reshape the population table to long format
pub fn population_from_table(
    table: RawTable,
    names: &NameCanonicalizer,
    issues: &mut IssueLog,
) -> Result<Vec<RawPopulationRecord>> {
    let records = melt(table, names, issues)?
        .into_iter()
        .map(|record| RawPopulationRecord {
            country: Country::Sweden,
            municipality: record.municipality,
            age_label: record.age_label,
            year: record.year,
            value: record.value,
        })
        .collect::<Vec<_>>();

    log::info!("{POPULATION_SOURCE}: {} records", records.len());
    Ok(records)
}

/// Reshape one migration table to long format, keeping only the known end of each move
pub fn migration_from_table(
    table: RawTable,
    direction: Direction,
    names: &NameCanonicalizer,
    issues: &mut IssueLog,
) -> Result<Vec<RawMigrationRecord>> {
    let source_name = table.source_name.clone();
    let records = melt(table, names, issues)?
        .into_iter()
        .map(|record| {
            let (origin, destination) = match direction {
                Direction::Inflow => (None, Some(record.municipality)),
                Direction::Outflow => (Some(record.municipality), None),
            };
            RawMigrationRecord {
                country: Country::Sweden,
                origin,
                destination,
                age_label: record.age_label,
                year: record.year,
                count: record.value,
            }
        })
        .collect::<Vec<_>>();

    log::info!("{source_name}: {} records", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_wide_to_long() {
        let text = "region;age;2019;2020\n\
                    1280 Malmö;0 years;4000;4100\n\
                    1280 Malmö;100+ years;12;15\n";
        let table = RawTable::parse(text, b';', 0, POPULATION_SOURCE).unwrap();
        let records =
            population_from_table(table, &NameCanonicalizer::default(), &mut IssueLog::new())
                .unwrap();

        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| r.municipality == "Malmö"));
        assert_eq!(records[3].age_label.as_deref(), Some("100+ years"));
        assert_eq!(records[3].year, 2020);
        assert_eq!(records[3].value, 15);
    }

    #[test]
    fn test_space_delimited_outflow_with_quoted_names() {
        let text = "region age 2019 2020\n\
                    \"1256 Östra Göinge\" \"30 years\" 11 14\n";
        let table = RawTable::parse(text, b' ', 0, MIGRATION_OUT_SOURCE).unwrap();
        let records = migration_from_table(
            table,
            Direction::Outflow,
            &NameCanonicalizer::default(),
            &mut IssueLog::new(),
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].origin.as_deref(), Some("Östra Göinge"));
        assert_eq!(records[0].destination, None);
        assert_eq!(records[1].count, 14);
    }

    #[test]
    fn test_missing_age_column() {
        let text = "region;2019\nLund;1\n";
        let table = RawTable::parse(text, b';', 0, POPULATION_SOURCE).unwrap();
        assert!(
            population_from_table(table, &NameCanonicalizer::default(), &mut IssueLog::new())
                .is_err()
        );
    }
}
