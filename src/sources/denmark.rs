//! Statistics Denmark extracts
//!
//! Population (BY2) is exported with a title line above the header, blank
//! header cells for the two label columns, and the municipality written only
//! on the first row of each block. Internal migration (FLY66) is a long table
//! with one row per (destination, origin, age, year).

use crate::error::{IssueLog, Result};
use crate::models::{Country, RawMigrationRecord, RawPopulationRecord};
use crate::sources::names::NameCanonicalizer;
use crate::sources::table::{RawTable, non_empty, parse_count, parse_year};
use crate::sources::{ResolvedSource, SourceNormalizer};

pub const POPULATION_SOURCE: &str = "DK population";
pub const MIGRATION_SOURCE: &str = "DK migration";

/// Destination municipality column of FLY66
pub const DESTINATION_COLUMN: &str = "TILKOMMUNE";
/// Origin municipality column of FLY66
pub const ORIGIN_COLUMN: &str = "FRAKOMMUNE";
/// Age column of FLY66
pub const AGE_COLUMN: &str = "ALDER";
/// Year column of FLY66
pub const YEAR_COLUMN: &str = "TID";
/// Count column of FLY66
pub const VALUE_COLUMN: &str = "INDHOLD";

/// Normalizer for the Danish extracts
#[derive(Debug, Clone)]
pub struct DenmarkSource {
    population: ResolvedSource,
    migration: ResolvedSource,
    names: NameCanonicalizer,
}

impl DenmarkSource {
    /// Create a normalizer over the two Danish extracts
    #[must_use]
    pub fn new(population: ResolvedSource, migration: ResolvedSource, names: NameCanonicalizer) -> Self {
        Self {
            population,
            migration,
            names,
        }
    }
}

impl SourceNormalizer for DenmarkSource {
    fn country(&self) -> Country {
        Country::Denmark
    }

    fn normalize_population(&self, issues: &mut IssueLog) -> Result<Vec<RawPopulationRecord>> {
        let table = self.population.read(POPULATION_SOURCE)?;
        population_from_table(table, &self.names, issues)
    }

    fn normalize_migration(&self, issues: &mut IssueLog) -> Result<Vec<RawMigrationRecord>> {
        let table = self.migration.read(MIGRATION_SOURCE)?;
        migration_from_table(&table, &self.names, issues)
    }
}

/// Reshape a BY2 table: municipality in column 1 (forward-filled), age in column 2, then years
pub fn population_from_table(
    mut table: RawTable,
    names: &NameCanonicalizer,
    issues: &mut IssueLog,
) -> Result<Vec<RawPopulationRecord>> {
    table.require_width(3)?;
    table.forward_fill(0)?;
    table.drop_blank_rows();

    let records = table
        .melt_years(0, 1, names, issues)?
        .into_iter()
        .map(|record| RawPopulationRecord {
            country: Country::Denmark,
            municipality: record.municipality,
            age_label: record.age_label,
            year: record.year,
            value: record.value,
        })
        .collect::<Vec<_>>();

    log::info!("{POPULATION_SOURCE}: {} records", records.len());
    Ok(records)
}

/// Read a FLY66 table into directional migration records
pub fn migration_from_table(
    table: &RawTable,
    names: &NameCanonicalizer,
    issues: &mut IssueLog,
) -> Result<Vec<RawMigrationRecord>> {
    let destination = table.column_index(DESTINATION_COLUMN)?;
    let origin = table.column_index(ORIGIN_COLUMN)?;
    let age = table.column_index(AGE_COLUMN)?;
    let year = table.column_index(YEAR_COLUMN)?;
    let value = table.column_index(VALUE_COLUMN)?;

    let mut records = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        if row.iter().all(String::is_empty) {
            continue;
        }
        let Some(count) = parse_count(&row[value], &table.source_name, issues)? else {
            continue;
        };
        records.push(RawMigrationRecord {
            country: Country::Denmark,
            origin: non_empty(&row[origin]).map(|name| names.canonical(&name)),
            destination: non_empty(&row[destination]).map(|name| names.canonical(&name)),
            age_label: non_empty(&row[age]),
            year: parse_year(&row[year], &table.source_name)?,
            count,
        });
    }

    log::info!("{MIGRATION_SOURCE}: {} records", records.len());
    Ok(records)
}
