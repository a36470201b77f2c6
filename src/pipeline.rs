//! End-to-end pipeline run
//!
//! Every stage materializes its output before the next one starts. Any
//! fatal error returns before the output file is touched.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use itertools::Itertools;

use crate::algorithm::{
    PolygonIndex, attach_deltas, classify_population, join, merge, migration, percentage,
};
use crate::config::PipelineConfig;
use crate::error::{IssueLog, Result};
use crate::models::{NormalizedRow, RawMigrationRecord, RawPopulationRecord};
use crate::sources::normalizers_from_config;
use crate::sources::polygons::load_polygons;
use crate::utils::io::{read_rows, write_rows};
use crate::utils::logging::{StageProgress, log_warning};

const STAGES: u64 = 7;

/// Outcome of a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSummary {
    /// Where the table was written
    pub output: PathBuf,
    /// Rows in the table
    pub rows: usize,
    /// Distinct municipalities in the table
    pub municipalities: usize,
    /// First and last year in the table
    pub years: Option<(i32, i32)>,
    /// Data issues absorbed along the way
    pub issues: IssueLog,
}

impl fmt::Display for PipelineSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Summary:")?;
        writeln!(f, "  Output: {}", self.output.display())?;
        writeln!(f, "  Rows: {}", self.rows)?;
        writeln!(f, "  Municipalities: {}", self.municipalities)?;
        if let Some((first, last)) = self.years {
            writeln!(f, "  Years: {first}-{last}")?;
        }
        writeln!(f, "  Unknown ages excluded: {}", self.issues.unknown_age_count())?;
        writeln!(
            f,
            "  Municipalities outside scope: {}",
            self.issues.unmatched_municipalities.len()
        )?;
        writeln!(f, "  Zero-total municipality-years: {}", self.issues.zero_totals)?;
        Ok(())
    }
}

/// Build the canonical table from the configured extracts, without writing it
pub fn build_table(config: &PipelineConfig, issues: &mut IssueLog) -> Result<Vec<NormalizedRow>> {
    let mut progress = StageProgress::new(STAGES, config.show_progress);

    progress.stage("loading polygons");
    let polygons = load_polygons(
        &config.resolve(&config.polygons),
        &config.sub_regions,
        config.geometry_backend,
    )?;
    let index = PolygonIndex::new(polygons);
    if index.is_empty() {
        log_warning("No polygons in the target sub-regions", Some(&config.polygons));
    }
    for (sub_region, members) in index.members() {
        log::info!("{sub_region}: {} municipalities", members.len());
    }

    progress.stage("normalizing sources");
    let mut population: Vec<RawPopulationRecord> = Vec::new();
    let mut moves: Vec<RawMigrationRecord> = Vec::new();
    for normalizer in normalizers_from_config(config) {
        log::info!("Normalizing {} extracts", normalizer.country());
        population.extend(normalizer.normalize_population(issues)?);
        moves.extend(normalizer.normalize_migration(issues)?);
    }

    progress.stage("classifying ages");
    let observations = classify_population(population, issues);
    let migration_rows = migration::aggregate(moves, issues);

    progress.stage("joining polygons");
    let observations = join(observations, &index, issues);
    let migration_rows = join(migration_rows, &index, issues);

    progress.stage("aggregating");
    let aggregates = percentage::aggregate(observations, issues);

    progress.stage("merging");
    let rows = merge(aggregates, migration_rows);

    progress.stage("computing deltas");
    let rows = attach_deltas(rows);

    progress.finish();
    Ok(rows)
}

/// Run the pipeline and write the canonical table to `config.output`
pub fn run(config: &PipelineConfig) -> Result<PipelineSummary> {
    let start = Instant::now();
    log::info!("{config}");

    let mut issues = IssueLog::new();
    let rows = build_table(config, &mut issues)?;
    if rows.is_empty() {
        log_warning("No rows survived the pipeline", Some(&config.output));
    }
    write_rows(&config.output, &rows)?;
    issues.log_summary();

    let summary = PipelineSummary {
        output: config.output.clone(),
        rows: rows.len(),
        municipalities: rows.iter().map(|row| &row.municipality).unique().count(),
        years: rows.iter().map(|row| row.year).minmax().into_option(),
        issues,
    };
    log::info!("Pipeline finished in {:?}", start.elapsed());
    Ok(summary)
}

/// Read a previously written canonical table
pub fn load(path: &Path) -> Result<Vec<NormalizedRow>> {
    read_rows(path)
}
