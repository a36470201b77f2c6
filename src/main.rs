use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use border_demography::algorithm::summary::{
    MigrationShareBand, age_structure, migration_share_bands, municipality_changes, municipality_trajectories, year_components,
};
use border_demography::{GeometryBackend, PipelineConfig};
use log::{info, warn};

/// Environment variable overriding the configured geometry backend
const GEOMETRY_ENV: &str = "BORDER_DEMOGRAPHY_GEOMETRY";

const USAGE: &str = "usage: border-demography run [config.json]\n       border-demography load [table.parquet]";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.first().map(String::as_str) {
        Some("run") => run(args.get(1).map(PathBuf::from)),
        Some("load") => load(args.get(1).map(PathBuf::from)),
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = match &config_path {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Ok(value) = std::env::var(GEOMETRY_ENV) {
        match GeometryBackend::parse(&value) {
            Some(backend) => config.geometry_backend = backend,
            None => bail!("{GEOMETRY_ENV}={value} is not one of geo, precomputed"),
        }
    }

    let summary = border_demography::run(&config)?;
    println!("{summary}");
    Ok(())
}

fn load(path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(|| PipelineConfig::default().output);
    let rows = border_demography::load(Path::new(&path))
        .with_context(|| format!("loading table {}", path.display()))?;
    info!("Loaded {} rows", rows.len());
    if rows.is_empty() {
        warn!("Table is empty");
        return Ok(());
    }

    println!("Population change by component:");
    for c in year_components(&rows) {
        println!(
            "  {}: population {} ({:+}), internal net migration {:+}, other {:+}",
            c.year, c.population, c.total_change, c.net_migration, c.other
        );
    }

    println!("Age structure:");
    for ((year, age_group), population) in age_structure(&rows) {
        println!("  {year} {age_group}: {population}");
    }

    let changes = municipality_changes(&rows);
    println!("Municipality trajectories (last three years):");
    for (municipality, trajectory) in municipality_trajectories(&changes) {
        println!("  {municipality}: {trajectory}");
    }

    println!("Net migration as share of population:");
    for (year, bands) in migration_share_bands(&rows) {
        let counts: Vec<String> = MigrationShareBand::ALL
            .iter()
            .map(|band| format!("{band}: {}", bands.get(band).copied().unwrap_or(0)))
            .collect();
        println!("  {year}: {}", counts.join(", "));
    }
    Ok(())
}
