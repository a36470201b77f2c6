//! Factory functions for creating source normalizers from configuration

use std::sync::Arc;

use crate::config::{CountrySources, PipelineConfig, SourceFile};
use crate::sources::names::NameCanonicalizer;
use crate::sources::{DenmarkSource, ResolvedSource, SourceNormalizer, SwedenSource};

/// Create the normalizer for one country's configured extracts
#[must_use]
pub fn normalizer_from_sources(
    sources: &CountrySources,
    config: &PipelineConfig,
) -> Arc<dyn SourceNormalizer> {
    let resolve = |file: &SourceFile| ResolvedSource::new(config.resolve(&file.path), file.clone());
    let names = NameCanonicalizer::new(config.name_aliases.clone());

    match sources {
        CountrySources::Denmark {
            population,
            migration,
        } => Arc::new(DenmarkSource::new(
            resolve(population),
            resolve(migration),
            names,
        )),
        CountrySources::Sweden {
            population,
            migration_in,
            migration_out,
        } => Arc::new(SwedenSource::new(
            resolve(population),
            resolve(migration_in),
            resolve(migration_out),
            names,
        )),
    }
}

/// Create one normalizer per configured country, in configuration order
#[must_use]
pub fn normalizers_from_config(config: &PipelineConfig) -> Vec<Arc<dyn SourceNormalizer>> {
    config
        .sources
        .iter()
        .map(|sources| normalizer_from_sources(sources, config))
        .collect()
}
