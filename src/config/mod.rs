//! Configuration for the demography pipeline.
//!
//! The defaults mirror the layout of the yearly snapshot directory: one
//! population and one or two migration extracts per country next to the
//! Nordic municipality polygon file.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::util::safe_read_bytes;
use crate::error::{PipelineError, Result};
use crate::models::Country;

/// Sub-regions that make up the Greater Copenhagen area
pub const DEFAULT_SUB_REGIONS: [&str; 4] = ["Skåne", "Halland", "Hovedstaden", "Sjælland"];

/// How municipality centroids are obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryBackend {
    /// Compute the centroid from the boundary polygon
    #[default]
    Geo,
    /// Use the `lat`/`lon` properties carried by each polygon feature
    Precomputed,
}

impl GeometryBackend {
    /// Parse an override value such as `precomputed`
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "geo" => Some(Self::Geo),
            "precomputed" => Some(Self::Precomputed),
            _ => None,
        }
    }
}

/// One raw extract on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path, relative to the data directory unless absolute
    pub path: PathBuf,
    /// WHATWG encoding label of the file
    #[serde(default = "default_encoding")]
    pub encoding: String,
    /// Field delimiter
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Zero-based index of the header line
    #[serde(default)]
    pub header_row: usize,
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

fn default_delimiter() -> char {
    ';'
}

impl SourceFile {
    /// Create a source description
    pub fn new(path: impl Into<PathBuf>, encoding: &str, delimiter: char, header_row: usize) -> Self {
        Self {
            path: path.into(),
            encoding: encoding.to_string(),
            delimiter,
            header_row,
        }
    }

    /// Delimiter as the single byte the CSV tokenizer expects
    pub fn delimiter_byte(&self, source_name: &str) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                PipelineError::source_format(
                    source_name,
                    format!("delimiter '{}' is not a single ASCII character", self.delimiter),
                )
            })
    }
}

/// Extract files of one country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "country", rename_all = "lowercase")]
pub enum CountrySources {
    /// Statistics Denmark: BY2 population and FLY66 municipality-to-municipality moves
    Denmark {
        population: SourceFile,
        migration: SourceFile,
    },
    /// Statistics Sweden: population plus separate in- and out-migration tables
    Sweden {
        population: SourceFile,
        migration_in: SourceFile,
        migration_out: SourceFile,
    },
}

impl CountrySources {
    /// Country these sources describe
    #[must_use]
    pub fn country(&self) -> Country {
        match self {
            Self::Denmark { .. } => Country::Denmark,
            Self::Sweden { .. } => Country::Sweden,
        }
    }
}

/// Configuration for a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding the raw extracts
    pub data_dir: PathBuf,
    /// Where the canonical table is written
    pub output: PathBuf,
    /// Polygon GeoJSON, relative to `data_dir` unless absolute
    pub polygons: PathBuf,
    /// Extracts per country
    pub sources: Vec<CountrySources>,
    /// Sub-regions kept in the output
    pub sub_regions: Vec<String>,
    /// Source spelling to native spelling, applied to every municipality name
    pub name_aliases: BTreeMap<String, String>,
    /// How centroids are obtained
    pub geometry_backend: GeometryBackend,
    /// Show a progress bar while the stages run
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output: PathBuf::from("data.parquet"),
            polygons: PathBuf::from("mun_2022/nord_mun22.geojson"),
            sources: vec![
                CountrySources::Sweden {
                    population: SourceFile::new("SE_data_age.csv", "iso-8859-1", ';', 0),
                    migration_in: SourceFile::new("SE_data_migration_in.csv", "iso-8859-1", ';', 0),
                    migration_out: SourceFile::new("SE_data_migration_out.txt", "iso-8859-1", ' ', 0),
                },
                CountrySources::Denmark {
                    population: SourceFile::new("DK_data_age.csv", "iso-8859-1", ';', 1),
                    migration: SourceFile::new("DK_data_migration.csv", "utf-8", ',', 0),
                },
            ],
            sub_regions: DEFAULT_SUB_REGIONS.iter().map(ToString::to_string).collect(),
            name_aliases: BTreeMap::from([("Copenhagen".to_string(), "København".to_string())]),
            geometry_backend: GeometryBackend::Geo,
            show_progress: true,
        }
    }
}

impl PipelineConfig {
    /// Load a JSON configuration file; missing keys take their default
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = safe_read_bytes(path, "pipeline configuration")?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Use `data_dir` as the base for every relative input path
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Resolve an input path against the data directory
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }
}

impl fmt::Display for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Configuration:")?;
        writeln!(f, "  Data Directory: {}", self.data_dir.display())?;
        writeln!(f, "  Output: {}", self.output.display())?;
        writeln!(f, "  Polygons: {}", self.polygons.display())?;
        for sources in &self.sources {
            writeln!(f, "  Sources: {}", sources.country())?;
        }
        writeln!(f, "  Sub-regions: {}", self.sub_regions.join(", "))?;
        writeln!(f, "  Geometry Backend: {:?}", self.geometry_backend)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration() {
        let config = PipelineConfig::default();
        assert_eq!(config.sub_regions.len(), 4);
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.name_aliases.get("Copenhagen").map(String::as_str), Some("København"));
        assert_eq!(config.resolve(Path::new("x.csv")), PathBuf::from("data/x.csv"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "data_dir": "/srv/snapshots",
            "geometry_backend": "precomputed",
            "sources": [
                {"country": "denmark",
                 "population": {"path": "pop.csv", "encoding": "iso-8859-1", "header_row": 1},
                 "migration": {"path": "mig.csv", "delimiter": ","}}
            ]
        }"#;
        let config: PipelineConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.geometry_backend, GeometryBackend::Precomputed);
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].country(), Country::Denmark);
        match &config.sources[0] {
            CountrySources::Denmark { population, migration } => {
                assert_eq!(population.header_row, 1);
                assert_eq!(population.delimiter, ';');
                assert_eq!(migration.encoding, "utf-8");
                assert_eq!(migration.delimiter, ',');
            }
            other => panic!("unexpected sources: {other:?}"),
        }
        assert_eq!(config.sub_regions.len(), 4);
    }

    #[test]
    fn test_geometry_backend_override() {
        assert_eq!(GeometryBackend::parse("Precomputed"), Some(GeometryBackend::Precomputed));
        assert_eq!(GeometryBackend::parse("geo"), Some(GeometryBackend::Geo));
        assert_eq!(GeometryBackend::parse("shapely"), None);
        assert_eq!(GeometryBackend::parse("none"), None);
        assert_eq!(GeometryBackend::parse("0"), None);
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected() {
        let file = SourceFile::new("x.csv", "utf-8", '§', 0);
        assert!(file.delimiter_byte("x").is_err());
        let file = SourceFile::new("x.csv", "utf-8", ' ', 0);
        assert_eq!(file.delimiter_byte("x").unwrap(), b' ');
    }
}
