use std::fs;
use std::path::{Path, PathBuf};

use border_demography::PipelineConfig;
use encoding_rs::WINDOWS_1252;
use tempfile::TempDir;

pub const SE_POPULATION: &str = "region;age;2019;2020
1280 Malmö;10 years;1000;1000
1280 Malmö;30 years;3000;3100
1280 Malmö;70 years;1000;1000
1281 Lund;5 years;500;..
1281 Lund;abc;7;7
";

pub const SE_MIGRATION_IN: &str = "region;age;2019;2020
1280 Malmö;30 years;40;50
";

pub const SE_MIGRATION_OUT: &str = "region age 2019 2020
\"1280 Malmö\" \"30 years\" 35 30
";

pub const DK_POPULATION: &str = "BY2: Population 1. January by municipality and age
;;2019;2020
Copenhagen;10 years;200;210
;40 years;600;620
;126+;5;6
;;;
Aarhus;40 years;100;100
";

pub const DK_MIGRATION: &str = "TILKOMMUNE,FRAKOMMUNE,ALDER,TID,INDHOLD
101 København,157 Gentofte,25 years,2020,12
157 Gentofte,101 København,25 years,2020,9
";

/// A square polygon feature around (lon, lat)
#[must_use]
pub fn square_feature(name: &str, sub_region: &str, country: &str, lon: f64, lat: f64) -> String {
    let (w, e, s, n) = (lon - 0.1, lon + 0.1, lat - 0.1, lat + 0.1);
    format!(
        r#"{{"type": "Feature",
            "properties": {{"MUN_NORDIC": "{name}", "REG_NORDIC": "{sub_region}", "CNTR": "{country}", "lat": {lat}, "lon": {lon}}},
            "geometry": {{"type": "Polygon", "coordinates": [[[{w}, {s}], [{e}, {s}], [{e}, {n}], [{w}, {n}], [{w}, {s}]]]}}}}"#
    )
}

/// Polygon table with four municipalities in scope and two outside it
#[must_use]
pub fn polygon_collection() -> String {
    let features = [
        square_feature("Malmö", "Skåne", "SE", 13.0, 55.6),
        square_feature("Lund", "Skåne", "SE", 13.2, 55.7),
        square_feature("København", "Hovedstaden", "DK", 12.6, 55.7),
        square_feature("Gentofte", "Hovedstaden", "DK", 12.5, 55.8),
        square_feature("Aarhus", "Midtjylland", "DK", 10.2, 56.2),
        square_feature("Oslo", "Oslo", "NO", 10.7, 59.9),
    ];
    format!(
        r#"{{"type": "FeatureCollection", "features": [{}]}}"#,
        features.join(",\n")
    )
}

/// Write text in ISO-8859-1 (windows-1252)
pub fn write_latin1(path: &Path, text: &str) {
    let (bytes, _, had_errors) = WINDOWS_1252.encode(text);
    assert!(!had_errors, "fixture is not representable in Latin-1");
    fs::write(path, bytes).unwrap();
}

/// A data directory with the default file layout
pub struct Fixture {
    pub dir: TempDir,
    pub config: PipelineConfig,
}

impl Fixture {
    /// Write all extracts and the polygon table
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path();

        write_latin1(&data.join("SE_data_age.csv"), SE_POPULATION);
        write_latin1(&data.join("SE_data_migration_in.csv"), SE_MIGRATION_IN);
        write_latin1(&data.join("SE_data_migration_out.txt"), SE_MIGRATION_OUT);
        write_latin1(&data.join("DK_data_age.csv"), DK_POPULATION);
        fs::write(data.join("DK_data_migration.csv"), DK_MIGRATION).unwrap();
        fs::write(data.join("polygons.geojson"), polygon_collection()).unwrap();

        let mut config = PipelineConfig::default().with_data_dir(data);
        config.polygons = PathBuf::from("polygons.geojson");
        config.output = data.join("out").join("data.parquet");
        config.show_progress = false;

        Self { dir, config }
    }

    /// Path of a file in the data directory
    #[must_use]
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
