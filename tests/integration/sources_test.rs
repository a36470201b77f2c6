use std::fs;

use border_demography::algorithm::summary::{municipality_changes, year_components};
use border_demography::error::IssueLog;
use border_demography::sources::normalizers_from_config;
use border_demography::sources::polygons::load_polygons;
use border_demography::{Country, CountrySources, GeometryBackend, PipelineConfig, build_table};

use crate::utils::Fixture;

#[test]
fn test_latin1_extracts_decode_native_names() {
    let fixture = Fixture::new();
    let mut issues = IssueLog::new();

    let normalizers = normalizers_from_config(&fixture.config);
    let sweden = normalizers
        .iter()
        .find(|normalizer| normalizer.country() == Country::Sweden)
        .unwrap();
    let population = sweden.normalize_population(&mut issues).unwrap();

    assert!(population.iter().any(|record| record.municipality == "Malmö"));
    assert!(population.iter().all(|record| !record.municipality.starts_with("1280")));

    let moves = sweden.normalize_migration(&mut issues).unwrap();
    assert_eq!(moves.len(), 4);
    assert_eq!(moves.iter().filter(|record| record.destination.is_some()).count(), 2);
    assert_eq!(moves.iter().filter(|record| record.origin.is_some()).count(), 2);
}

#[test]
fn test_wrong_encoding_is_a_source_error() {
    let fixture = Fixture::new();
    let mut config = fixture.config.clone();
    // Latin-1 bytes of "ø" are not valid UTF-8
    for sources in &mut config.sources {
        if let CountrySources::Denmark { population, .. } = sources {
            population.encoding = "utf-8".to_string();
        }
    }
    fs::write(fixture.path("DK_data_age.csv"), b"title\n;;2019\nK\xf8ge;10;1\n").unwrap();

    let err = build_table(&config, &mut IssueLog::new()).unwrap_err();
    assert!(err.to_string().contains("DK population"));
}

#[test]
fn test_configuration_file_round_trip() {
    let fixture = Fixture::new();
    let path = fixture.path("config.json");
    fs::write(&path, serde_json::to_string_pretty(&fixture.config).unwrap()).unwrap();

    let loaded = PipelineConfig::from_file(&path).unwrap();
    assert_eq!(loaded, fixture.config);
}

#[test]
fn test_precomputed_centroids_match_geometry() {
    let fixture = Fixture::new();
    let path = fixture.config.resolve(&fixture.config.polygons);

    let computed = load_polygons(&path, &fixture.config.sub_regions, GeometryBackend::Geo).unwrap();
    let precomputed =
        load_polygons(&path, &fixture.config.sub_regions, GeometryBackend::Precomputed).unwrap();

    assert_eq!(computed.len(), 4);
    for (a, b) in computed.iter().zip(&precomputed) {
        assert_eq!(a.municipality, b.municipality);
        assert!((a.centroid.lat - b.centroid.lat).abs() < 1e-6);
        assert!((a.centroid.lon - b.centroid.lon).abs() < 1e-6);
    }
}

#[test]
fn test_summaries_over_built_table() {
    let fixture = Fixture::new();
    let rows = build_table(&fixture.config, &mut IssueLog::new()).unwrap();

    let components = year_components(&rows);
    assert_eq!(components.len(), 1);
    let c = &components[0];
    assert_eq!(c.year, 2020);
    // Malmö +100, København +31, Lund's 2020 cell was missing
    assert_eq!(c.population_prev, 5000 + 805 + 500);
    assert_eq!(c.population, 5100 + 836);
    assert_eq!(c.net_migration, 20 + 3 - 3);
    assert_eq!(c.other, c.total_change - c.net_migration);

    let changes = municipality_changes(&rows);
    let malmo = changes
        .iter()
        .find(|change| change.year == 2020 && change.municipality == "Malmö")
        .unwrap();
    assert_eq!(malmo.change, Some(100));
}
