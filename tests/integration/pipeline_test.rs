use std::fs;

use border_demography::{AgeGroup, NormalizedRow, PipelineError, Trend, load, run};

use crate::utils::{Fixture, write_latin1};

fn find<'a>(rows: &'a [NormalizedRow], municipality: &str, year: i32, group: AgeGroup) -> &'a NormalizedRow {
    rows.iter()
        .find(|row| row.key() == (municipality, year, group))
        .unwrap_or_else(|| panic!("no row for {municipality} {year} {group}"))
}

#[test]
fn test_end_to_end_table() {
    let fixture = Fixture::new();
    let summary = run(&fixture.config).unwrap();
    let rows = load(&fixture.config.output).unwrap();

    assert_eq!(summary.rows, rows.len());
    assert_eq!(rows.len(), 14);
    assert_eq!(summary.municipalities, 4);
    assert_eq!(summary.years, Some((2019, 2020)));

    // Canonical order
    let keys: Vec<_> = rows.iter().map(NormalizedRow::key).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);

    // Shares of a municipality-year
    for (group, expected) in [(AgeGroup::Youth, 20.0), (AgeGroup::WorkingAge, 60.0), (AgeGroup::Elderly, 20.0)] {
        let row = find(&rows, "Malmö", 2019, group);
        assert_eq!(row.value_total, Some(5000));
        assert!((row.percentage.unwrap() - expected).abs() < 1e-9);
        assert_eq!(row.sub_region, "Skåne");
        assert_eq!(row.country, "SE");
    }

    // Migration and year-over-year change
    let malmo = find(&rows, "Malmö", 2020, AgeGroup::WorkingAge);
    assert_eq!((malmo.inflow, malmo.outflow, malmo.net_migration), (Some(50), Some(30), Some(20)));
    assert_eq!(malmo.value_grouped_prev, Some(3000));
    assert_eq!(malmo.value_grouped_change, Some(100));
    assert!((malmo.value_grouped_change_pct.unwrap() - 100.0 / 3000.0 * 100.0).abs() < 1e-9);
    assert_eq!(malmo.net_migration_prev, Some(5));
    assert_eq!(malmo.net_migration_change, Some(15));
    assert_eq!(malmo.net_migration_trend, Some(Trend::Positive));
    assert!((malmo.lat - 55.6).abs() < 1e-6);
    assert!((malmo.lon - 13.0).abs() < 1e-6);

    let first_year = find(&rows, "Malmö", 2019, AgeGroup::Youth);
    assert_eq!(first_year.value_grouped_prev, None);
    assert_eq!(first_year.inflow, None);

    // Exonym, forward fill and top-coded age
    let elderly = find(&rows, "København", 2020, AgeGroup::Elderly);
    assert_eq!(elderly.value_grouped, Some(6));
    assert_eq!(elderly.value_total, Some(836));
    let kbh = find(&rows, "København", 2020, AgeGroup::WorkingAge);
    assert_eq!((kbh.inflow, kbh.outflow, kbh.net_migration), (Some(12), Some(9), Some(3)));
    assert_eq!(kbh.country, "DK");

    // Migration without population
    let gentofte = find(&rows, "Gentofte", 2020, AgeGroup::WorkingAge);
    assert_eq!(gentofte.value_grouped, None);
    assert_eq!(gentofte.value_total, None);
    assert_eq!(gentofte.net_migration, Some(-3));
    assert_eq!(gentofte.net_migration_per_1000, None);
    assert_eq!(gentofte.net_migration_trend, Some(Trend::Negative));

    // Missing values and unknown ages
    assert!(rows.iter().all(|row| row.municipality != "Lund" || row.year == 2019));
    assert_eq!(find(&rows, "Lund", 2019, AgeGroup::Youth).percentage, Some(100.0));
    assert_eq!(summary.issues.unknown_ages.get("abc"), Some(&2));
    assert_eq!(summary.issues.missing_values.get("SE population"), Some(&1));
}

#[test]
fn test_municipality_outside_scope_never_reaches_output() {
    let fixture = Fixture::new();
    let summary = run(&fixture.config).unwrap();
    let rows = load(&fixture.config.output).unwrap();

    assert!(rows.iter().all(|row| row.municipality != "Aarhus"));
    assert!(summary.issues.unmatched_municipalities.contains_key("Aarhus"));
}

#[test]
fn test_net_is_inflow_minus_outflow_everywhere() {
    let fixture = Fixture::new();
    run(&fixture.config).unwrap();
    let rows = load(&fixture.config.output).unwrap();

    for row in rows.iter().filter(|row| row.net_migration.is_some()) {
        assert_eq!(row.net_migration, Some(row.inflow.unwrap() - row.outflow.unwrap()));
    }
}

#[test]
fn test_rerun_is_byte_identical() {
    let fixture = Fixture::new();
    run(&fixture.config).unwrap();
    let first = fs::read(&fixture.config.output).unwrap();
    run(&fixture.config).unwrap();
    let second = fs::read(&fixture.config.output).unwrap();

    assert_eq!(first, second);
}

#[cfg(unix)]
#[test]
fn test_table_is_readable_by_others() {
    use std::os::unix::fs::PermissionsExt;

    let fixture = Fixture::new();
    run(&fixture.config).unwrap();
    let mode = fs::metadata(&fixture.config.output).unwrap().permissions().mode();

    assert_eq!(mode & 0o777, 0o644);
}

#[test]
fn test_missing_extract_aborts_before_writing() {
    let fixture = Fixture::new();
    fs::remove_file(fixture.path("DK_data_migration.csv")).unwrap();

    let err = run(&fixture.config).unwrap_err();
    assert!(matches!(err, PipelineError::MissingSource { .. }));
    assert!(!fixture.config.output.exists());
}

#[test]
fn test_leading_blank_municipality_aborts() {
    let fixture = Fixture::new();
    write_latin1(
        &fixture.path("DK_data_age.csv"),
        "title\n;;2019\n;10 years;200\n",
    );

    let err = run(&fixture.config).unwrap_err();
    assert!(matches!(err, PipelineError::SourceFormat { .. }));
    assert!(!fixture.config.output.exists());
}

#[test]
fn test_failed_run_keeps_previous_table() {
    let fixture = Fixture::new();
    run(&fixture.config).unwrap();
    let before = fs::read(&fixture.config.output).unwrap();

    fs::write(fixture.path("SE_data_migration_in.csv"), "region;age;2019\nMalmö;30;many\n").unwrap();
    assert!(run(&fixture.config).is_err());
    assert_eq!(fs::read(&fixture.config.output).unwrap(), before);
}
