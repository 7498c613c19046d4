use chrono::NaiveDate;
use quality_report::dataset::export::write_parquet;
use quality_report::dataset::validation::UnresolvedKey;
use quality_report::{EntityType, ReportError, ViewFilter, load_dataset};

use crate::utils::{Fixture, export_csv};

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, m, d).unwrap()
}

/// Two monthly exports covering both clinics and three providers
fn two_month_fixture() -> Fixture {
    let fixture = Fixture::new();
    fixture.add_export(
        "01.15.2019 Report.csv",
        &export_csv(&[
            ("Smith, Ann", "Q1", "5", "10"),
            ("Baker, Tom", "Q1", "4", "10"),
            ("North", "Q1", "9", "20"),
            ("South", "Q1", "1", "4"),
            ("Nobody, Jane", "Q1", "1", "2"),
        ]),
    );
    fixture.add_export(
        "02.15.2019 Report.csv",
        &export_csv(&[
            ("Smith, Ann", "Q1", "7", "10"),
            ("Baker, Tom", "Q1", "6", "10"),
            ("North", "Q1", "13", "20"),
            ("South", "Q1", "3", "4"),
            ("Nobody, Jane", "Q1", "1", "2"),
            ("Jones, Kim", "Q1", "3", "2"),
        ]),
    );
    fixture
}

/// Rows arrive in file order and every file gets its own rollup
#[test]
fn test_files_are_assembled_in_order() -> quality_report::Result<()> {
    let fixture = two_month_fixture();
    let (dataset, _) = load_dataset(&fixture.config, &fixture.reference())?;

    // four resolved rows plus one rollup in the first file, five plus one in
    // the second
    assert_eq!(dataset.len(), 11);
    assert_eq!(dataset.rows()[0].date, date(1, 15));
    assert_eq!(dataset.rows()[10].date, date(2, 15));

    let rollups = dataset.select(&ViewFilter::new().entity_type(EntityType::Organization));
    assert_eq!(rollups.len(), 2);
    // (9 + 1) / (20 + 4) and (13 + 3) / (20 + 4)
    assert_eq!(rollups[0].percentage, Some(0.4167));
    assert_eq!(rollups[1].percentage, Some(0.6667));
    Ok(())
}

/// An identifier missing in every file is reported once
#[test]
fn test_unresolved_identifier_reported_once() -> quality_report::Result<()> {
    let fixture = two_month_fixture();
    let (_, report) = load_dataset(&fixture.config, &fixture.reference())?;

    assert_eq!(report.unresolved.len(), 1);
    assert!(
        report
            .unresolved
            .contains(&UnresolvedKey::Identifier("Nobody, Jane".to_string()))
    );
    assert_eq!(report.unresolved_metric_codes().count(), 0);
    Ok(())
}

/// Shares above one are kept and surfaced
#[test]
fn test_out_of_range_is_retained() -> quality_report::Result<()> {
    let fixture = two_month_fixture();
    let (dataset, report) = load_dataset(&fixture.config, &fixture.reference())?;

    assert_eq!(report.out_of_range.len(), 1);
    assert_eq!(report.out_of_range[0].name, "Kim Jones");
    assert_eq!(
        dataset.value_at("Kim Jones", "Quality One", date(2, 15)),
        Some(1.5)
    );
    Ok(())
}

/// The reporting date is the latest date of the whole dataset
#[test]
fn test_views_share_current_date() -> quality_report::Result<()> {
    let fixture = two_month_fixture();
    let (dataset, _) = load_dataset(&fixture.config, &fixture.reference())?;

    let current = dataset.current_date();
    assert_eq!(current, Some(date(2, 15)));
    assert_eq!(
        dataset.latest_date(&ViewFilter::new().metric("Quality One")),
        current
    );
    assert_eq!(
        dataset.earliest_date(&ViewFilter::new().entity("North Clinic")),
        Some(date(1, 15))
    );

    let series = dataset.time_series("Ann Smith", "Quality One");
    let values: Vec<_> = series.iter().map(|p| p.percentage).collect();
    assert_eq!(values, [Some(0.5), Some(0.7)]);

    let snapshot = dataset.snapshot("Quality One", date(2, 15), EntityType::Clinic);
    assert_eq!(snapshot.len(), 2);

    let north = dataset.select(&ViewFilter::new().clinic("North Clinic").on(date(1, 15)));
    assert_eq!(north.len(), 2);
    Ok(())
}

/// Both ends of a date range are inclusive
#[test]
fn test_between_includes_both_ends() -> quality_report::Result<()> {
    let fixture = two_month_fixture();
    let (dataset, _) = load_dataset(&fixture.config, &fixture.reference())?;

    let both = dataset.select(&ViewFilter::new().between(date(1, 15), date(2, 15)));
    assert_eq!(both.len(), 11);

    let inside = dataset.select(&ViewFilter::new().between(date(1, 16), date(2, 14)));
    assert!(inside.is_empty());

    let january = dataset.select(&ViewFilter::new().between(date(1, 15), date(1, 15)));
    assert_eq!(january.len(), 5);
    assert!(january.iter().all(|row| row.date == date(1, 15)));
    Ok(())
}

/// A malformed file name anywhere in the folder aborts the load
#[test]
fn test_malformed_file_aborts_load() {
    let fixture = two_month_fixture();
    fixture.add_export("2019-03-15 Report.csv", &export_csv(&[("North", "Q1", "1", "2")]));

    let result = load_dataset(&fixture.config, &fixture.reference());
    assert!(matches!(
        result,
        Err(ReportError::MalformedFilenameDate { .. })
    ));
}

/// The dataset snapshot holds one row per canonical row
#[test]
fn test_parquet_snapshot() -> quality_report::Result<()> {
    use parquet::file::reader::{FileReader, SerializedFileReader};

    let fixture = two_month_fixture();
    let (dataset, _) = load_dataset(&fixture.config, &fixture.reference())?;

    let path = fixture.dir.path().join("out").join("dataset.parquet");
    write_parquet(&dataset, &path)?;

    let reader = SerializedFileReader::new(std::fs::File::open(&path)?)?;
    let metadata = reader.metadata().file_metadata();
    assert_eq!(metadata.num_rows(), 11);
    assert_eq!(metadata.schema_descr().num_columns(), 6);
    Ok(())
}
