use chrono::NaiveDate;
use quality_report::dataset::validation::{DropReason, UnresolvedKey};
use quality_report::{EntityType, ReportError, ingest_file};

use crate::utils::{Fixture, export_csv};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Two clinics reporting one metric produce clinic rows and one rollup row
#[test]
fn test_clinic_rows_and_rollup() -> quality_report::Result<()> {
    let fixture = Fixture::new();
    let path = fixture.add_export(
        "01.15.2019 Report.csv",
        &export_csv(&[("North", "Q1", "80", "100"), ("South", "Q1", "40", "50")]),
    );

    let batch = ingest_file(&path, &fixture.reference(), "FCN")?;

    assert_eq!(batch.date, date(2019, 1, 15));
    assert_eq!(batch.rows.len(), 3);
    assert_eq!(batch.rows[0].name, "North Clinic");
    assert_eq!(batch.rows[0].percentage, Some(0.8));
    assert_eq!(batch.rows[1].name, "South Clinic");
    assert_eq!(batch.rows[1].percentage, Some(0.8));

    let rollup = &batch.rows[2];
    assert_eq!(rollup.name, "FCN");
    assert_eq!(rollup.entity_type, EntityType::Organization);
    assert_eq!(rollup.metric, "Quality One");
    assert_eq!(rollup.percentage, Some(0.8));
    assert_eq!(rollup.date, date(2019, 1, 15));
    Ok(())
}

/// Individuals carry their owning clinic; percentages are rounded to four
/// decimals
#[test]
fn test_individual_rows_are_resolved() -> quality_report::Result<()> {
    let fixture = Fixture::new();
    let path = fixture.add_export(
        "02.01.2019 Report.csv",
        &export_csv(&[("Smith, Ann", "Q2", "1", "3")]),
    );

    let batch = ingest_file(&path, &fixture.reference(), "FCN")?;

    assert_eq!(batch.rows.len(), 1);
    let row = &batch.rows[0];
    assert_eq!(row.name, "Ann Smith");
    assert_eq!(row.entity_type, EntityType::Individual);
    assert_eq!(row.clinic.as_deref(), Some("North Clinic"));
    assert_eq!(row.metric, "Quality Two");
    assert_eq!(row.percentage, Some(0.3333));
    Ok(())
}

/// A zero denominator drops the row without failing the file
#[test]
fn test_zero_denominator_is_dropped() -> quality_report::Result<()> {
    let fixture = Fixture::new();
    let path = fixture.add_export(
        "03.01.2019 Report.csv",
        &export_csv(&[("Smith, Ann", "Q1", "0", "0"), ("Baker, Tom", "Q1", "3", "4")]),
    );

    let batch = ingest_file(&path, &fixture.reference(), "FCN")?;

    assert_eq!(batch.rows.len(), 1);
    assert_eq!(batch.rows[0].name, "Tom Baker");
    assert_eq!(batch.dropped.len(), 1);
    assert_eq!(batch.dropped[0].reason, DropReason::ZeroDenominator);
    Ok(())
}

/// Unknown identifiers and metric codes never reach the rows
#[test]
fn test_unresolved_codes_are_reported() -> quality_report::Result<()> {
    let fixture = Fixture::new();
    let path = fixture.add_export(
        "04.01.2019 Report.csv",
        &export_csv(&[
            ("Nobody, Jane", "Q1", "1", "2"),
            ("Nobody, Jane", "Q2", "1", "2"),
            ("Smith, Ann", "ZZ", "1", "2"),
        ]),
    );

    let batch = ingest_file(&path, &fixture.reference(), "FCN")?;

    assert!(batch.rows.is_empty());
    assert_eq!(
        batch.unresolved,
        vec![
            UnresolvedKey::Identifier("Nobody, Jane".to_string()),
            UnresolvedKey::MetricCode("ZZ".to_string()),
        ]
    );
    Ok(())
}

/// A day-first file name is a fatal error for the whole file
#[test]
fn test_malformed_filename_date_is_fatal() {
    let fixture = Fixture::new();
    let path = fixture.add_export(
        "15.01.2019 Report.csv",
        &export_csv(&[("North", "Q1", "80", "100")]),
    );

    let result = ingest_file(&path, &fixture.reference(), "FCN");
    assert!(matches!(
        result,
        Err(ReportError::MalformedFilenameDate { ref token, .. }) if token == "15.01.2019"
    ));
}

/// A source export without a required column is rejected by name
#[test]
fn test_missing_source_column() {
    let fixture = Fixture::new();
    let path = fixture.add_export(
        "05.01.2019 Report.csv",
        "NAME,Metricname,SeenNum\nNorth,Q1,3\n",
    );

    let result = ingest_file(&path, &fixture.reference(), "FCN");
    assert!(matches!(
        result,
        Err(ReportError::MissingColumn { ref column, .. }) if column == "SeenDenom"
    ));
}

/// A not-available count drops its row but the clinic still counts as zero in
/// the rollup
#[test]
fn test_not_available_count_cell() -> quality_report::Result<()> {
    let fixture = Fixture::new();
    let path = fixture.add_export(
        "06.01.2019 Report.csv",
        &export_csv(&[("North", "Q1", "8", "10"), ("South", "Q1", "N/A", "10")]),
    );

    let batch = ingest_file(&path, &fixture.reference(), "FCN")?;

    assert_eq!(batch.rows.len(), 2);
    assert_eq!(batch.rows[0].name, "North Clinic");
    assert_eq!(batch.rows[0].percentage, Some(0.8));
    assert_eq!(batch.rows[1].entity_type, EntityType::Organization);
    assert_eq!(batch.rows[1].percentage, Some(0.4));
    assert_eq!(batch.dropped.len(), 1);
    assert_eq!(batch.dropped[0].identifier, "South");
    assert_eq!(batch.dropped[0].reason, DropReason::MissingCount);
    Ok(())
}

/// A non-numeric count drops one row instead of failing the file
#[test]
fn test_non_numeric_count_cell() -> quality_report::Result<()> {
    let fixture = Fixture::new();
    let path = fixture.add_export(
        "06.02.2019 Report.csv",
        &export_csv(&[("Smith, Ann", "Q1", "abc", "4"), ("Baker, Tom", "Q1", "3", "4")]),
    );

    let batch = ingest_file(&path, &fixture.reference(), "FCN")?;

    assert_eq!(batch.rows.len(), 1);
    assert_eq!(batch.rows[0].name, "Tom Baker");
    assert_eq!(batch.dropped[0].reason, DropReason::UnparsableCount);
    Ok(())
}

/// Blank cells in the code columns are dropped rather than reported as an
/// unresolved empty code
#[test]
fn test_blank_identifier_cell() -> quality_report::Result<()> {
    let fixture = Fixture::new();
    let path = fixture.add_export(
        "06.03.2019 Report.csv",
        "NAME,Metricname,SeenNum,SeenDenom\n,Q1,1,2\nNorth,,1,2\nNorth,Q1,1,2\n",
    );

    let batch = ingest_file(&path, &fixture.reference(), "FCN")?;

    assert!(batch.unresolved.is_empty());
    assert_eq!(batch.dropped.len(), 2);
    assert!(batch.dropped.iter().all(|d| d.reason == DropReason::BlankCode));
    assert_eq!(batch.rows.len(), 2);
    Ok(())
}
