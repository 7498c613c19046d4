use quality_report::reference::{IdentityTable, MetricTable};
use quality_report::{EntityType, ReferenceData, ReportError};

use crate::utils::{Fixture, METRICS_CSV, NAMES_CSV, write_file};

/// Both tables load and resolve their keys
#[test]
fn test_reference_tables_load() -> quality_report::Result<()> {
    let fixture = Fixture::new();
    let reference = ReferenceData::load(&fixture.config.names_path, &fixture.config.metrics_path)?;

    let ann = reference.identities.resolve("Smith, Ann").unwrap();
    assert_eq!(ann.name, "Ann Smith");
    assert_eq!(ann.entity_type, EntityType::Individual);
    assert_eq!(ann.clinic.as_deref(), Some("North Clinic"));

    let org = reference.identities.resolve("All Clinics").unwrap();
    assert_eq!(org.entity_type, EntityType::Organization);

    let q1 = reference.metrics.resolve("Q1").unwrap();
    assert_eq!(q1.name, "Quality One");
    assert_eq!(q1.target, Some(0.75));
    assert!(q1.headline);
    assert_eq!(reference.metrics.resolve("Q2").unwrap().target, None);
    assert!(!reference.metrics.resolve("Q3").unwrap().headline);

    assert_eq!(
        reference.metrics.headline_metrics(),
        vec!["Quality One", "Quality Two"]
    );
    assert_eq!(
        reference.identities.providers_of_clinic("North Clinic"),
        vec!["Tom Baker", "Ann Smith"]
    );
    Ok(())
}

/// A header with a byte order mark still resolves its first column
#[test]
fn test_bom_header() -> quality_report::Result<()> {
    let fixture = Fixture::new();
    let path = write_file(
        fixture.dir.path(),
        "bom_metrics.csv",
        &format!("\u{feff}{METRICS_CSV}"),
    );

    let table = MetricTable::load(&path)?;
    assert_eq!(table.len(), 3);
    Ok(())
}

/// A missing table is a named fatal error
#[test]
fn test_missing_reference_table() {
    let fixture = Fixture::new();
    let missing = fixture.dir.path().join("nope.csv");

    let result = IdentityTable::load(&missing);
    assert!(matches!(result, Err(ReportError::MissingReferenceTable(ref p)) if p == &missing));
}

/// The same key twice is rejected
#[test]
fn test_duplicate_key() {
    let fixture = Fixture::new();
    let names = format!("{NAMES_CSV}North,North Clinic,Clinic,\n");
    let path = write_file(fixture.dir.path(), "dup_names.csv", &names);

    let result = IdentityTable::load(&path);
    assert!(matches!(
        result,
        Err(ReportError::DuplicateReferenceKey { ref key, .. }) if key == "North"
    ));
}

/// An entity type outside the known set is rejected
#[test]
fn test_unknown_entity_type() {
    let fixture = Fixture::new();
    let path = write_file(
        fixture.dir.path(),
        "bad_type.csv",
        "MeridiosName,Name,Type,Clinic\nX,Someone,Nurse,\n",
    );

    assert!(matches!(
        IdentityTable::load(&path),
        Err(ReportError::InvalidReferenceRow { ref key, .. }) if key == "X"
    ));
}

/// Two codes for the same metric must agree on target and headline flag
#[test]
fn test_conflicting_metric_definition() {
    let fixture = Fixture::new();
    let metrics = format!("{METRICS_CSV}Q1b,Quality One,0.5,Main\n");
    let path = write_file(fixture.dir.path(), "conflict.csv", &metrics);

    assert!(matches!(
        MetricTable::load(&path),
        Err(ReportError::ConflictingMetricDefinition { ref metric }) if metric == "Quality One"
    ));
}

/// A table without a required column is rejected by name
#[test]
fn test_missing_reference_column() {
    let fixture = Fixture::new();
    let path = write_file(
        fixture.dir.path(),
        "no_target.csv",
        "MeridiosMetric,Metric,Main\nQ1,Quality One,Main\n",
    );

    assert!(matches!(
        MetricTable::load(&path),
        Err(ReportError::MissingColumn { ref column, .. }) if column == "Target"
    ));
}
