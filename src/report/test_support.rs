//! Small in-memory report context shared by the report unit tests

use chrono::NaiveDate;

use crate::config::ReportConfig;
use crate::dataset::{CanonicalRow, UnifiedDataset};
use crate::reference::identity::{Identity, IdentityTable};
use crate::reference::metric::{MetricInfo, MetricTable};
use crate::reference::{EntityType, ReferenceData};
use crate::report::ReportContext;

pub fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, m, d).unwrap()
}

fn identity(name: &str, entity_type: EntityType, clinic: Option<&str>) -> Identity {
    Identity {
        name: name.to_string(),
        entity_type,
        clinic: clinic.map(str::to_string),
    }
}

fn row(
    name: &str,
    entity_type: EntityType,
    clinic: Option<&str>,
    metric: &str,
    percentage: Option<f64>,
    date: NaiveDate,
) -> CanonicalRow {
    CanonicalRow {
        name: name.to_string(),
        entity_type,
        clinic: clinic.map(str::to_string),
        metric: metric.to_string(),
        percentage,
        date,
    }
}

pub fn reference() -> ReferenceData {
    let identities = IdentityTable::from_entries([
        (
            "Smith, Ann".to_string(),
            identity("Ann Smith", EntityType::Individual, Some("North Clinic")),
        ),
        (
            "Baker, Tom".to_string(),
            identity("Tom Baker", EntityType::Individual, Some("North Clinic")),
        ),
        (
            "North".to_string(),
            identity("North Clinic", EntityType::Clinic, None),
        ),
    ])
    .unwrap();
    let metrics = MetricTable::from_entries([
        (
            "A1c<8".to_string(),
            MetricInfo {
                name: "A1c Control".to_string(),
                target: Some(0.6),
                headline: true,
            },
        ),
        (
            "BP".to_string(),
            MetricInfo {
                name: "BP Control".to_string(),
                target: None,
                headline: true,
            },
        ),
    ])
    .unwrap();
    ReferenceData::new(identities, metrics)
}

pub fn dataset() -> UnifiedDataset {
    let north = Some("North Clinic");
    let mut rows = Vec::new();
    for (d, ann, tom, clinic, org) in [
        (date(1, 15), 0.5, 0.4, 0.45, 0.45),
        (date(2, 15), 0.7, 0.6, 0.65, 0.65),
    ] {
        for metric in ["A1c Control", "BP Control"] {
            rows.push(row("Ann Smith", EntityType::Individual, north, metric, Some(ann), d));
            rows.push(row("Tom Baker", EntityType::Individual, north, metric, Some(tom), d));
            rows.push(row("North Clinic", EntityType::Clinic, None, metric, Some(clinic), d));
            rows.push(row("FCN", EntityType::Organization, None, metric, Some(org), d));
        }
    }
    UnifiedDataset::from_rows(rows)
}

pub fn context() -> ReportContext {
    ReportContext::new(dataset(), reference(), &ReportConfig::default()).unwrap()
}
