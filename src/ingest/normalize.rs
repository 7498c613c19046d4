//! Row normalization for a single source export.
//!
//! Each raw row is resolved against the reference tables and turned into a
//! [`CanonicalRow`]. Clinic rows additionally keep their raw counts in a
//! [`ClinicObservation`] so the organization rollup can be summed before the
//! counts are discarded.

use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::dataset::row::{CanonicalRow, round_percentage};
use crate::dataset::validation::{DropReason, DroppedRow, UnresolvedKey};
use crate::reference::{EntityType, ReferenceData};

/// Cell values read as "no count" rather than as a malformed count
pub const MISSING_COUNT_TOKENS: [&str; 8] = ["", "NA", "N/A", "#N/A", "NaN", "nan", "null", "NULL"];

/// One raw row of a source export
///
/// Counts stay raw text until [`parse_count`] classifies them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceRow {
    /// Raw provider/clinic identifier
    #[serde(rename = "NAME")]
    pub identifier: Option<String>,
    /// Raw metric code
    #[serde(rename = "Metricname")]
    pub metric_code: Option<String>,
    /// Patients meeting the metric
    #[serde(rename = "SeenNum")]
    pub numerator: Option<String>,
    /// Patients eligible for the metric
    #[serde(rename = "SeenDenom")]
    pub denominator: Option<String>,
}

impl SourceRow {
    /// Convenience constructor for fully populated rows
    #[must_use]
    pub fn new(identifier: &str, metric_code: &str, numerator: f64, denominator: f64) -> Self {
        Self {
            identifier: Some(identifier.to_string()),
            metric_code: Some(metric_code.to_string()),
            numerator: Some(numerator.to_string()),
            denominator: Some(denominator.to_string()),
        }
    }
}

/// A numerator or denominator cell after parsing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Count {
    /// A finite number
    Value(f64),
    /// Empty cell or a not-available marker
    Missing,
    /// Anything else
    Unparsable,
}

impl Count {
    const fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Missing | Self::Unparsable => None,
        }
    }
}

/// Classify a raw count cell
#[must_use]
pub fn parse_count(raw: Option<&str>) -> Count {
    let cell = raw.map(str::trim).unwrap_or_default();
    if MISSING_COUNT_TOKENS.contains(&cell) {
        return Count::Missing;
    }
    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() => Count::Value(value),
        _ => Count::Unparsable,
    }
}

/// Raw counts of a resolved clinic row, retained for rollup synthesis
///
/// Missing or unparsable counts are recorded as zero so that the metric still
/// gets its rollup row.
#[derive(Debug, Clone, PartialEq)]
pub struct ClinicObservation {
    /// Canonical metric name
    pub metric: String,
    /// Raw numerator
    pub numerator: f64,
    /// Raw denominator
    pub denominator: f64,
}

/// Output of normalizing one file
#[derive(Debug, Clone, Default)]
pub struct NormalizedFile {
    /// Canonical rows in source order
    pub rows: Vec<CanonicalRow>,
    /// Raw counts of every resolved clinic row, in source order
    pub clinic_observations: Vec<ClinicObservation>,
    /// Codes that did not resolve, in order of first appearance in the file
    pub unresolved: Vec<UnresolvedKey>,
    /// Rows that were dropped
    pub dropped: Vec<DroppedRow>,
}

impl NormalizedFile {
    fn note_unresolved(&mut self, key: UnresolvedKey) {
        if !self.unresolved.contains(&key) {
            self.unresolved.push(key);
        }
    }
}

/// Normalize the raw rows of one file observed on `date`
#[must_use]
pub fn normalize_rows(
    source: &Path,
    date: NaiveDate,
    rows: &[SourceRow],
    reference: &ReferenceData,
) -> NormalizedFile {
    let mut out = NormalizedFile {
        rows: Vec::with_capacity(rows.len()),
        ..NormalizedFile::default()
    };

    for row in rows {
        let identifier = row.identifier.as_deref().map(str::trim).unwrap_or_default();
        let metric_code = row.metric_code.as_deref().map(str::trim).unwrap_or_default();

        let dropped_row = |reason: DropReason| DroppedRow {
            source: source.to_path_buf(),
            identifier: identifier.to_string(),
            metric_code: metric_code.to_string(),
            reason,
        };

        if identifier.is_empty() || metric_code.is_empty() {
            log::debug!("Dropping row with a blank code in {}", source.display());
            out.dropped.push(dropped_row(DropReason::BlankCode));
            continue;
        }

        let identity = reference.identities.resolve(identifier);
        let metric = reference.metrics.resolve(metric_code);
        if identity.is_none() {
            out.note_unresolved(UnresolvedKey::Identifier(identifier.to_string()));
        }
        if metric.is_none() {
            out.note_unresolved(UnresolvedKey::MetricCode(metric_code.to_string()));
        }
        let (Some(identity), Some(metric)) = (identity, metric) else {
            continue;
        };

        if identity.entity_type == EntityType::Organization {
            log::warn!(
                "Ignoring organization row {identifier:?} in {}; the rollup is synthesized from clinics",
                source.display()
            );
            out.dropped.push(dropped_row(DropReason::SourceOrganizationRow));
            continue;
        }

        let numerator = parse_count(row.numerator.as_deref());
        let denominator = parse_count(row.denominator.as_deref());

        if identity.entity_type == EntityType::Clinic {
            out.clinic_observations.push(ClinicObservation {
                metric: metric.name.clone(),
                numerator: numerator.value().unwrap_or_default(),
                denominator: denominator.value().unwrap_or_default(),
            });
        }

        let (numerator, denominator) = match (numerator, denominator) {
            (Count::Value(n), Count::Value(d)) => (n, d),
            (Count::Unparsable, _) | (_, Count::Unparsable) => {
                log::warn!(
                    "Dropping {identifier:?} / {metric_code:?} in {}: count is not a number",
                    source.display()
                );
                out.dropped.push(dropped_row(DropReason::UnparsableCount));
                continue;
            }
            _ => {
                log::debug!(
                    "Dropping {identifier:?} / {metric_code:?} in {}: missing count",
                    source.display()
                );
                out.dropped.push(dropped_row(DropReason::MissingCount));
                continue;
            }
        };

        let Some(percentage) = round_percentage(numerator, denominator) else {
            log::debug!(
                "Dropping {identifier:?} / {metric_code:?} in {}: zero denominator",
                source.display()
            );
            out.dropped.push(dropped_row(DropReason::ZeroDenominator));
            continue;
        };

        out.rows.push(CanonicalRow {
            name: identity.name.clone(),
            entity_type: identity.entity_type,
            clinic: identity.clinic.clone(),
            metric: metric.name.clone(),
            percentage: Some(percentage),
            date,
        });
    }

    out
}
