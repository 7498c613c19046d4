//! Validation findings collected while a dataset is assembled.
//!
//! Findings never abort a run. They are gathered across every source file and
//! emitted once, after assembly, as named categories: unresolved identifiers,
//! unresolved metric codes and out-of-range percentages.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::row::CanonicalRow;

/// A raw export code that the reference tables do not know
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "kind", content = "code")]
pub enum UnresolvedKey {
    /// Raw provider/clinic identifier missing from the identity table
    Identifier(String),
    /// Raw metric code missing from the metric table
    MetricCode(String),
}

impl fmt::Display for UnresolvedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(code) => write!(f, "identifier {code:?}"),
            Self::MetricCode(code) => write!(f, "metric code {code:?}"),
        }
    }
}

/// A retained row whose percentage lies outside `[0, 1]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutOfRange {
    /// Entity name
    pub name: String,
    /// Metric name
    pub metric: String,
    /// Observation date
    pub date: NaiveDate,
    /// Offending percentage
    pub percentage: f64,
}

impl OutOfRange {
    /// Build a finding from a row, if the row is out of range
    #[must_use]
    pub fn from_row(row: &CanonicalRow) -> Option<Self> {
        if !row.is_out_of_range() {
            return None;
        }
        row.percentage.map(|percentage| Self {
            name: row.name.clone(),
            metric: row.metric.clone(),
            date: row.date,
            percentage,
        })
    }
}

/// Why a source row was left out of the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DropReason {
    /// Identifier or metric code cell was blank
    BlankCode,
    /// Denominator was zero
    ZeroDenominator,
    /// Numerator or denominator cell was empty or a not-available marker
    MissingCount,
    /// Numerator or denominator cell was not a number
    UnparsableCount,
    /// The export reported the organization itself; the synthesized rollup
    /// replaces it
    SourceOrganizationRow,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::BlankCode => "blank identifier or metric code",
            Self::ZeroDenominator => "zero denominator",
            Self::MissingCount => "missing numerator or denominator",
            Self::UnparsableCount => "non-numeric numerator or denominator",
            Self::SourceOrganizationRow => "organization row in source export",
        };
        f.write_str(label)
    }
}

/// A source row that was dropped, kept for the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedRow {
    /// Source file the row came from
    pub source: PathBuf,
    /// Raw identifier of the row
    pub identifier: String,
    /// Raw metric code of the row
    pub metric_code: String,
    /// Why it was dropped
    pub reason: DropReason,
}

/// Findings of one run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// Raw identifiers and metric codes without a reference entry, each once
    pub unresolved: BTreeSet<UnresolvedKey>,
    /// Retained rows with a percentage outside `[0, 1]`
    pub out_of_range: Vec<OutOfRange>,
    /// Source rows dropped during normalization
    pub dropped: Vec<DroppedRow>,
}

impl ValidationReport {
    /// Whether nothing was found
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty() && self.out_of_range.is_empty() && self.dropped.is_empty()
    }

    /// Unresolved raw identifiers only
    pub fn unresolved_identifiers(&self) -> impl Iterator<Item = &str> {
        self.unresolved.iter().filter_map(|key| match key {
            UnresolvedKey::Identifier(code) => Some(code.as_str()),
            UnresolvedKey::MetricCode(_) => None,
        })
    }

    /// Unresolved raw metric codes only
    pub fn unresolved_metric_codes(&self) -> impl Iterator<Item = &str> {
        self.unresolved.iter().filter_map(|key| match key {
            UnresolvedKey::MetricCode(code) => Some(code.as_str()),
            UnresolvedKey::Identifier(_) => None,
        })
    }

    /// Emit the report through the log, once per run
    pub fn log(&self) {
        if self.is_clean() {
            log::info!("Validation found no unresolved codes or out-of-range percentages");
            return;
        }

        log_unresolved("identifiers", self.unresolved_identifiers());
        log_unresolved("metric codes", self.unresolved_metric_codes());

        if !self.out_of_range.is_empty() {
            log::warn!("Out-of-range percentages ({}):", self.out_of_range.len());
            for finding in &self.out_of_range {
                log::warn!(
                    "  {} / {} on {}: {}",
                    finding.name,
                    finding.metric,
                    finding.date,
                    finding.percentage
                );
            }
        }

        if !self.dropped.is_empty() {
            log::info!("Dropped {} rows during normalization", self.dropped.len());
        }
    }
}

fn log_unresolved<'a>(category: &str, codes: impl Iterator<Item = &'a str>) {
    let codes: Vec<&str> = codes.collect();
    if !codes.is_empty() {
        log::warn!("Unresolved {category} ({}): {}", codes.len(), codes.join(", "));
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation Report:")?;
        writeln!(
            f,
            "  Unresolved Identifiers: {}",
            self.unresolved_identifiers().count()
        )?;
        writeln!(
            f,
            "  Unresolved Metric Codes: {}",
            self.unresolved_metric_codes().count()
        )?;
        writeln!(f, "  Out-of-Range Percentages: {}", self.out_of_range.len())?;
        writeln!(f, "  Dropped Rows: {}", self.dropped.len())
    }
}
