//! Metric table: raw metric codes to canonical metrics and targets.

use std::path::Path;

use itertools::Itertools;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::util::open_reference_table;
use crate::error::{ReportError, Result};
use crate::reader::read_rows_from_file;
use crate::schema::METRICS_COLUMNS;

/// Value of the `Main` column that marks a headline metric
pub const HEADLINE_MARKER: &str = "Main";

/// Canonical metric definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricInfo {
    /// Canonical metric name
    pub name: String,
    /// Target share in `[0, 1]`; `None` means the metric has no target
    pub target: Option<f64>,
    /// Whether the metric is part of the default chart set
    pub headline: bool,
}

#[derive(Debug, Deserialize)]
struct MetricsRow {
    #[serde(rename = "MeridiosMetric")]
    key: Option<String>,
    #[serde(rename = "Metric")]
    name: Option<String>,
    #[serde(rename = "Target")]
    target: Option<f64>,
    #[serde(rename = "Main")]
    main: Option<String>,
}

/// Immutable mapping from raw metric code to [`MetricInfo`]
#[derive(Debug, Clone, Default)]
pub struct MetricTable {
    entries: FxHashMap<String, MetricInfo>,
    by_name: FxHashMap<String, MetricInfo>,
}

impl MetricTable {
    /// Load the metric table from a CSV file
    ///
    /// # Errors
    /// Fails if the file is missing, lacks a required column, repeats a code,
    /// has a target outside `[0, 1]`, or defines one metric inconsistently.
    pub fn load(path: &Path) -> Result<Self> {
        let file = open_reference_table(path)?;
        let rows: Vec<MetricsRow> = read_rows_from_file(path, file, &METRICS_COLUMNS)?;

        let mut table = Self::default();
        for row in rows {
            let Some(key) = row.key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
            else {
                continue;
            };
            if table.entries.contains_key(&key) {
                return Err(ReportError::DuplicateReferenceKey {
                    path: path.to_path_buf(),
                    key,
                });
            }

            let name = row
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .ok_or_else(|| ReportError::InvalidReferenceRow {
                    key: key.clone(),
                    reason: "missing Metric".to_string(),
                })?;
            let headline = row
                .main
                .is_some_and(|m| m.trim().eq_ignore_ascii_case(HEADLINE_MARKER));

            table.insert(
                key,
                MetricInfo {
                    name,
                    target: row.target,
                    headline,
                },
            )?;
        }

        log::info!(
            "Loaded {} metric codes ({} headline metrics) from {}",
            table.entries.len(),
            table.headline_metrics().len(),
            path.display()
        );
        Ok(table)
    }

    /// Build a table from already resolved entries
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, MetricInfo)>,
    {
        let mut table = Self::default();
        for (key, info) in entries {
            if table.entries.contains_key(&key) {
                return Err(ReportError::InvalidReferenceRow {
                    key,
                    reason: "duplicate key".to_string(),
                });
            }
            table.insert(key, info)?;
        }
        Ok(table)
    }

    fn insert(&mut self, key: String, info: MetricInfo) -> Result<()> {
        if let Some(target) = info.target {
            if !(0.0..=1.0).contains(&target) {
                return Err(ReportError::InvalidReferenceRow {
                    key,
                    reason: format!("target {target} is outside [0, 1]"),
                });
            }
        }

        match self.by_name.get(&info.name) {
            Some(existing) if existing != &info => {
                return Err(ReportError::ConflictingMetricDefinition { metric: info.name });
            }
            Some(_) => {}
            None => {
                self.by_name.insert(info.name.clone(), info.clone());
            }
        }
        self.entries.insert(key, info);
        Ok(())
    }

    /// Resolve a raw metric code
    #[must_use]
    pub fn resolve(&self, raw_code: &str) -> Option<&MetricInfo> {
        self.entries.get(raw_code.trim())
    }

    /// Look up a metric by canonical name
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&MetricInfo> {
        self.by_name.get(name)
    }

    /// Sorted canonical names of the headline metrics
    #[must_use]
    pub fn headline_metrics(&self) -> Vec<String> {
        self.by_name
            .values()
            .filter(|info| info.headline)
            .map(|info| info.name.clone())
            .sorted()
            .collect_vec()
    }

    /// Number of metric codes in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
