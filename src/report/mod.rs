//! Chart descriptions and site documents built from the unified dataset
//!
//! Everything in this module reads from a [`ReportContext`], which bundles the
//! immutable dataset, the reference tables and the run-wide reporting date.
//! The context is shared by reference with every worker of the fan-out.

pub mod charts;
pub mod metadata;
pub mod palette;
pub mod publish;
#[cfg(test)]
pub(crate) mod test_support;

use chrono::NaiveDate;

use crate::config::ReportConfig;
use crate::dataset::UnifiedDataset;
use crate::error::{ReportError, Result};
use crate::reference::ReferenceData;

/// Display format of the reporting date
pub const CURRENT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Read-only state shared by every chart task of a run
#[derive(Debug)]
pub struct ReportContext {
    /// The assembled dataset
    pub dataset: UnifiedDataset,
    /// Reference tables
    pub reference: ReferenceData,
    /// Latest date of the dataset, fixed for the whole run
    pub current_date: NaiveDate,
    /// Name of the organization rollup entity
    pub organization: String,
    /// Sorted headline metric names
    pub headline_metrics: Vec<String>,
    /// First date of trend chart x axes
    pub graphing_start_date: NaiveDate,
    /// Last date of trend chart x axes
    pub graphing_end_date: NaiveDate,
}

impl ReportContext {
    /// Build the context; the reporting date is derived here, once
    ///
    /// # Errors
    /// Returns [`ReportError::EmptyDataset`] when there is no row to take a
    /// reporting date from.
    pub fn new(
        dataset: UnifiedDataset,
        reference: ReferenceData,
        config: &ReportConfig,
    ) -> Result<Self> {
        let current_date = dataset.current_date().ok_or(ReportError::EmptyDataset)?;
        let headline_metrics = reference.metrics.headline_metrics();
        log::info!(
            "Reporting date {} with {} headline metrics",
            current_date.format(CURRENT_DATE_FORMAT),
            headline_metrics.len()
        );

        Ok(Self {
            dataset,
            reference,
            current_date,
            organization: config.organization_name.clone(),
            headline_metrics,
            graphing_start_date: config.graphing_start_date,
            graphing_end_date: config.graphing_end_date,
        })
    }

    /// Reporting date as shown on the site
    #[must_use]
    pub fn current_date_string(&self) -> String {
        self.current_date.format(CURRENT_DATE_FORMAT).to_string()
    }

    /// Target of a metric by canonical name
    pub fn metric_target(&self, metric: &str) -> Result<Option<f64>> {
        self.reference
            .metrics
            .by_name(metric)
            .map(|info| info.target)
            .ok_or_else(|| ReportError::UnknownMetric(metric.to_string()))
    }
}

/// JavaScript variable name for a metric's chart
#[must_use]
pub fn metric_variable(metric: &str) -> String {
    metric.replace(' ', "_")
}
