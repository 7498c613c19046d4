//! Read-only query views over the unified dataset.
//!
//! Views never mutate the dataset. Row selections borrow from it; series and
//! date queries return owned values.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use itertools::Itertools;
use serde::Serialize;

use crate::dataset::UnifiedDataset;
use crate::dataset::row::CanonicalRow;
use crate::reference::EntityType;

/// Row predicate built from optional criteria; unset criteria match anything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    name: Option<String>,
    names: Option<BTreeSet<String>>,
    entity_type: Option<EntityType>,
    clinic: Option<String>,
    metric: Option<String>,
    date: Option<NaiveDate>,
    range: Option<(NaiveDate, NaiveDate)>,
}

impl ViewFilter {
    /// Filter matching every row
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only rows of this entity
    #[must_use]
    pub fn entity(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Only rows of any of these entities
    #[must_use]
    pub fn among<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Only rows of this entity type
    #[must_use]
    pub const fn entity_type(mut self, entity_type: EntityType) -> Self {
        self.entity_type = Some(entity_type);
        self
    }

    /// Only rows of individuals owned by this clinic
    #[must_use]
    pub fn clinic(mut self, clinic: impl Into<String>) -> Self {
        self.clinic = Some(clinic.into());
        self
    }

    /// Only rows of this metric
    #[must_use]
    pub fn metric(mut self, metric: impl Into<String>) -> Self {
        self.metric = Some(metric.into());
        self
    }

    /// Only rows observed on this date
    #[must_use]
    pub const fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Only rows observed within `start..=end`
    #[must_use]
    pub const fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.range = Some((start, end));
        self
    }

    /// Whether a row satisfies every set criterion
    #[must_use]
    pub fn matches(&self, row: &CanonicalRow) -> bool {
        self.name.as_ref().is_none_or(|name| &row.name == name)
            && self.names.as_ref().is_none_or(|names| names.contains(&row.name))
            && self.entity_type.is_none_or(|t| row.entity_type == t)
            && self
                .clinic
                .as_ref()
                .is_none_or(|clinic| row.clinic.as_ref() == Some(clinic))
            && self.metric.as_ref().is_none_or(|metric| &row.metric == metric)
            && self.date.is_none_or(|date| row.date == date)
            && self
                .range
                .is_none_or(|(start, end)| start <= row.date && row.date <= end)
    }
}

/// One point of a time series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    /// Observation date
    pub date: NaiveDate,
    /// Share, or `None` for a rollup without denominator
    pub percentage: Option<f64>,
}

impl UnifiedDataset {
    /// Rows matching a filter, in arrival order
    #[must_use]
    pub fn select(&self, filter: &ViewFilter) -> Vec<&CanonicalRow> {
        self.rows().iter().filter(|row| filter.matches(row)).collect()
    }

    /// Time series of one entity and metric, ascending by date
    #[must_use]
    pub fn time_series(&self, entity: &str, metric: &str) -> Vec<SeriesPoint> {
        let filter = ViewFilter::new().entity(entity).metric(metric);
        self.rows()
            .iter()
            .filter(|row| filter.matches(row))
            .map(|row| SeriesPoint {
                date: row.date,
                percentage: row.percentage,
            })
            .sorted_by_key(|point| point.date)
            .collect_vec()
    }

    /// Cross-sectional snapshot of a metric on a date for one entity type
    #[must_use]
    pub fn snapshot(
        &self,
        metric: &str,
        date: NaiveDate,
        entity_type: EntityType,
    ) -> Vec<&CanonicalRow> {
        self.select(
            &ViewFilter::new()
                .metric(metric)
                .on(date)
                .entity_type(entity_type),
        )
    }

    /// Cross-sectional snapshot of a metric on a date for named entities
    #[must_use]
    pub fn snapshot_of<S: AsRef<str>>(
        &self,
        metric: &str,
        date: NaiveDate,
        names: &[S],
    ) -> Vec<&CanonicalRow> {
        self.select(
            &ViewFilter::new()
                .metric(metric)
                .on(date)
                .among(names.iter().map(|n| n.as_ref().to_string())),
        )
    }

    /// Earliest observation date among rows matching a filter
    #[must_use]
    pub fn earliest_date(&self, filter: &ViewFilter) -> Option<NaiveDate> {
        self.rows()
            .iter()
            .filter(|row| filter.matches(row))
            .map(|row| row.date)
            .min()
    }

    /// Latest observation date among rows matching a filter
    #[must_use]
    pub fn latest_date(&self, filter: &ViewFilter) -> Option<NaiveDate> {
        self.rows()
            .iter()
            .filter(|row| filter.matches(row))
            .map(|row| row.date)
            .max()
    }

    /// The run's reporting date: the latest date of the whole dataset
    #[must_use]
    pub fn current_date(&self) -> Option<NaiveDate> {
        self.latest_date(&ViewFilter::new())
    }

    /// Percentage of one entity and metric on a date
    #[must_use]
    pub fn value_at(&self, entity: &str, metric: &str, date: NaiveDate) -> Option<f64> {
        let filter = ViewFilter::new().entity(entity).metric(metric).on(date);
        self.rows()
            .iter()
            .find(|row| filter.matches(row))
            .and_then(|row| row.percentage)
    }

    /// Distinct entity names of one type that have data, sorted
    #[must_use]
    pub fn entity_names(&self, entity_type: EntityType) -> Vec<String> {
        self.rows()
            .iter()
            .filter(|row| row.entity_type == entity_type)
            .map(|row| row.name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct clinics that have data, sorted
    #[must_use]
    pub fn clinics(&self) -> Vec<String> {
        self.entity_names(EntityType::Clinic)
    }
}
