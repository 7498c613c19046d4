//! Per-entity and site-wide JSON documents.

use serde::Serialize;

use crate::error::Result;
use crate::reference::EntityType;
use crate::report::{ReportContext, metric_variable};
use crate::utils::entity_folder_name;

/// One metric of an entity page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    /// Canonical metric name
    pub metric: String,
    /// Variable holding the chart in `chart_data.js`
    pub variable: String,
    /// Target share, if the metric has one
    pub target: Option<f64>,
    /// Value on the reporting date
    pub current: Option<f64>,
}

/// Contents of `entity.json`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityMetadata {
    pub name: String,
    pub entity_type: EntityType,
    pub clinic: Option<String>,
    pub folder: String,
    pub current_date: String,
    /// Entities compared on this page: a clinic's providers or the
    /// organization's clinics
    pub peers: Vec<String>,
    pub metrics: Vec<MetricSummary>,
}

impl EntityMetadata {
    /// Collect the page metadata of one entity
    pub fn build(
        ctx: &ReportContext,
        name: &str,
        entity_type: EntityType,
        clinic: Option<&str>,
    ) -> Result<Self> {
        let peers = match entity_type {
            EntityType::Individual => Vec::new(),
            EntityType::Clinic => ctx.reference.identities.providers_of_clinic(name),
            EntityType::Organization => ctx.dataset.clinics(),
        };

        let metrics = ctx
            .headline_metrics
            .iter()
            .map(|metric| {
                Ok(MetricSummary {
                    metric: metric.clone(),
                    variable: metric_variable(metric),
                    target: ctx.metric_target(metric)?,
                    current: ctx.dataset.value_at(name, metric, ctx.current_date),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: name.to_string(),
            entity_type,
            clinic: clinic.map(str::to_string),
            folder: entity_folder_name(name),
            current_date: ctx.current_date_string(),
            peers,
            metrics,
        })
    }
}

/// One provider link of the site index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderEntry {
    pub name: String,
    pub clinic: Option<String>,
    pub folder: String,
}

/// Contents of `index.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteIndex {
    pub current_date: String,
    pub organization: String,
    pub clinics: Vec<String>,
    /// Providers sorted by surname
    pub providers: Vec<ProviderEntry>,
}

impl SiteIndex {
    #[must_use]
    pub fn build(ctx: &ReportContext) -> Self {
        let providers = ctx
            .reference
            .identities
            .individuals()
            .into_iter()
            .map(|identity| ProviderEntry {
                name: identity.name.clone(),
                clinic: identity.clinic.clone(),
                folder: entity_folder_name(&identity.name),
            })
            .collect();

        Self {
            current_date: ctx.current_date_string(),
            organization: ctx.organization.clone(),
            clinics: ctx.dataset.clinics(),
            providers,
        }
    }
}
