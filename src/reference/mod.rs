//! Reference tables that map raw export codes to canonical identities
//!
//! Both tables are loaded once per run, checked for one row per key, and then
//! passed by reference into every stage that resolves codes. Nothing in the
//! crate holds them in global state.

pub mod identity;
pub mod metric;

use std::path::Path;

pub use identity::{EntityType, Identity, IdentityTable, surname_key};
pub use metric::{MetricInfo, MetricTable};

use crate::error::Result;

/// The two reference tables of a run
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    /// Raw identifier to provider/clinic/organization
    pub identities: IdentityTable,
    /// Raw metric code to metric definition
    pub metrics: MetricTable,
}

impl ReferenceData {
    /// Load both reference tables; either one failing aborts the run
    pub fn load(names_path: &Path, metrics_path: &Path) -> Result<Self> {
        Ok(Self {
            identities: IdentityTable::load(names_path)?,
            metrics: MetricTable::load(metrics_path)?,
        })
    }

    /// Bundle tables built elsewhere
    #[must_use]
    pub const fn new(identities: IdentityTable, metrics: MetricTable) -> Self {
        Self {
            identities,
            metrics,
        }
    }
}
