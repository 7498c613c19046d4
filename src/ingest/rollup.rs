//! Organization rollup synthesis.
//!
//! Source exports report individuals and clinics but never the organization as
//! a whole. For every metric present among a file's clinic rows, clinic
//! numerators and denominators are summed into one organization row.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;

use crate::dataset::row::{CanonicalRow, round_percentage};
use crate::ingest::normalize::ClinicObservation;
use crate::reference::EntityType;

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    numerator: f64,
    denominator: f64,
}

/// Synthesize one organization row per distinct metric, in first-seen order
///
/// A metric whose clinic denominators sum to zero gets a `None` percentage.
#[must_use]
pub fn synthesize_rollup(
    organization: &str,
    date: NaiveDate,
    observations: &[ClinicObservation],
) -> Vec<CanonicalRow> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: FxHashMap<&str, Totals> = FxHashMap::default();

    for observation in observations {
        let entry = totals.entry(observation.metric.as_str()).or_insert_with(|| {
            order.push(observation.metric.as_str());
            Totals::default()
        });
        entry.numerator += observation.numerator;
        entry.denominator += observation.denominator;
    }

    order
        .into_iter()
        .map(|metric| {
            let sums = totals.get(metric).copied().unwrap_or_default();
            let percentage = round_percentage(sums.numerator, sums.denominator);
            if percentage.is_none() {
                log::warn!(
                    "Organization rollup for '{metric}' on {date} has a zero denominator; percentage left empty"
                );
            }
            CanonicalRow {
                name: organization.to_string(),
                entity_type: EntityType::Organization,
                clinic: None,
                metric: metric.to_string(),
                percentage,
                date,
            }
        })
        .collect()
}
