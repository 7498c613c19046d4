//! Canonical observation rows.

use chrono::NaiveDate;
use serde::Serialize;

use crate::reference::EntityType;

/// Decimal places kept for percentages (basis points)
pub const PERCENTAGE_DECIMALS: i32 = 4;

/// Share `numerator / denominator` rounded to four decimals
///
/// Returns `None` when the denominator is zero or either input is not finite,
/// so callers never divide by zero or carry NaN into the dataset.
#[must_use]
pub fn round_percentage(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 || !numerator.is_finite() || !denominator.is_finite() {
        return None;
    }
    Some(round_to_basis_points(numerator / denominator))
}

/// Round a share to four decimals
#[must_use]
pub fn round_to_basis_points(value: f64) -> f64 {
    let scale = 10f64.powi(PERCENTAGE_DECIMALS);
    (value * scale).round() / scale
}

/// One (entity, metric, date) observation after resolution
///
/// Raw numerator and denominator are not part of the row; they are dropped
/// once the organization rollup for the row's file has been synthesized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRow {
    /// Canonical entity name
    pub name: String,
    /// Entity type
    pub entity_type: EntityType,
    /// Owning clinic, only for individuals
    pub clinic: Option<String>,
    /// Canonical metric name
    pub metric: String,
    /// Share in `[0, 1]` for valid data. `None` only on organization rollup
    /// rows whose summed denominator is zero.
    pub percentage: Option<f64>,
    /// Observation date taken from the source file name
    pub date: NaiveDate,
}

impl CanonicalRow {
    /// Whether the percentage lies outside `[0, 1]`
    #[must_use]
    pub fn is_out_of_range(&self) -> bool {
        self.percentage
            .is_some_and(|p| !(0.0..=1.0).contains(&p))
    }
}
