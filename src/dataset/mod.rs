//! The unified long-form dataset of a run
//!
//! Every canonical row and synthesized organization row of every source export
//! ends up in one [`UnifiedDataset`]. It is built once by the
//! [`assembler::DatasetAssembler`], never mutated afterwards, and queried only
//! through the read-only views in [`views`].

pub mod assembler;
pub mod export;
pub mod row;
pub mod validation;
pub mod views;

pub use assembler::DatasetAssembler;
pub use row::{CanonicalRow, round_percentage};
pub use validation::{DropReason, DroppedRow, OutOfRange, UnresolvedKey, ValidationReport};
pub use views::{SeriesPoint, ViewFilter};

/// Immutable, arrival-ordered collection of canonical rows
#[derive(Debug, Clone, Default)]
pub struct UnifiedDataset {
    rows: Vec<CanonicalRow>,
}

impl UnifiedDataset {
    pub(crate) const fn from_rows(rows: Vec<CanonicalRow>) -> Self {
        Self { rows }
    }

    /// All rows in arrival order
    #[must_use]
    pub fn rows(&self) -> &[CanonicalRow] {
        &self.rows
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
