//! Dataset assembly from per-file batches.

use crate::dataset::UnifiedDataset;
use crate::dataset::row::CanonicalRow;
use crate::dataset::validation::{OutOfRange, ValidationReport};
use crate::ingest::FileBatch;

/// Accumulates per-file batches, in file order, into a [`UnifiedDataset`]
#[derive(Debug, Default)]
pub struct DatasetAssembler {
    rows: Vec<CanonicalRow>,
    report: ValidationReport,
    files: usize,
}

impl DatasetAssembler {
    /// Create an empty assembler
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the rows and findings of one file
    pub fn push(&mut self, batch: FileBatch) {
        self.files += 1;
        self.report.unresolved.extend(batch.unresolved);
        self.report.dropped.extend(batch.dropped);
        self.rows.extend(batch.rows);
    }

    /// Number of files appended so far
    #[must_use]
    pub const fn file_count(&self) -> usize {
        self.files
    }

    /// Freeze the dataset and finish the validation report
    ///
    /// Out-of-range percentages are reported but the rows stay in the dataset.
    #[must_use]
    pub fn finish(self) -> (UnifiedDataset, ValidationReport) {
        let Self {
            rows,
            mut report,
            files,
        } = self;

        report.out_of_range = rows.iter().filter_map(OutOfRange::from_row).collect();

        log::info!(
            "Assembled {} rows from {} files ({} unresolved codes, {} out-of-range percentages)",
            rows.len(),
            files,
            report.unresolved.len(),
            report.out_of_range.len()
        );

        (UnifiedDataset::from_rows(rows), report)
    }
}
