//! Ingestion of dated source exports
//!
//! A source export is processed in three steps:
//! 1. its observation date is taken from the file name (fatal if malformed),
//! 2. its rows are normalized against the reference tables,
//! 3. the organization rollup is synthesized from the clinic rows while their
//!    raw counts are still available.
//!
//! The result is one [`FileBatch`] per file, ready for the dataset assembler.

pub mod normalize;
pub mod rollup;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

pub use normalize::{
    ClinicObservation, Count, NormalizedFile, SourceRow, normalize_rows, parse_count,
};
pub use rollup::synthesize_rollup;

use crate::dataset::row::CanonicalRow;
use crate::dataset::validation::{DroppedRow, UnresolvedKey};
use crate::error::Result;
use crate::reader::read_csv_rows;
use crate::reference::ReferenceData;
use crate::schema::SOURCE_COLUMNS;
use crate::utils::extract_report_date;

/// Canonical rows of one source export, rollup included
#[derive(Debug, Clone)]
pub struct FileBatch {
    /// Source file
    pub source: PathBuf,
    /// Observation date of every row in the batch
    pub date: NaiveDate,
    /// Normalized rows in source order followed by the rollup rows
    pub rows: Vec<CanonicalRow>,
    /// Codes that did not resolve in this file
    pub unresolved: Vec<UnresolvedKey>,
    /// Resolved rows dropped in this file
    pub dropped: Vec<DroppedRow>,
}

impl FileBatch {
    /// Build a batch from raw rows already read from `source`
    ///
    /// Rollup synthesis happens here, before the clinic counts go out of
    /// scope with the normalizer output.
    #[must_use]
    pub fn from_source_rows(
        source: &Path,
        date: NaiveDate,
        raw: &[SourceRow],
        reference: &ReferenceData,
        organization: &str,
    ) -> Self {
        let NormalizedFile {
            mut rows,
            clinic_observations,
            unresolved,
            dropped,
        } = normalize_rows(source, date, raw, reference);

        let rollup = synthesize_rollup(organization, date, &clinic_observations);
        rows.extend(rollup);

        Self {
            source: source.to_path_buf(),
            date,
            rows,
            unresolved,
            dropped,
        }
    }
}

/// Read and normalize one source export
///
/// # Errors
/// Fails if the file name does not carry a zero-padded `MM.DD.YYYY` date, or
/// if the file cannot be read or lacks a required column.
pub fn ingest_file(path: &Path, reference: &ReferenceData, organization: &str) -> Result<FileBatch> {
    let date = extract_report_date(path)?;
    let raw: Vec<SourceRow> = read_csv_rows(path, &SOURCE_COLUMNS)?;

    let batch = FileBatch::from_source_rows(path, date, &raw, reference, organization);
    log::info!(
        "Ingested {} ({}): {} raw rows, {} canonical rows",
        path.display(),
        date,
        raw.len(),
        batch.rows.len()
    );
    Ok(batch)
}
