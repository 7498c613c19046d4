//! Source export loading
//!
//! Ingests every dated export of the data directory, in sorted file order, and
//! assembles the unified dataset. Ingestion is sequential: the arrival order
//! of the dataset is the file order.

use std::time::Instant;

use log::info;

use crate::config::ReportConfig;
use crate::dataset::{DatasetAssembler, UnifiedDataset, ValidationReport};
use crate::error::Result;
use crate::ingest::ingest_file;
use crate::reference::ReferenceData;
use crate::utils::find_csv_files;
use crate::utils::logging::{finish_stage, stage_progress_bar};

const INGEST_STAGE: &str = "Ingesting exports";

/// Load and assemble every source export of the configured data directory
///
/// # Errors
/// The first file with a malformed date token or an unreadable body aborts
/// the load; row-level problems end up in the [`ValidationReport`].
pub fn load_dataset(
    config: &ReportConfig,
    reference: &ReferenceData,
) -> Result<(UnifiedDataset, ValidationReport)> {
    let start = Instant::now();
    let files = find_csv_files(&config.data_dir)?;
    info!(
        "Loading {} source exports from {}",
        files.len(),
        config.data_dir.display()
    );

    let pb = stage_progress_bar(files.len(), INGEST_STAGE, config.show_progress);

    let mut assembler = DatasetAssembler::new();
    for path in &files {
        let batch = ingest_file(path, reference, &config.organization_name)?;
        assembler.push(batch);
        pb.inc(1);
    }
    finish_stage(&pb, INGEST_STAGE);

    let file_count = assembler.file_count();
    let (dataset, report) = assembler.finish();
    info!(
        "Loaded {} rows from {file_count} files in {:?}",
        dataset.len(),
        start.elapsed()
    );
    Ok((dataset, report))
}
