//! End-to-end report run.

use std::time::Instant;

use log::info;

use crate::config::ReportConfig;
use crate::dataset::ValidationReport;
use crate::dataset::export::write_parquet;
use crate::error::Result;
use crate::loader::load_dataset;
use crate::reference::ReferenceData;
use crate::report::ReportContext;
use crate::report::publish::{PublishSummary, publish};

/// Outcome of a full run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Rows in the unified dataset
    pub rows: usize,
    /// Reporting date as shown on the site
    pub current_date: String,
    pub validation: ValidationReport,
    pub published: PublishSummary,
}

/// Run the whole pipeline: reference tables, ingestion, assembly, publishing
///
/// # Errors
/// Any fatal condition aborts the run: a missing or invalid reference table,
/// a malformed source file name, an empty dataset or an output write failure.
pub fn run(config: &ReportConfig) -> Result<RunSummary> {
    let start = Instant::now();
    info!("{config}");

    let reference = ReferenceData::load(&config.names_path, &config.metrics_path)?;
    let (dataset, validation) = load_dataset(config, &reference)?;
    validation.log();

    if let Some(path) = &config.dataset_parquet {
        write_parquet(&dataset, path)?;
    }

    let rows = dataset.len();
    let ctx = ReportContext::new(dataset, reference, config)?;
    let published = publish(&ctx, config)?;

    info!("Report run finished in {:?}", start.elapsed());
    Ok(RunSummary {
        rows,
        current_date: ctx.current_date_string(),
        validation,
        published,
    })
}
