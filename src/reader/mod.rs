//! Module for reading CSV inputs into typed rows.
//!
//! Files are decoded with Arrow's CSV reader using an explicit schema derived
//! from the header row, projected to the columns the caller asks for, and then
//! deserialized with `serde_arrow`.

use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;

use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::record_batch::RecordBatch;
use serde::de::DeserializeOwned;

use crate::error::{ReportError, Result};
use crate::schema::{ColumnSpec, decoding_schema};
use crate::utils::logging::{Stage, log_stage_complete, log_stage_start};

/// Default number of CSV rows decoded per record batch
pub const DEFAULT_BATCH_SIZE: usize = 8192;

/// Read the header row of a CSV file
pub fn read_header(file: &mut File) -> Result<Vec<String>> {
    let (schema, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut *file, Some(0))?;
    file.seek(SeekFrom::Start(0))?;
    Ok(schema.fields().iter().map(|f| f.name().clone()).collect())
}

/// Read the wanted columns of a CSV file into record batches
///
/// # Errors
/// Returns [`ReportError::MissingColumn`] if a wanted column is not in the
/// header, or an Arrow error if a cell cannot be decoded.
pub fn read_csv_batches(path: &Path, file: File, wanted: &[ColumnSpec]) -> Result<Vec<RecordBatch>> {
    let mut file = file;
    let header = read_header(&mut file)?;
    let (schema, projection) =
        decoding_schema(&header, wanted).map_err(|column| ReportError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })?;

    let reader = ReaderBuilder::new(schema)
        .with_header(true)
        .with_batch_size(DEFAULT_BATCH_SIZE)
        .with_projection(projection)
        .build(file)?;

    reader
        .map(|batch| batch.map_err(ReportError::from))
        .collect()
}

/// Read a CSV file and deserialize its projected columns into `T`
pub fn read_csv_rows<T: DeserializeOwned>(path: &Path, wanted: &[ColumnSpec]) -> Result<Vec<T>> {
    let start = std::time::Instant::now();
    log_stage_start(Stage::Read, path);

    let file = File::open(path)?;
    let rows = read_rows_from_file(path, file, wanted)?;

    log_stage_complete(Stage::Read, path, rows.len(), Some(start.elapsed()));
    Ok(rows)
}

/// Deserialize the projected columns of an already opened CSV file
pub fn read_rows_from_file<T: DeserializeOwned>(
    path: &Path,
    file: File,
    wanted: &[ColumnSpec],
) -> Result<Vec<T>> {
    let batches = read_csv_batches(path, file, wanted)?;

    let mut rows = Vec::with_capacity(batches.iter().map(RecordBatch::num_rows).sum());
    for batch in &batches {
        rows.extend(serde_arrow::from_record_batch::<Vec<T>>(batch)?);
    }
    Ok(rows)
}
