//! Columnar snapshot of the unified dataset.
//!
//! The snapshot is a Parquet file with one row per canonical row, useful for
//! inspecting a run outside the generated site.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::record_batch::RecordBatch;
use arrow_schema::{DataType, Field, FieldRef};
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

use crate::dataset::UnifiedDataset;
use crate::dataset::row::CanonicalRow;
use crate::error::Result;
use crate::utils::logging::{Stage, log_stage_complete, log_stage_start};

#[derive(Debug, Serialize)]
struct SnapshotRow<'a> {
    name: &'a str,
    entity_type: &'static str,
    clinic: Option<&'a str>,
    metric: &'a str,
    percentage: Option<f64>,
    date: NaiveDate,
}

impl<'a> From<&'a CanonicalRow> for SnapshotRow<'a> {
    fn from(row: &'a CanonicalRow) -> Self {
        Self {
            name: &row.name,
            entity_type: row.entity_type.as_str(),
            clinic: row.clinic.as_deref(),
            metric: &row.metric,
            percentage: row.percentage,
            date: row.date,
        }
    }
}

/// Arrow fields of the snapshot
#[must_use]
pub fn snapshot_fields() -> Vec<FieldRef> {
    vec![
        Arc::new(Field::new("name", DataType::Utf8, false)),
        Arc::new(Field::new("entity_type", DataType::Utf8, false)),
        Arc::new(Field::new("clinic", DataType::Utf8, true)),
        Arc::new(Field::new("metric", DataType::Utf8, false)),
        Arc::new(Field::new("percentage", DataType::Float64, true)),
        Arc::new(Field::new("date", DataType::Date32, false)),
    ]
}

/// Convert the dataset into a single record batch
pub fn to_record_batch(dataset: &UnifiedDataset) -> Result<RecordBatch> {
    let rows: Vec<SnapshotRow<'_>> = dataset.rows().iter().map(SnapshotRow::from).collect();
    Ok(serde_arrow::to_record_batch(&snapshot_fields(), &rows)?)
}

/// Write the dataset to a Parquet file
pub fn write_parquet(dataset: &UnifiedDataset, path: &Path) -> Result<()> {
    let start = std::time::Instant::now();
    log_stage_start(Stage::Snapshot, path);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let batch = to_record_batch(dataset)?;
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;

    log_stage_complete(Stage::Snapshot, path, batch.num_rows(), Some(start.elapsed()));
    Ok(())
}
