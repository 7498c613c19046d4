//! IO utilities for file discovery
//!
//! This module finds the dated source exports and provides path helpers for
//! the output layout.

pub mod paths;

use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::error::Result;
pub use crate::error::util::validate_directory;
use crate::utils::logging::{Stage, log_stage_complete, log_stage_start};

/// Find all CSV files directly inside a directory
///
/// Files are returned sorted by file name so that ingestion order, and with
/// it the arrival order of the dataset, is stable between runs.
///
/// # Errors
/// Returns an error if the directory does not exist or cannot be read
pub fn find_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    log_stage_start(Stage::Discover, dir);
    validate_directory(dir, "source exports")?;

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        {
            files.push(path);
        }
    }

    let files = files
        .into_iter()
        .sorted_by(|a, b| a.file_name().cmp(&b.file_name()))
        .collect_vec();

    if files.is_empty() {
        log::warn!("No source exports found in {}", dir.display());
    } else {
        log_stage_complete(Stage::Discover, dir, files.len(), None);
    }

    Ok(files)
}
