//! Utility functions for error handling
//!
//! Helpers that turn filesystem preconditions into rich [`ReportError`]s.

use std::fs;
use std::path::Path;

use crate::error::{ReportError, Result};

/// Open a reference table, mapping a missing file to a named error
///
/// # Arguments
/// * `path` - The path to the reference table
///
/// # Returns
/// * `Result<fs::File>` - The opened file or a detailed error
pub fn open_reference_table(path: &Path) -> Result<fs::File> {
    if !path.is_file() {
        return Err(ReportError::MissingReferenceTable(path.to_path_buf()));
    }
    Ok(fs::File::open(path)?)
}

/// Check that a directory exists and is readable
pub fn validate_directory(path: &Path, purpose: &str) -> Result<()> {
    if !path.is_dir() {
        return Err(ReportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Directory not found for {purpose}: {}", path.display()),
        )));
    }

    fs::read_dir(path).map(|_| ()).map_err(|e| {
        ReportError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to access directory for {purpose}: {}: {e}", path.display()),
        ))
    })
}

/// Create a directory (and parents) for output, with context on failure
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| {
        ReportError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to create output directory {}: {e}", path.display()),
        ))
    })
}
