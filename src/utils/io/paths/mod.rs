//! Path utilities for source exports and generated output
//!
//! Source exports carry their observation date in the file name, because the
//! date fields inside the exports are unreliable. Output folders are named
//! after the entity they describe.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::{ReportError, Result};

/// Format of the date token at the start of a source file name
pub const FILENAME_DATE_FORMAT: &str = "%m.%d.%Y";

/// Length of a zero-padded `MM.DD.YYYY` token
const FILENAME_DATE_LEN: usize = 10;

/// Extract the observation date from a source export path
///
/// The first space-separated token of the file stem must be a zero-padded
/// `MM.DD.YYYY` date, e.g. `01.15.2019 Report.csv`.
///
/// # Errors
/// Returns [`ReportError::MalformedFilenameDate`] when the token is missing,
/// not zero padded, or not a valid calendar date.
pub fn extract_report_date(path: &Path) -> Result<NaiveDate> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    let token = stem.split(' ').next().unwrap_or_default();

    let malformed = || ReportError::MalformedFilenameDate {
        path: path.to_path_buf(),
        token: token.to_string(),
    };

    // chrono accepts unpadded fields, so the shape is checked first
    let well_formed = token.len() == FILENAME_DATE_LEN
        && token.char_indices().all(|(i, c)| match i {
            2 | 5 => c == '.',
            _ => c.is_ascii_digit(),
        });
    if !well_formed {
        return Err(malformed());
    }

    NaiveDate::parse_from_str(token, FILENAME_DATE_FORMAT).map_err(|_| malformed())
}

/// Folder name for an entity: spaces become underscores
#[must_use]
pub fn entity_folder_name(name: &str) -> String {
    name.replace(' ', "_")
}

/// Output folder for an entity below the output root
#[must_use]
pub fn entity_output_dir(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join(entity_folder_name(name))
}
