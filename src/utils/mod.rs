//! Utility functions for file discovery, output paths and logging

pub mod io;
pub mod logging;

pub use io::{find_csv_files, validate_directory};
pub use io::paths::{entity_folder_name, extract_report_date};
