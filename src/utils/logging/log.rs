//! Stage logging
//!
//! Every filesystem-facing stage of a report run logs one line when it starts
//! and one when it finishes, naming what it counted.

use std::path::Path;
use std::time::Duration;

/// A filesystem-facing stage of a report run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Listing the dated exports of the data folder
    Discover,
    /// Reading one CSV file, export or reference table
    Read,
    /// Writing the Parquet dataset snapshot
    Snapshot,
    /// Writing the site folders
    Publish,
}

impl Stage {
    const fn start_label(self) -> &'static str {
        match self {
            Self::Discover => "Looking for source exports in",
            Self::Read => "Reading",
            Self::Snapshot => "Writing dataset snapshot to",
            Self::Publish => "Publishing site to",
        }
    }

    const fn done_label(self) -> &'static str {
        match self {
            Self::Discover => "Found",
            Self::Read => "Read",
            Self::Snapshot => "Wrote",
            Self::Publish => "Published",
        }
    }

    const fn unit(self) -> &'static str {
        match self {
            Self::Discover => "source exports in",
            Self::Read => "rows from",
            Self::Snapshot => "dataset rows to",
            Self::Publish => "entity folders to",
        }
    }

    /// Stages that happen once per run are logged at info
    const fn level(self) -> log::Level {
        match self {
            Self::Discover | Self::Read => log::Level::Debug,
            Self::Snapshot | Self::Publish => log::Level::Info,
        }
    }
}

/// Line logged when a stage finishes
#[must_use]
pub fn stage_summary(stage: Stage, path: &Path, count: usize, elapsed: Option<Duration>) -> String {
    let line = format!(
        "{} {count} {} {}",
        stage.done_label(),
        stage.unit(),
        path.display()
    );
    match elapsed {
        Some(elapsed) => format!("{line} in {elapsed:?}"),
        None => line,
    }
}

/// Log the start of a stage
pub fn log_stage_start(stage: Stage, path: &Path) {
    log::log!(stage.level(), "{} {}", stage.start_label(), path.display());
}

/// Log the end of a stage with the number of things it handled
pub fn log_stage_complete(stage: Stage, path: &Path, count: usize, elapsed: Option<Duration>) {
    log::log!(stage.level(), "{}", stage_summary(stage, path, count, elapsed));
}
