//! Stage logging and progress bars

pub mod log;
pub mod progress;

pub use self::log::{Stage, log_stage_complete, log_stage_start};
pub use progress::{finish_stage, stage_progress_bar};
