//! Progress bars for the ingestion loop and the page fan-outs

use indicatif::{ProgressBar, ProgressStyle};

/// Bar layout shared by every stage
pub const STAGE_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({per_sec}) {msg}";

/// Bar over `len` items of one stage, hidden on quiet runs
#[must_use]
pub fn stage_progress_bar(len: usize, stage: &str, visible: bool) -> ProgressBar {
    let len = len as u64;
    if !visible {
        let pb = ProgressBar::hidden();
        pb.set_length(len);
        return pb;
    }

    let style = ProgressStyle::default_bar()
        .template(STAGE_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    let pb = ProgressBar::new(len).with_style(style);
    pb.set_message(stage.to_string());
    pb
}

/// Finish a stage bar with `"<stage> complete"`
pub fn finish_stage(pb: &ProgressBar, stage: &str) {
    pb.finish_with_message(format!("{stage} complete"));
}
