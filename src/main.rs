use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use log::{info, warn};
use quality_report::ReportConfig;
use quality_report::config::DEFAULT_ORGANIZATION_NAME;

/// Build the quality-metric report site from dated exports
#[derive(Parser, Debug)]
#[command(name = "quality-report", version, about)]
struct Args {
    /// Directory holding the dated source CSV exports
    #[arg(long, env = "REPORT_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Identity table CSV
    #[arg(long, env = "REPORT_NAMES", default_value = "./files/names.csv")]
    names: PathBuf,

    /// Metric table CSV
    #[arg(long, env = "REPORT_METRICS", default_value = "./files/metrics.csv")]
    metrics: PathBuf,

    /// Output folder of the generated site
    #[arg(long, short, env = "REPORT_OUTPUT_DIR", default_value = "./docs")]
    output_dir: PathBuf,

    /// First date on trend chart x axes (YYYY-MM-DD)
    #[arg(long, default_value = "2018-01-01")]
    start_date: NaiveDate,

    /// Last date on trend chart x axes (YYYY-MM-DD)
    #[arg(long, default_value = "2019-12-31")]
    end_date: NaiveDate,

    /// Name of the organization rollup entity
    #[arg(long, default_value = DEFAULT_ORGANIZATION_NAME)]
    organization: String,

    /// Worker threads for page generation (defaults to available CPUs)
    #[arg(long, short, env = "REPORT_WORKERS")]
    workers: Option<usize>,

    /// Also write the assembled dataset to this Parquet file
    #[arg(long, value_name = "FILE")]
    dataset_parquet: Option<PathBuf>,

    /// Hide progress bars
    #[arg(long)]
    quiet: bool,
}

impl From<Args> for ReportConfig {
    fn from(args: Args) -> Self {
        Self {
            data_dir: args.data_dir,
            names_path: args.names,
            metrics_path: args.metrics,
            output_dir: args.output_dir,
            graphing_start_date: args.start_date,
            graphing_end_date: args.end_date,
            organization_name: args.organization,
            workers: args.workers,
            dataset_parquet: args.dataset_parquet,
            show_progress: !args.quiet,
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ReportConfig::from(Args::parse());
    let output_dir = config.output_dir.clone();

    let summary = quality_report::run(&config)
        .with_context(|| format!("Failed to build report into {}", output_dir.display()))?;

    if !summary.validation.is_clean() {
        warn!("Run finished with validation findings, see log above");
    }
    info!(
        "Published {} provider and {} clinic pages for {} ({} rows)",
        summary.published.providers,
        summary.published.clinics,
        summary.current_date,
        summary.rows
    );
    Ok(())
}
