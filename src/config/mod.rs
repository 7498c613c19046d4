//! Configuration for a report run.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;

/// Default name of the synthesized organization-wide rollup entity
pub const DEFAULT_ORGANIZATION_NAME: &str = "FCN";

/// Configuration for a single report run
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Directory holding the dated source CSV exports
    pub data_dir: PathBuf,
    /// Identity table (raw identifier to provider/clinic)
    pub names_path: PathBuf,
    /// Metric table (raw metric code to metric name and target)
    pub metrics_path: PathBuf,
    /// Root folder for generated artifacts
    pub output_dir: PathBuf,
    /// First date shown on trend chart x axes
    pub graphing_start_date: NaiveDate,
    /// Last date shown on trend chart x axes
    pub graphing_end_date: NaiveDate,
    /// Entity name used for the organization rollup rows
    pub organization_name: String,
    /// Worker threads for the chart fan-out; `None` uses all available CPUs
    pub workers: Option<usize>,
    /// Optional Parquet snapshot of the assembled dataset
    pub dataset_parquet: Option<PathBuf>,
    /// Show progress bars during the fan-out
    pub show_progress: bool,
}

impl ReportConfig {
    /// Number of workers the fan-out pool should use
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.filter(|&n| n > 0).unwrap_or_else(num_cpus::get)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            names_path: PathBuf::from("./files/names.csv"),
            metrics_path: PathBuf::from("./files/metrics.csv"),
            output_dir: PathBuf::from("./docs"),
            graphing_start_date: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or_default(),
            graphing_end_date: NaiveDate::from_ymd_opt(2019, 12, 31).unwrap_or_default(),
            organization_name: DEFAULT_ORGANIZATION_NAME.to_string(),
            workers: None,
            dataset_parquet: None,
            show_progress: true,
        }
    }
}

impl fmt::Display for ReportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Report Configuration:")?;
        writeln!(f, "  Data Directory: {}", self.data_dir.display())?;
        writeln!(f, "  Names Table: {}", self.names_path.display())?;
        writeln!(f, "  Metrics Table: {}", self.metrics_path.display())?;
        writeln!(f, "  Output Directory: {}", self.output_dir.display())?;
        writeln!(
            f,
            "  Graphing Window: {} to {}",
            self.graphing_start_date, self.graphing_end_date
        )?;
        writeln!(f, "  Organization: {}", self.organization_name)?;
        writeln!(f, "  Workers: {}", self.worker_count())?;
        if let Some(path) = &self.dataset_parquet {
            writeln!(f, "  Dataset Snapshot: {}", path.display())?;
        }
        Ok(())
    }
}
