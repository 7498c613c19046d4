use std::fs;
use std::path::{Path, PathBuf};

use quality_report::{ReferenceData, ReportConfig};
use tempfile::TempDir;

/// Identity table shared by the integration tests
pub const NAMES_CSV: &str = "\
MeridiosName,Name,Type,Clinic
\"Smith, Ann\",Ann Smith,Individual,North Clinic
\"Baker, Tom\",Tom Baker,Individual,North Clinic
\"Jones, Kim\",Kim Jones,Individual,South Clinic
North,North Clinic,Clinic,
South,South Clinic,Clinic,
All Clinics,FCN,FCN,
";

/// Metric table shared by the integration tests
pub const METRICS_CSV: &str = "\
MeridiosMetric,Metric,Target,Main
Q1,Quality One,0.75,Main
Q2,Quality Two,,Main
Q3,Quality Three,0.5,
";

/// Temporary workspace with reference tables, a data folder and an output
/// folder
pub struct Fixture {
    pub dir: TempDir,
    pub config: ReportConfig,
}

impl Fixture {
    #[must_use]
    pub fn new() -> Self {
        Self::with_tables(NAMES_CSV, METRICS_CSV)
    }

    #[must_use]
    pub fn with_tables(names: &str, metrics: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let files = dir.path().join("files");
        let data = dir.path().join("data");
        fs::create_dir_all(&files).unwrap();
        fs::create_dir_all(&data).unwrap();

        let names_path = write_file(&files, "names.csv", names);
        let metrics_path = write_file(&files, "metrics.csv", metrics);

        let config = ReportConfig {
            data_dir: data,
            names_path,
            metrics_path,
            output_dir: dir.path().join("docs"),
            workers: Some(2),
            show_progress: false,
            ..ReportConfig::default()
        };
        Self { dir, config }
    }

    /// Add a source export to the data folder
    pub fn add_export(&self, file_name: &str, contents: &str) -> PathBuf {
        write_file(&self.config.data_dir, file_name, contents)
    }

    /// Load both reference tables
    #[must_use]
    pub fn reference(&self) -> ReferenceData {
        ReferenceData::load(&self.config.names_path, &self.config.metrics_path).unwrap()
    }
}

/// Write a file and return its path
pub fn write_file(dir: &Path, file_name: &str, contents: &str) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, contents).unwrap();
    path
}

/// Build a source export body from (identifier, metric code, numerator,
/// denominator) rows
#[must_use]
pub fn export_csv(rows: &[(&str, &str, &str, &str)]) -> String {
    let mut csv = String::from("NAME,Metricname,SeenNum,SeenDenom\n");
    for (name, metric, num, den) in rows {
        csv.push_str(&format!("\"{name}\",{metric},{num},{den}\n"));
    }
    csv
}
