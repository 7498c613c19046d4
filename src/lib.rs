//! A Rust library that turns dated clinical quality-metric exports into a
//! static report site, with an organization-wide rollup and per-provider,
//! per-clinic Vega-Lite charts.

pub mod config;
pub mod dataset;
pub mod error;
pub mod ingest;
pub mod loader;
pub mod pipeline;
pub mod reader;
pub mod reference;
pub mod report;
pub mod schema;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::ReportConfig;
pub use error::{ReportError, Result};
pub use pipeline::{RunSummary, run};

// Dataset and views
pub use dataset::{CanonicalRow, SeriesPoint, UnifiedDataset, ValidationReport, ViewFilter};
pub use reference::{EntityType, ReferenceData};

// Stages
pub use ingest::{FileBatch, ingest_file};
pub use loader::load_dataset;
pub use report::ReportContext;
pub use report::publish::publish;
