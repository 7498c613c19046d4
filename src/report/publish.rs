//! Site publishing
//!
//! Provider and clinic pages are generated by two fan-outs over a bounded
//! rayon pool. Every task only reads the shared [`ReportContext`] and writes
//! into its own entity folder, so tasks need no synchronization. The first
//! failing task fails its fan-out and the run.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::info;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::ReportConfig;
use crate::error::Result;
use crate::error::util::ensure_output_dir;
use crate::reference::EntityType;
use crate::report::charts::entity_chart;
use crate::report::metadata::{EntityMetadata, SiteIndex};
use crate::report::{ReportContext, metric_variable};
use crate::utils::io::paths::entity_output_dir;
use crate::utils::logging::{
    Stage, finish_stage, log_stage_complete, log_stage_start, stage_progress_bar,
};

/// Chart file written into every entity folder
pub const CHART_DATA_FILE: &str = "chart_data.js";
/// Metadata file written into every entity folder
pub const ENTITY_METADATA_FILE: &str = "entity.json";
/// Site-wide index written into the output root
pub const SITE_INDEX_FILE: &str = "index.json";

/// One entity page to generate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTask {
    pub name: String,
    pub entity_type: EntityType,
    pub clinic: Option<String>,
}

impl PageTask {
    fn new(name: &str, entity_type: EntityType, clinic: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            entity_type,
            clinic: clinic.map(str::to_string),
        }
    }
}

/// Outcome of a publishing run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishSummary {
    pub providers: usize,
    pub clinics: usize,
    /// Entity folders written, organization included
    pub folders: Vec<PathBuf>,
}

/// Provider pages, sorted by surname
#[must_use]
pub fn provider_tasks(ctx: &ReportContext) -> Vec<PageTask> {
    ctx.reference
        .identities
        .individuals()
        .into_iter()
        .map(|identity| {
            PageTask::new(
                &identity.name,
                EntityType::Individual,
                identity.clinic.as_deref(),
            )
        })
        .collect()
}

/// Clinic pages for every clinic with data
#[must_use]
pub fn clinic_tasks(ctx: &ReportContext) -> Vec<PageTask> {
    ctx.dataset
        .clinics()
        .iter()
        .map(|clinic| PageTask::new(clinic, EntityType::Clinic, None))
        .collect()
}

/// Contents of `chart_data.js`: one variable per headline metric
pub fn chart_data_script(ctx: &ReportContext, task: &PageTask) -> Result<String> {
    let lines = ctx
        .headline_metrics
        .iter()
        .map(|metric| {
            let chart = entity_chart(ctx, &task.name, task.entity_type, metric)?;
            let json = serde_json::to_string(&chart)?;
            Ok(format!("var {} = {json};\n", metric_variable(metric)))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(lines.concat())
}

/// Write the folder of one entity
pub fn write_entity_page(ctx: &ReportContext, output_dir: &Path, task: &PageTask) -> Result<PathBuf> {
    let folder = entity_output_dir(output_dir, &task.name);
    ensure_output_dir(&folder)?;

    let script = chart_data_script(ctx, task)?;
    fs::write(folder.join(CHART_DATA_FILE), script)?;

    let metadata = EntityMetadata::build(ctx, &task.name, task.entity_type, task.clinic.as_deref())?;
    fs::write(
        folder.join(ENTITY_METADATA_FILE),
        serde_json::to_string_pretty(&metadata)?,
    )?;

    Ok(folder)
}

/// Generate a batch of entity pages on the pool
pub fn fan_out(
    pool: &ThreadPool,
    ctx: &ReportContext,
    config: &ReportConfig,
    tasks: &[PageTask],
    description: &str,
) -> Result<Vec<PathBuf>> {
    let start = Instant::now();
    let pb = stage_progress_bar(tasks.len(), description, config.show_progress);

    let folders = pool.install(|| {
        tasks
            .par_iter()
            .map(|task| {
                let folder = write_entity_page(ctx, &config.output_dir, task)?;
                pb.inc(1);
                Ok(folder)
            })
            .collect::<Result<Vec<_>>>()
    })?;

    finish_stage(&pb, description);
    info!(
        "{description}: {} pages in {:?}",
        folders.len(),
        start.elapsed()
    );
    Ok(folders)
}

/// Write the site index
pub fn write_site_index(ctx: &ReportContext, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(SITE_INDEX_FILE);
    let index = SiteIndex::build(ctx);
    fs::write(&path, serde_json::to_string_pretty(&index)?)?;
    Ok(path)
}

/// Publish every page of the site
pub fn publish(ctx: &ReportContext, config: &ReportConfig) -> Result<PublishSummary> {
    let start = Instant::now();
    log_stage_start(Stage::Publish, &config.output_dir);
    ensure_output_dir(&config.output_dir)?;

    let workers = config.worker_count();
    let pool = ThreadPoolBuilder::new().num_threads(workers).build()?;
    info!("Generating pages with {workers} workers");

    let providers = provider_tasks(ctx);
    let clinics = clinic_tasks(ctx);

    let mut folders = fan_out(&pool, ctx, config, &providers, "Provider pages")?;
    folders.extend(fan_out(&pool, ctx, config, &clinics, "Clinic pages")?);

    let organization = PageTask::new(&ctx.organization, EntityType::Organization, None);
    folders.push(write_entity_page(ctx, &config.output_dir, &organization)?);

    write_site_index(ctx, &config.output_dir)?;

    log_stage_complete(
        Stage::Publish,
        &config.output_dir,
        folders.len(),
        Some(start.elapsed()),
    );
    Ok(PublishSummary {
        providers: providers.len(),
        clinics: clinics.len(),
        folders,
    })
}
