//! `batchfetch run` – fetch every URL of the input list.

use anyhow::{Context, Result};
use batchfetch_core::config::FetchConfig;
use batchfetch_core::report::RunReport;
use batchfetch_core::{Dispatcher, TracingSink};
use std::sync::Arc;

use crate::cli::{RunArgs, RunStatus};

pub async fn run_fetch(cfg: FetchConfig, args: &RunArgs) -> Result<RunStatus> {
    tracing::debug!("effective config: {:?}", cfg);

    let settings = cfg.dispatch_settings();
    let parallelism = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    println!("input: {}", cfg.input.display());
    println!("output: {}", cfg.output_dir.display());
    println!("workers: {}", settings.workers);
    println!("timeout: {}s", settings.timeout.as_secs());
    println!("available parallelism: {}", parallelism);

    if args.create_output_dir {
        std::fs::create_dir_all(&cfg.output_dir).with_context(|| {
            format!("failed to create output directory {}", cfg.output_dir.display())
        })?;
    }

    let dispatcher = Dispatcher::standard(settings, Arc::new(TracingSink));
    let summary = dispatcher
        .run_from_file_async(cfg.input.clone(), cfg.output_dir.clone())
        .await?;

    println!("{}", summary.headline());
    for failed in summary.failures() {
        eprintln!(
            "  failed: {} ({})",
            failed.url,
            failed.failure_reason().unwrap_or_default()
        );
    }

    if let Some(path) = &args.report {
        RunReport::from(&summary).write_json(path)?;
        println!("report written to {}", path.display());
    }

    Ok(if summary.all_succeeded() {
        RunStatus::Clean
    } else {
        RunStatus::PartialFailure
    })
}
