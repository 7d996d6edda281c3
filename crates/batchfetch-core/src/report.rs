//! JSON run report: one record per task, sorted by input position.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::outcome::{RunSummary, TaskOutcome};

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub bytes_written: u64,
    pub tasks: Vec<TaskRecord>,
}

#[derive(Debug, Serialize)]
pub struct TaskRecord {
    pub index: usize,
    pub url: String,
    pub destination: PathBuf,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u32>,
    pub bytes_written: u64,
    /// "fetch", "persist" or "lost".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl From<&TaskOutcome> for TaskRecord {
    fn from(o: &TaskOutcome) -> Self {
        Self {
            index: o.index,
            url: o.url.clone(),
            destination: o.destination.clone(),
            succeeded: o.succeeded(),
            status: o.status,
            bytes_written: o.bytes_written,
            failed_stage: o.failure.as_ref().map(|f| f.stage()),
            failure: o.failure_reason(),
        }
    }
}

impl From<&RunSummary> for RunReport {
    fn from(summary: &RunSummary) -> Self {
        let mut tasks: Vec<TaskRecord> = summary.outcomes.iter().map(TaskRecord::from).collect();
        tasks.sort_by_key(|t| t.index);
        Self {
            total: summary.total(),
            succeeded: summary.succeeded(),
            failed: summary.failed(),
            bytes_written: summary.bytes_written(),
            tasks,
        }
    }
}

impl RunReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)
            .with_context(|| format!("failed to write report {}", path.display()))
    }
}
