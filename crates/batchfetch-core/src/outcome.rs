//! Per-task outcomes and the aggregate run summary.

use std::path::PathBuf;

use crate::error::TaskFailure;
use crate::task::Task;

/// Result of processing one task. Produced by exactly one worker, consumed
/// once by the dispatcher.
#[derive(Debug)]
pub struct TaskOutcome {
    pub index: usize,
    pub url: String,
    pub destination: PathBuf,
    /// HTTP status of the completed exchange, if the fetch got that far.
    pub status: Option<u32>,
    pub bytes_written: u64,
    pub failure: Option<TaskFailure>,
}

impl TaskOutcome {
    pub fn completed(task: Task, status: u32, bytes_written: u64) -> Self {
        let (index, url, destination) = task.into_parts();
        Self {
            index,
            url,
            destination,
            status: Some(status),
            bytes_written,
            failure: None,
        }
    }

    pub fn failed(task: Task, status: Option<u32>, failure: TaskFailure) -> Self {
        let (index, url, destination) = task.into_parts();
        Self {
            index,
            url,
            destination,
            status,
            bytes_written: 0,
            failure: Some(failure),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    pub fn failure_reason(&self) -> Option<String> {
        self.failure.as_ref().map(ToString::to_string)
    }
}

/// Aggregate of all outcomes of a run, in receipt order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<TaskOutcome>,
}

impl RunSummary {
    pub fn new(outcomes: Vec<TaskOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &TaskOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    /// Total bytes written by successful tasks.
    pub fn bytes_written(&self) -> u64 {
        self.outcomes.iter().map(|o| o.bytes_written).sum()
    }

    /// Outcome for the task at input position `index`, if one was received.
    pub fn get(&self, index: usize) -> Option<&TaskOutcome> {
        self.outcomes.iter().find(|o| o.index == index)
    }

    /// `"{ok} out of {total} downloaded successfully"`
    pub fn headline(&self) -> String {
        format!(
            "{} out of {} downloaded successfully",
            self.succeeded(),
            self.total()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, FetchErrorKind};

    fn task(i: usize) -> Task {
        Task::new(i, format!("http://h/{}", i), format!("out/{}.html", i))
    }

    #[test]
    fn counts_and_headline() {
        let summary = RunSummary::new(vec![
            TaskOutcome::completed(task(2), 200, 5),
            TaskOutcome::failed(
                task(0),
                None,
                FetchError::new("http://h/0", FetchErrorKind::Timeout, "timed out").into(),
            ),
            TaskOutcome::completed(task(1), 404, 9),
        ]);
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.bytes_written(), 14);
        assert_eq!(summary.headline(), "2 out of 3 downloaded successfully");
        let failed: Vec<_> = summary.failures().map(|o| o.index).collect();
        assert_eq!(failed, vec![0]);
        assert_eq!(summary.get(1).and_then(|o| o.status), Some(404));
    }

    #[test]
    fn empty_summary() {
        let summary = RunSummary::default();
        assert!(summary.all_succeeded());
        assert_eq!(summary.headline(), "0 out of 0 downloaded successfully");
    }
}
