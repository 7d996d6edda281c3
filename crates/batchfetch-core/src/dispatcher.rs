//! Dispatcher: build tasks, start the pool, feed the queue, drain results.
//!
//! Exactly one outcome is collected per submitted task. If a worker dies while
//! holding a task, that task is recorded as [`TaskFailure::Lost`] once the
//! result channel closes, so the count always matches.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{RunError, TaskFailure};
use crate::events::EventSink;
use crate::fetch::{CurlFetcher, Fetcher};
use crate::outcome::{RunSummary, TaskOutcome};
use crate::persist::{FsPersister, Persister};
use crate::pool::{task_queue, WorkerPool};
use crate::task::{build_tasks, read_url_list, Task};
use crate::worker::Worker;

/// Default number of workers.
pub const DEFAULT_WORKERS: usize = 4;
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Pool size and per-request timeout for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSettings {
    pub workers: usize,
    pub timeout: Duration,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Coordinates one fetch run. Cheap to clone.
#[derive(Clone)]
pub struct Dispatcher {
    settings: DispatchSettings,
    fetcher: Arc<dyn Fetcher>,
    persister: Arc<dyn Persister>,
    sink: Arc<dyn EventSink>,
}

impl Dispatcher {
    pub fn new(
        settings: DispatchSettings,
        fetcher: Arc<dyn Fetcher>,
        persister: Arc<dyn Persister>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            settings,
            fetcher,
            persister,
            sink,
        }
    }

    /// libcurl fetcher and plain filesystem persister.
    pub fn standard(settings: DispatchSettings, sink: Arc<dyn EventSink>) -> Self {
        Self::new(settings, Arc::new(CurlFetcher::new()), Arc::new(FsPersister), sink)
    }

    pub fn settings(&self) -> DispatchSettings {
        self.settings
    }

    /// Read the URL list at `input` and run it. An unreadable input aborts
    /// before any worker starts.
    pub fn run_from_file(&self, input: &Path, output_dir: &Path) -> Result<RunSummary, RunError> {
        let urls = match read_url_list(input) {
            Ok(urls) => urls,
            Err(e) => {
                self.sink.error(&e.to_string());
                return Err(e);
            }
        };
        self.sink
            .info(&format!("read {} url(s) from {}", urls.len(), input.display()));
        Ok(self.run_urls(urls, output_dir))
    }

    pub fn run_urls<I, S>(&self, urls: I, output_dir: &Path) -> RunSummary
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run(build_tasks(urls, output_dir))
    }

    /// Process `tasks` on the pool and block until every outcome is in.
    ///
    /// Tasks are tracked by their position in `tasks`, not by `Task::index`,
    /// so caller-built tasks with clashing indices still yield one outcome each.
    pub fn run(&self, tasks: Vec<Task>) -> RunSummary {
        let total = tasks.len();
        let (task_tx, queue) = task_queue::<(usize, Task)>();
        let (result_tx, result_rx) = mpsc::channel::<(usize, TaskOutcome)>();

        let template = Worker::new(
            0,
            self.settings.timeout,
            Arc::clone(&self.fetcher),
            Arc::clone(&self.persister),
            Arc::clone(&self.sink),
        );
        let pool = WorkerPool::spawn(self.settings.workers, move |id| {
            template.clone().with_id(id).run(&queue, &result_tx);
        });
        self.sink.info(&format!("started {} workers", pool.size()));

        let mut pending: Vec<Option<Task>> = Vec::with_capacity(total);
        for (seq, task) in tasks.into_iter().enumerate() {
            pending.push(Some(task.clone()));
            if let Err(mpsc::SendError((_, task))) = task_tx.send((seq, task)) {
                self.sink
                    .error(&format!("no worker left to take {}", task.url()));
            }
        }
        drop(task_tx);

        let mut outcomes = Vec::with_capacity(total);
        while outcomes.len() < total {
            let Ok((seq, outcome)) = result_rx.recv() else {
                break;
            };
            match pending.get_mut(seq).and_then(Option::take) {
                Some(_) => outcomes.push(outcome),
                None => self.sink.error(&format!(
                    "duplicate result for queued task {} ({})",
                    seq, outcome.url
                )),
            }
        }

        let panicked = pool.join();
        if panicked > 0 {
            self.sink.error(&format!("{} worker(s) panicked", panicked));
        }
        for task in pending.into_iter().flatten() {
            self.sink.error(&format!(
                "no result for {}: worker exited before reporting",
                task.url()
            ));
            outcomes.push(TaskOutcome::failed(task, None, TaskFailure::Lost));
        }

        let summary = RunSummary::new(outcomes);
        self.sink.info(&summary.headline());
        summary
    }

    /// [`Dispatcher::run_from_file`] on tokio's blocking pool.
    pub async fn run_from_file_async(
        &self,
        input: PathBuf,
        output_dir: PathBuf,
    ) -> Result<RunSummary, RunError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.run_from_file(&input, &output_dir)).await?
    }

    /// [`Dispatcher::run`] on tokio's blocking pool.
    pub async fn run_async(&self, tasks: Vec<Task>) -> Result<RunSummary, RunError> {
        let this = self.clone();
        Ok(tokio::task::spawn_blocking(move || this.run(tasks)).await?)
    }
}
