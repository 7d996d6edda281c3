//! Worker: claim a task, fetch, persist, report, repeat.

use std::fmt;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use crate::events::EventSink;
use crate::fetch::Fetcher;
use crate::outcome::TaskOutcome;
use crate::persist::Persister;
use crate::pool::TaskQueue;
use crate::task::Task;

/// Where a worker is in its per-task cycle. Emitted as trace events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Fetching,
    Persisting,
    Reporting,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkerState::Idle => "idle",
            WorkerState::Fetching => "fetching",
            WorkerState::Persisting => "persisting",
            WorkerState::Reporting => "reporting",
        };
        f.write_str(s)
    }
}

/// Everything one worker needs; cheap to clone (all shared handles).
#[derive(Clone)]
pub struct Worker {
    id: usize,
    timeout: Duration,
    fetcher: Arc<dyn Fetcher>,
    persister: Arc<dyn Persister>,
    sink: Arc<dyn EventSink>,
}

impl Worker {
    pub fn new(
        id: usize,
        timeout: Duration,
        fetcher: Arc<dyn Fetcher>,
        persister: Arc<dyn Persister>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            id,
            timeout,
            fetcher,
            persister,
            sink,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Same collaborators, different worker id.
    pub fn with_id(mut self, id: usize) -> Self {
        self.id = id;
        self
    }

    /// Run until the queue is closed and drained. Sends exactly one outcome per
    /// claimed task, tagged with the sequence number the task was queued under.
    /// Stops early only if the dispatcher stopped listening.
    pub fn run(&self, queue: &TaskQueue<(usize, Task)>, results: &Sender<(usize, TaskOutcome)>) {
        self.enter(WorkerState::Idle, None);
        while let Some((seq, task)) = queue.next() {
            let url = task.url().to_string();
            let outcome = self.process(task);
            self.enter(WorkerState::Reporting, Some(&url));
            if results.send((seq, outcome)).is_err() {
                self.sink
                    .error(&format!("worker {} could not report {}: dispatcher gone", self.id, url));
                return;
            }
            self.sink
                .trace(&format!("worker {} finished processing {}", self.id, url));
            self.enter(WorkerState::Idle, None);
        }
        self.sink.trace(&format!("worker {} exiting: queue closed", self.id));
    }

    /// Fetch then persist a single task. Never touches the filesystem when the
    /// fetch fails. Emits exactly one info or warning event for the outcome.
    pub fn process(&self, task: Task) -> TaskOutcome {
        self.enter(WorkerState::Fetching, Some(task.url()));
        let fetched = match self.fetcher.fetch(task.url(), self.timeout) {
            Ok(f) => f,
            Err(e) => {
                self.sink.warning(&format!("failed to retrieve {} content: {}", task.url(), e.reason));
                return TaskOutcome::failed(task, None, e.into());
            }
        };

        if !fetched.is_success_status() {
            self.sink.trace(&format!(
                "{} answered HTTP {}; saving body anyway",
                task.url(),
                fetched.status
            ));
        }

        self.enter(WorkerState::Persisting, Some(task.url()));
        match self.persister.persist(&fetched.body, task.destination()) {
            Ok(written) => {
                self.sink.info(&format!(
                    "saved {:7} bytes from {} to {}",
                    written,
                    task.url(),
                    task.destination().display()
                ));
                TaskOutcome::completed(task, fetched.status, written)
            }
            Err(e) => {
                self.sink.warning(&format!(
                    "failed to write {} content to a file: {}",
                    task.url(),
                    e
                ));
                TaskOutcome::failed(task, Some(fetched.status), e.into())
            }
        }
    }

    fn enter(&self, state: WorkerState, url: Option<&str>) {
        match url {
            Some(url) => self.sink.trace(&format!("worker {} {} {}", self.id, state, url)),
            None => self.sink.trace(&format!("worker {} {}", self.id, state)),
        }
    }
}
