//! Error taxonomy for a fetch run.
//!
//! Only [`RunError`] ever leaves the dispatcher. Fetch and persist failures are
//! folded into the per-task [`TaskOutcome`](crate::outcome::TaskOutcome) and
//! never abort the run.

use std::io;
use std::path::PathBuf;

/// Fatal errors: the run cannot start (or its driver died).
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The URL list could not be read at all (missing file, permissions, not UTF-8).
    #[error("unable to retrieve list of urls from {}: {source}", path.display())]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The blocking pipeline task panicked or was cancelled.
    #[error("fetch pipeline task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Coarse classification of a fetch failure, for logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The per-request timeout expired.
    Timeout,
    /// DNS, connect, send or receive failure.
    Connection,
    Other,
}

/// One URL could not be fetched. Never retried.
#[derive(Debug, Clone, thiserror::Error)]
#[error("failed to retrieve {url}: {reason}")]
pub struct FetchError {
    pub url: String,
    pub kind: FetchErrorKind,
    pub reason: String,
}

impl FetchError {
    pub fn new(url: impl Into<String>, kind: FetchErrorKind, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind,
            reason: reason.into(),
        }
    }
}

/// Fetched bytes could not be written to their destination.
#[derive(Debug, thiserror::Error)]
#[error("failed to write {}: {source}", path.display())]
pub struct PersistError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Why a single task failed.
#[derive(Debug, thiserror::Error)]
pub enum TaskFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    /// The worker holding the task died before reporting it.
    #[error("worker exited before reporting a result")]
    Lost,
}

impl TaskFailure {
    /// Short stage label used in logs and the JSON report.
    pub fn stage(&self) -> &'static str {
        match self {
            TaskFailure::Fetch(_) => "fetch",
            TaskFailure::Persist(_) => "persist",
            TaskFailure::Lost => "lost",
        }
    }
}
