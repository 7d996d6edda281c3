//! Injected event sink for per-task and per-run events.
//!
//! The dispatcher and workers never log through a global; they are handed an
//! `Arc<dyn EventSink>`. [`TracingSink`] forwards to `tracing`, and
//! [`RecordingSink`] keeps events in memory (tests, embedding).

use std::sync::Mutex;

/// Severity of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Trace,
    Info,
    Warning,
    Error,
}

/// Receiver for pipeline events. Must be shareable across worker threads.
pub trait EventSink: Send + Sync {
    fn event(&self, level: Level, message: &str);

    fn trace(&self, message: &str) {
        self.event(Level::Trace, message);
    }

    fn info(&self, message: &str) {
        self.event(Level::Info, message);
    }

    fn warning(&self, message: &str) {
        self.event(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.event(Level::Error, message);
    }
}

/// Forwards events to the `tracing` subscriber installed by [`crate::logging`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn event(&self, level: Level, message: &str) {
        match level {
            Level::Trace => tracing::trace!("{}", message),
            Level::Info => tracing::info!("{}", message),
            Level::Warning => tracing::warn!("{}", message),
            Level::Error => tracing::error!("{}", message),
        }
    }
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(Level, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events recorded so far.
    pub fn events(&self) -> Vec<(Level, String)> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of recorded events at exactly `level`.
    pub fn count(&self, level: Level) -> usize {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .filter(|(l, _)| *l == level)
            .count()
    }
}

impl EventSink for RecordingSink {
    fn event(&self, level: Level, message: &str) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((level, message.to_string()));
    }
}
