//! Bounded worker pool over a shared, closable task queue.
//!
//! Workers are named OS threads. They all pull from one `mpsc` receiver kept
//! behind a mutex; when every sender is dropped and the queue is drained,
//! `next()` yields `None` and the workers return. Dropping the pool joins any
//! thread still running, so no worker outlives it.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

/// Consumer side of the task queue. Cloned into every worker.
pub struct TaskQueue<T> {
    rx: Arc<Mutex<Receiver<T>>>,
}

impl<T> Clone for TaskQueue<T> {
    fn clone(&self) -> Self {
        Self {
            rx: Arc::clone(&self.rx),
        }
    }
}

impl<T> TaskQueue<T> {
    /// Block until the next item is available. `None` once the queue is
    /// closed (all senders dropped) and empty.
    pub fn next(&self) -> Option<T> {
        let rx = self.rx.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rx.recv().ok()
    }
}

/// Unbounded queue: pushes never block, so the producer cannot stall on a
/// slow pool. Drop the sender to close it.
pub fn task_queue<T>() -> (Sender<T>, TaskQueue<T>) {
    let (tx, rx) = mpsc::channel();
    (
        tx,
        TaskQueue {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Upper bound on workers per pool. Larger requests are clamped.
pub const MAX_POOL_SIZE: usize = 1024;

/// Requested pool size brought into `1..=MAX_POOL_SIZE`.
pub fn clamp_size(size: usize) -> usize {
    size.clamp(1, MAX_POOL_SIZE)
}

/// Fixed-size set of worker threads running the same job.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `size` threads (clamped by [`clamp_size`]), each calling
    /// `job(worker_id)` with ids starting at 1. Threads that fail to spawn are
    /// logged and skipped; check [`WorkerPool::size`] for how many actually started.
    pub fn spawn<F>(size: usize, job: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        let requested = size;
        let size = clamp_size(size);
        if size < requested {
            tracing::warn!(requested, "worker count capped at {}", size);
        }
        let job = Arc::new(job);
        let mut handles = Vec::new();
        for id in 1..=size {
            let job = Arc::clone(&job);
            let spawned = std::thread::Builder::new()
                .name(format!("batchfetch-worker-{}", id))
                .spawn(move || job(id));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => tracing::error!(worker = id, "failed to spawn worker thread: {}", e),
            }
        }
        Self { handles }
    }

    /// Number of workers that were started.
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Wait for every worker to return. Returns how many panicked.
    pub fn join(mut self) -> usize {
        join_all(std::mem::take(&mut self.handles))
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        join_all(std::mem::take(&mut self.handles));
    }
}

fn join_all(handles: Vec<JoinHandle<()>>) -> usize {
    let mut panicked = 0;
    for handle in handles {
        if handle.join().is_err() {
            panicked += 1;
        }
    }
    panicked
}
