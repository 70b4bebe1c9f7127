//! Process-wide worker pool
//!
//! A thin wrapper around a multi-threaded tokio runtime. The pool holds no
//! per-program state, so one instance is shared by every execution call for
//! the lifetime of the process.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use tokio::runtime::{Builder, Handle, Runtime};

/// Smallest pool that can still run two independent branches side by side
pub const MIN_WORKERS: usize = 2;

const THREAD_NAME_PREFIX: &str = "calcflow-exec";

#[derive(Debug)]
pub struct WorkerPool {
    runtime: Runtime,
    workers: usize,
}

impl WorkerPool {
    /// Pool with `workers` threads, never fewer than [`MIN_WORKERS`].
    pub fn new(workers: usize) -> io::Result<Self> {
        let workers = workers.max(MIN_WORKERS);
        let counter = AtomicUsize::new(0);
        let runtime = Builder::new_multi_thread()
            .worker_threads(workers)
            .thread_name_fn(move || {
                let id = counter.fetch_add(1, Ordering::Relaxed) + 1;
                format!("{}-{}", THREAD_NAME_PREFIX, id)
            })
            .enable_time()
            .build()?;
        Ok(WorkerPool { runtime, workers })
    }

    /// Pool sized to the available hardware parallelism.
    pub fn with_default_parallelism() -> io::Result<Self> {
        Self::new(default_workers())
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn handle(&self) -> &Handle {
        self.runtime.handle()
    }
}

pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(MIN_WORKERS)
        .max(MIN_WORKERS)
}
