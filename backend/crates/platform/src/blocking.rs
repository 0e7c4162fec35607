//! Bounded CPU Pool
//!
//! Runs CPU-bound work (password hashing) on tokio's blocking threads while
//! capping how many such jobs are in flight at once, so a burst of sign-ups
//! cannot starve the blocking pool or the request tasks awaiting it.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Semaphore;

/// CPU pool errors
#[derive(Debug, Error)]
pub enum CpuPoolError {
    /// The pool's semaphore was closed
    #[error("CPU pool is closed")]
    Closed,

    /// The job panicked or the runtime is shutting down
    #[error("CPU job failed: {0}")]
    Join(String),
}

/// Bounded pool for blocking, CPU-heavy jobs
///
/// Cloning is cheap and clones share the same bound.
#[derive(Debug, Clone)]
pub struct CpuPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl CpuPool {
    /// Create a pool allowing `size` concurrent jobs (at least one)
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    /// Maximum number of concurrent jobs
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of jobs that could start right now
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run `job` on a blocking thread once a slot is free and await its result
    pub async fn run<F, T>(&self, job: F) -> Result<T, CpuPoolError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| CpuPoolError::Closed)?;

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job()
        })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "CPU pool job did not complete");
            CpuPoolError::Join(e.to_string())
        })
    }
}

impl Default for CpuPool {
    fn default() -> Self {
        let size = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(2);
        Self::new(size)
    }
}
