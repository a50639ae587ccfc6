//! Completion delivery on the host's main thread.
//!
//! Engine-style hosts run a single update thread and require completion
//! callbacks there. Workers enqueue finished jobs; the host drains the queue
//! once per frame with [`MainThreadDispatcher::tick`]. A panic inside a user
//! callback is caught and logged, never propagated into the host loop.

use std::panic::{catch_unwind, AssertUnwindSafe};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{error, warn};

/// A queued completion callback.
pub(crate) type Job = Box<dyn FnOnce() + Send>;

/// Bounded queue of completion jobs drained by the host's update thread.
pub struct MainThreadDispatcher {
    tx: mpsc::Sender<Job>,
    rx: Mutex<mpsc::Receiver<Job>>,
}

impl std::fmt::Debug for MainThreadDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainThreadDispatcher")
            .field("capacity", &self.tx.max_capacity())
            .finish_non_exhaustive()
    }
}

impl Default for MainThreadDispatcher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl MainThreadDispatcher {
    /// Queue depth used by [`MainThreadDispatcher::default`].
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Create a dispatcher holding at most `capacity` undelivered jobs.
    /// Enqueueing beyond capacity makes workers wait, not drop.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    /// Enqueue a completion job, waiting for queue capacity if necessary.
    /// On failure the job is handed back so the caller can still deliver it.
    pub(crate) async fn enqueue(&self, job: Job) -> Result<(), Job> {
        self.tx.send(job).await.map_err(|e| e.0)
    }

    /// Drain and run every queued job. Call once per host update cycle, from
    /// the thread callbacks must run on. Returns the number of jobs run.
    pub fn tick(&self) -> usize {
        let mut ran = 0;
        let mut rx = self.rx.lock();
        while let Ok(job) = rx.try_recv() {
            if catch_unwind(AssertUnwindSafe(job)).is_err() {
                error!("completion callback panicked; panic contained");
            }
            ran += 1;
        }
        drop(rx);
        if ran > 0 {
            tracing::trace!(ran, "dispatched queued completions");
        }
        ran
    }

    /// Whether any jobs are waiting, without running them.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.rx.lock().is_empty()
    }
}

// Dropping the dispatcher with jobs still queued loses them; workers that
// hit a closed channel fall back to direct delivery.
impl Drop for MainThreadDispatcher {
    fn drop(&mut self) {
        if !self.is_idle() {
            warn!("dispatcher dropped with undelivered completions");
        }
    }
}
