//! Scoped worker pool used by the persistent-pool search variants.
//!
//! Workers are spawned inside a [`std::thread::scope`], so submitted tasks
//! may borrow the per-search state instead of requiring `'static` captures.
//! The queue is FIFO, guarded by a mutex and woken through a condition
//! variable; shutdown flags a stop bit, broadcasts, and joins every worker.

use std::collections::VecDeque;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread::{Scope, ScopedJoinHandle};

use parking_lot::{Condvar, Mutex};
use thiserror::Error;

/// Stable codes describing [`PoolError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum PoolErrorCode {
    /// A task was submitted after shutdown began.
    Stopped,
}

impl PoolErrorCode {
    /// Return the stable machine-readable representation of this error code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "POOL_STOPPED",
        }
    }
}

impl fmt::Display for PoolErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when submitting work to a [`WorkerPool`].
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum PoolError {
    /// The pool has begun shutting down; the task was rejected.
    #[error("task submitted after worker pool shutdown")]
    Stopped,
}

impl PoolError {
    /// Retrieve the stable [`PoolErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> PoolErrorCode {
        match self {
            Self::Stopped => PoolErrorCode::Stopped,
        }
    }
}

type Job<'scope> = Box<dyn FnOnce() + Send + 'scope>;

#[derive(Debug, Default)]
struct CompletionState {
    done: Mutex<bool>,
    signal: Condvar,
}

impl CompletionState {
    fn complete(&self) {
        let mut done = self.done.lock();
        *done = true;
        self.signal.notify_all();
    }
}

/// Handle to a submitted task; becomes ready when the task finishes.
#[derive(Debug)]
pub(crate) struct TaskHandle {
    state: Arc<CompletionState>,
}

impl TaskHandle {
    /// Blocks until the task has run to completion.
    pub(crate) fn wait(self) {
        let mut done = self.state.done.lock();
        while !*done {
            self.state.signal.wait(&mut done);
        }
    }
}

struct QueueState<'scope> {
    jobs: VecDeque<(Job<'scope>, Arc<CompletionState>)>,
    stopped: bool,
}

struct PoolShared<'scope> {
    queue: Mutex<QueueState<'scope>>,
    available: Condvar,
}

/// Fixed-size pool multiplexing short tasks onto persistent worker threads.
pub(crate) struct WorkerPool<'scope> {
    shared: Arc<PoolShared<'scope>>,
    workers: Vec<ScopedJoinHandle<'scope, ()>>,
}

impl<'scope> WorkerPool<'scope> {
    /// Spawns `threads` workers on `scope`.
    pub(crate) fn new<'env>(scope: &'scope Scope<'scope, 'env>, threads: NonZeroUsize) -> Self {
        let shared = Arc::new(PoolShared {
            queue: Mutex::new(QueueState {
                jobs: VecDeque::new(),
                stopped: false,
            }),
            available: Condvar::new(),
        });
        let workers = (0..threads.get())
            .map(|_| {
                let shared = Arc::clone(&shared);
                scope.spawn(move || worker_loop(&shared))
            })
            .collect();
        Self { shared, workers }
    }

    /// Enqueues `job` and wakes one idle worker.
    ///
    /// # Errors
    /// Returns [`PoolError::Stopped`] once shutdown has begun.
    pub(crate) fn submit(&self, job: Job<'scope>) -> Result<TaskHandle, PoolError> {
        let state = Arc::new(CompletionState::default());
        {
            let mut queue = self.shared.queue.lock();
            if queue.stopped {
                return Err(PoolError::Stopped);
            }
            queue.jobs.push_back((job, Arc::clone(&state)));
        }
        self.shared.available.notify_one();
        Ok(TaskHandle { state })
    }

    /// Flags the stop bit, broadcasts, and joins every worker.
    ///
    /// Pending tasks already in the queue are drained before the workers
    /// exit. Idempotent; also invoked by `Drop`.
    pub(crate) fn shutdown(&mut self) {
        {
            let mut queue = self.shared.queue.lock();
            queue.stopped = true;
        }
        self.shared.available.notify_all();
        for worker in self.workers.drain(..) {
            worker.join().expect("pool worker panicked");
        }
    }
}

impl Drop for WorkerPool<'_> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(shared: &PoolShared<'_>) {
    loop {
        let task = {
            let mut queue = shared.queue.lock();
            loop {
                if let Some(task) = queue.jobs.pop_front() {
                    break Some(task);
                }
                if queue.stopped {
                    break None;
                }
                shared.available.wait(&mut queue);
            }
        };
        let Some((job, state)) = task else { return };
        job();
        state.complete();
    }
}
