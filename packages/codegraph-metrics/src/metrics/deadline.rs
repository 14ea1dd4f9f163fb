//! Run an analysis with a deadline
//!
//! The task runs on its own thread and its result is raced against a timer.
//! On timeout the caller gets `DeadlineOutcome::TimedOut` immediately and the
//! task's `CancellationFlag` is raised. Threads cannot be killed, so a task
//! that never checks its flag keeps running in the background until it
//! returns on its own; its result is then dropped. Long-running engines
//! should poll `is_cancelled()` between phases.

use super::envelope::{measure, RunMetrics};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Cooperative cancellation signal handed to a deadline task
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }
}

/// Result of racing a task against a deadline
#[derive(Debug, Clone, PartialEq)]
pub enum DeadlineOutcome<T> {
    Completed(T),
    /// The result was not available in time. This does not mean the task stopped.
    TimedOut,
}

impl<T> DeadlineOutcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, DeadlineOutcome::Completed(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            DeadlineOutcome::Completed(v) => Some(v),
            DeadlineOutcome::TimedOut => None,
        }
    }
}

/// Run `task` on a background thread and wait at most `timeout` for it.
///
/// A panic inside the task is propagated to the caller.
pub fn run_with_deadline<T, F>(timeout: Duration, task: F) -> DeadlineOutcome<T>
where
    T: Send + 'static,
    F: FnOnce(&CancellationFlag) -> T + Send + 'static,
{
    let flag = CancellationFlag::default();
    // Capacity 1: a task finishing after the deadline never blocks on send
    let (tx, rx) = mpsc::sync_channel(1);

    let task_flag = flag.clone();
    let handle = thread::spawn(move || {
        let _ = tx.send(task(&task_flag));
    });

    match rx.recv_timeout(timeout) {
        Ok(value) => DeadlineOutcome::Completed(value),
        Err(RecvTimeoutError::Timeout) => {
            flag.cancel();
            tracing::warn!("Task exceeded deadline of {:?}; abandoning it", timeout);
            DeadlineOutcome::TimedOut
        }
        Err(RecvTimeoutError::Disconnected) => match handle.join() {
            Err(panic) => std::panic::resume_unwind(panic),
            Ok(()) => DeadlineOutcome::TimedOut,
        },
    }
}

/// `measure` an engine call under a deadline
pub fn measure_with_deadline<T, E, F>(timeout: Duration, f: F) -> DeadlineOutcome<RunMetrics<T>>
where
    T: Send + 'static,
    E: fmt::Display,
    F: FnOnce(&CancellationFlag) -> Result<T, E> + Send + 'static,
{
    run_with_deadline(timeout, move |flag| measure(|| f(flag)))
}
