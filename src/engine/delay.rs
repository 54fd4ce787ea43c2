// ==========================================
// Chem Procure - Delayed Task Runner
// ==========================================
// The negotiation agent answers in two phases: the immediate write,
// then a paced follow-up reply. The pacing has no correctness role, so
// the runner is a trait seam: tokio timers in production, inline
// execution in tests.
//
// Every scheduled task carries a cancellation flag checked after the
// pause, so a follow-up whose negotiation moved on can be dropped
// instead of writing stale state.
// ==========================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Cancellation handle for a scheduled follow-up.
#[derive(Clone)]
pub struct DelayHandle {
    cancelled: Arc<AtomicBool>,
}

impl DelayHandle {
    /// Fresh, un-cancelled handle. Custom DelayRunner implementations
    /// create one per scheduled task.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Prevent the task from running if it has not fired yet.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Default for DelayHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Scheduler seam for the paced agent replies.
pub trait DelayRunner: Send + Sync {
    /// Run `task` after `delay` unless the returned handle is cancelled
    /// first.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send + 'static>) -> DelayHandle;
}

// ==========================================
// TokioDelayRunner - production scheduler
// ==========================================
// Must be used from within a tokio runtime.
pub struct TokioDelayRunner;

impl DelayRunner for TokioDelayRunner {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send + 'static>) -> DelayHandle {
        let handle = DelayHandle::new();
        let flag = handle.cancelled.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !flag.load(Ordering::SeqCst) {
                task();
            }
        });
        handle
    }
}

// ==========================================
// InlineDelayRunner - synchronous scheduler
// ==========================================
// Runs the task immediately on the calling thread. Used by tests and
// by callers that want the two-phase protocol collapsed into one.
pub struct InlineDelayRunner;

impl DelayRunner for InlineDelayRunner {
    fn schedule(&self, _delay: Duration, task: Box<dyn FnOnce() + Send + 'static>) -> DelayHandle {
        let handle = DelayHandle::new();
        task();
        handle
    }
}
