/*!
 * Loading state of the single in-flight translation request.
 *
 * The loading flag is an atomic shared with the guard handed to whoever
 * started the request. Dropping the guard clears the flag, so success,
 * failure and cancellation (dropping the future) all end the loading state.
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::aligner::AlignmentReport;
use crate::errors::TranslationError;

/// Shared "request in flight" flag
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Set the flag, failing with `Busy` when it is already set
    pub fn try_acquire(&self) -> Result<LoadingGuard, TranslationError> {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| TranslationError::Busy)?;
        Ok(LoadingGuard { flag: Arc::clone(&self.0) })
    }
}

/// Clears the loading flag when dropped
#[derive(Debug)]
pub struct LoadingGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// How the last request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed(AlignmentReport),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState {
    Idle,
    InFlight,
    Settled(TaskOutcome),
}

/// Request lifecycle: `Idle -> InFlight -> Settled -> Idle`
#[derive(Debug, Default)]
pub struct TranslationTask {
    flag: LoadingFlag,
    outcome: Option<TaskOutcome>,
}

impl TranslationTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TaskState {
        if self.flag.is_loading() {
            return TaskState::InFlight;
        }
        match &self.outcome {
            Some(outcome) => TaskState::Settled(outcome.clone()),
            None => TaskState::Idle,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.flag.is_loading()
    }

    /// Start a request; the previous outcome is discarded
    pub fn begin(&mut self) -> Result<LoadingGuard, TranslationError> {
        let guard = self.flag.try_acquire()?;
        self.outcome = None;
        Ok(guard)
    }

    /// Record the outcome; the guard is consumed so loading ends here at the latest
    pub fn settle(&mut self, guard: LoadingGuard, outcome: TaskOutcome) {
        drop(guard);
        self.outcome = Some(outcome);
    }

    /// Return a settled task to idle
    pub fn acknowledge(&mut self) {
        self.outcome = None;
    }
}
