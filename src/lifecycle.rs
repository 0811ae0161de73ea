use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::SubmissionError;

/// Lifecycle of one remote operation, as the presentation layer sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationState<T> {
    Idle,
    Pending,
    Succeeded(T),
    Failed(SubmissionError),
}

impl<T> Default for OperationState<T> {
    fn default() -> Self {
        OperationState::Idle
    }
}

impl<T> OperationState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, OperationState::Pending)
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            OperationState::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SubmissionError> {
        match self {
            OperationState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Displayable message for the operation's error region.
    pub fn error_message(&self) -> Option<String> {
        self.error().map(ToString::to_string)
    }

    pub fn label(&self) -> &'static str {
        match self {
            OperationState::Idle => "idle",
            OperationState::Pending => "pending",
            OperationState::Succeeded(_) => "succeeded",
            OperationState::Failed(_) => "failed",
        }
    }
}

/// Holds one `OperationState` and enforces its transitions. The lock is only
/// taken for the duration of a transition, never across an await.
#[derive(Debug)]
pub struct Lifecycle<T> {
    state: Mutex<OperationState<T>>,
}

impl<T: Clone> Default for Lifecycle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Lifecycle<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(OperationState::Idle),
        }
    }

    pub fn snapshot(&self) -> OperationState<T> {
        self.lock().clone()
    }

    /// Enter `Pending` if no attempt is in flight. `prepare` runs under the same
    /// lock so a duplicate trigger can never slip in between the check and the
    /// transition. A `prepare` failure settles straight into `Failed`.
    pub fn begin<R>(
        &self,
        prepare: impl FnOnce() -> Result<R, SubmissionError>,
    ) -> Begin<R, T> {
        let mut state = self.lock();
        if state.is_pending() {
            return Begin::AlreadyPending;
        }

        match prepare() {
            Ok(prepared) => {
                *state = OperationState::Pending;
                Begin::Started(prepared)
            }
            Err(err) => {
                *state = OperationState::Failed(err);
                Begin::Rejected(state.clone())
            }
        }
    }

    pub fn settle(&self, outcome: Result<T, SubmissionError>) -> OperationState<T> {
        self.settle_then(outcome, |_| {})
    }

    /// Record the outcome, then run `on_success` before the lock is released.
    /// A new attempt cannot begin until `on_success` has returned.
    pub fn settle_then(
        &self,
        outcome: Result<T, SubmissionError>,
        on_success: impl FnOnce(&T),
    ) -> OperationState<T> {
        let mut state = self.lock();
        *state = match outcome {
            Ok(value) => OperationState::Succeeded(value),
            Err(err) => OperationState::Failed(err),
        };
        if let OperationState::Succeeded(value) = &*state {
            on_success(value);
        }
        state.clone()
    }

    fn lock(&self) -> MutexGuard<'_, OperationState<T>> {
        // Every write replaces the whole state, so a poisoned value is still coherent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Result of trying to start an attempt.
#[derive(Debug)]
pub enum Begin<R, T> {
    Started(R),
    Rejected(OperationState<T>),
    AlreadyPending,
}
