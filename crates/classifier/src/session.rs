use std::fmt;

use thiserror::Error;

/// Where a single interaction currently is.
///
/// `Idle` is the state before the model has been resolved. A failed load
/// moves to `FatalError`, which accepts nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Ready,
    Preprocessing,
    Inferring,
    ResultDisplayed,
    ErrorDisplayed,
    FatalError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    ModelLoaded,
    ModelLoadFailed,
    Upload,
    Preprocessed,
    Inferred,
    Failed,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("event {event:?} is not accepted in state {from}")]
pub struct SessionError {
    pub from: SessionState,
    pub event: SessionEvent,
}

impl SessionState {
    pub fn transition(self, event: SessionEvent) -> Result<SessionState, SessionError> {
        use SessionEvent::*;
        use SessionState::*;

        let next = match (self, event) {
            (Idle, ModelLoaded) => Ready,
            (Idle, ModelLoadFailed) => FatalError,
            (Ready | ResultDisplayed | ErrorDisplayed, Upload) => Preprocessing,
            (Preprocessing, Preprocessed) => Inferring,
            (Inferring, Inferred) => ResultDisplayed,
            (Preprocessing | Inferring, Failed) => ErrorDisplayed,
            (from, event) => return Err(SessionError { from, event }),
        };
        tracing::trace!(from = %self, to = %next, ?event, "session transition");
        Ok(next)
    }

    pub fn accepts_upload(self) -> bool {
        matches!(
            self,
            SessionState::Ready | SessionState::ResultDisplayed | SessionState::ErrorDisplayed
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
