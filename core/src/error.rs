//! Error types surfaced by the suggestion engine.
//!
//! Only two conditions are modeled as values: a generation backend failing
//! while its stream is open, and the engine task itself being gone. Invalid
//! intents and unusable selections are not errors; the engine drops those
//! with a debug log and no state change.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Failure reported by the text-generation backend.
///
/// All variants are recoverable: the engine returns to idle, keeps any
/// already-inserted marked text in place, and surfaces the message through
/// an event.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("network failure while streaming: {0}")]
    Network(String),

    #[error("generation service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("generation quota exhausted")]
    QuotaExceeded,

    #[error("stream ended before completion")]
    Interrupted,
}

/// Errors returned by [`crate::SuggestionEngine`] handles.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// The engine task has exited; the handle can no longer submit intents
    /// or observe events.
    #[error("suggestion engine has shut down")]
    Closed,
}
