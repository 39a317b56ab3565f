use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;

/// Notification from the suggestion engine to its host surface.
///
/// Events carry everything a host needs to drive its affordances (the
/// AI-action menu, the accept/reject bar, error toasts) without querying the
/// engine; each variant documents the lifecycle mode the engine is in after
/// emitting it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Display)]
#[serde(tag = "type", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EngineEvent {
    /// A qualifying selection is available for AI actions. Mode: idle.
    SelectionCaptured { start: usize, end: usize },
    /// The previously captured selection no longer qualifies. Mode: idle.
    SelectionCleared,
    /// A fragment stream was opened. Mode: streaming (fresh sessions) or
    /// modifying (after a modify intent).
    StreamStarted,
    /// A fragment was inserted at `offset` with the generated mark.
    FragmentApplied { offset: usize, text: String },
    /// The stream finished on its own. Mode: pending-decision.
    StreamCompleted { emitted: usize },
    /// The stream was stopped by the user. Mode: pending-decision when any
    /// text was emitted, otherwise idle.
    StreamStopped { emitted: usize },
    /// The suggestion was kept; `[start, start + len)` is now plain text.
    /// Mode: idle.
    SessionAccepted { start: usize, len: usize },
    /// The suggestion was dropped; `restored` reports whether a replaced
    /// selection was re-inserted. Mode: idle.
    SessionRejected { restored: bool },
    /// Generation failed; partially inserted text keeps its mark for manual
    /// cleanup. Mode: idle.
    GenerationFailed { message: String },
}
