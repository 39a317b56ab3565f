use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;

use crate::request::WriteAction;
use crate::request::WriteTone;

/// A submission into the suggestion engine.
///
/// User-initiated intents (`Generate`, `Stop`, `Accept`, …) and host
/// observations (`SelectionChanged`) travel through the same queue so the
/// engine sees a single, totally ordered input stream.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Display)]
#[serde(tag = "type", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Intent {
    /// Continue the document with a fresh suggestion in the given tone.
    /// Valid only while idle.
    Generate { tone: WriteTone },
    /// Apply an action to the currently captured selection, replacing it
    /// with streamed text. Valid only while idle with a qualifying capture.
    GenerateOnSelection { action: WriteAction },
    /// Cancel the open stream, keeping any already-inserted text for a
    /// decision.
    Stop,
    /// Keep the suggestion: the generated mark is removed and the text
    /// becomes ordinary document content.
    Accept,
    /// Drop the suggestion: generated text is deleted and a replaced
    /// selection is restored.
    Reject,
    /// Discard the pending suggestion and re-run generation with a different
    /// action at the same anchor.
    Modify { action: WriteAction },
    /// Host observation: the user's selection changed. Offsets are `char`
    /// offsets into the document; a collapsed selection has `start == end`.
    SelectionChanged { start: usize, end: usize },
}

impl Intent {
    /// Whether this submission is a host observation rather than a user
    /// command. Observations are never invalid; they are simply ignored in
    /// modes that do not consume them.
    pub fn is_observation(&self) -> bool {
        matches!(self, Self::SelectionChanged { .. })
    }
}
