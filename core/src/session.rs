//! Suggestion session bookkeeping.

use std::ops::Range;

use nib_protocol::GenerationMode;
use nib_protocol::WriteAction;
use nib_protocol::WriteTone;

use crate::selection::CapturedSelection;

/// Immutable record of one suggestion round.
///
/// A session is never mutated in place: every lifecycle transition consumes
/// the previous value and produces the next one, so a single owner holds the
/// authoritative position bookkeeping and stale copies cannot desynchronize
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionSession {
    anchor: Option<usize>,
    emitted: usize,
    replaced: Option<CapturedSelection>,
    mode: GenerationMode,
}

impl SuggestionSession {
    /// Session continuing the document in `tone`.
    pub fn continuation(tone: WriteTone) -> Self {
        Self {
            anchor: None,
            emitted: 0,
            replaced: None,
            mode: GenerationMode::Continuation { tone },
        }
    }

    /// Session replacing `captured` with the output of `action`.
    pub fn replacement(action: WriteAction, captured: CapturedSelection) -> Self {
        Self {
            anchor: None,
            emitted: 0,
            replaced: Some(captured),
            mode: GenerationMode::Transform { action },
        }
    }

    /// Document offset where this session's text begins. `None` until the
    /// first non-empty fragment is inserted.
    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    /// Where the anchor will land absent other information: the replaced
    /// selection's deletion point.
    pub fn anchor_hint(&self) -> Option<usize> {
        self.replaced.as_ref().map(CapturedSelection::start)
    }

    /// Chars inserted from the stream so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Whether this session started by deleting a user selection.
    pub fn replaces_selection(&self) -> bool {
        self.replaced.is_some()
    }

    /// The selection this session deleted, kept for restoration on reject.
    pub fn replaced(&self) -> Option<&CapturedSelection> {
        self.replaced.as_ref()
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    /// The document range currently holding this session's text, or `None`
    /// before the first insertion.
    pub fn range(&self) -> Option<Range<usize>> {
        self.anchor.map(|anchor| anchor..anchor + self.emitted)
    }

    pub fn has_output(&self) -> bool {
        self.emitted > 0
    }

    /// The anchor is write-once; later calls keep the original value.
    #[must_use]
    pub fn with_anchor(mut self, anchor: usize) -> Self {
        self.anchor.get_or_insert(anchor);
        self
    }

    /// Advance the emitted count by `chars`.
    #[must_use]
    pub fn advanced(mut self, chars: usize) -> Self {
        self.emitted += chars;
        self
    }

    /// Re-arm the session for a modify round under `action`. The anchor and
    /// any replaced selection survive; the emitted count restarts at zero.
    #[must_use]
    pub fn remodel(self, action: WriteAction) -> Self {
        Self {
            anchor: self.anchor,
            emitted: 0,
            replaced: self.replaced,
            mode: GenerationMode::Transform { action },
        }
    }
}
