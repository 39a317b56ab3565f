//! Position-tracked insertion over the live document.
//!
//! These transitions are the only code that maps session bookkeeping to
//! document edits. They take the current [`SuggestionSession`] by value and
//! return the next one, keeping the caller the sole owner of session state.

use std::ops::Range;

use nib_protocol::WriteAction;

use crate::document::DocumentBuffer;
use crate::session::SuggestionSession;

/// Result of applying one stream fragment.
#[derive(Debug, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The fragment landed at `offset` and the session advanced.
    Applied {
        session: SuggestionSession,
        offset: usize,
        text: String,
    },
    /// The fragment was empty; neither the document nor the session changed.
    SkippedEmpty { session: SuggestionSession },
}

/// Insert `fragment` at the session's advancing offset.
///
/// The first non-empty fragment fixes the anchor: at the replaced
/// selection's deletion point when one exists, otherwise at the current
/// selection start. Every later fragment targets `anchor + emitted`, never a
/// re-queried cursor, so fragments land contiguously even while the user
/// moves the caret elsewhere.
pub fn append_fragment<D: DocumentBuffer>(
    document: &mut D,
    session: SuggestionSession,
    fragment: &str,
) -> AppendOutcome {
    if fragment.is_empty() {
        return AppendOutcome::SkippedEmpty { session };
    }
    let anchor = session
        .anchor()
        .or_else(|| session.anchor_hint())
        .unwrap_or_else(|| document.selection().normalized().0);
    let session = session.with_anchor(anchor);
    let offset = anchor + session.emitted();
    document.insert_marked(offset, fragment);
    let chars = fragment.chars().count();
    AppendOutcome::Applied {
        session: session.advanced(chars),
        offset,
        text: fragment.to_string(),
    }
}

/// Remove the generated attribute over the session's range, leaving the text
/// in place as ordinary content.
///
/// Returns the unmarked range. A session that never inserted anything leaves
/// the document untouched and returns `None`.
pub fn accept_session<D: DocumentBuffer>(
    document: &mut D,
    session: SuggestionSession,
) -> Option<Range<usize>> {
    let range = session.range()?;
    document.unmark_range(range.clone());
    Some(range)
}

/// Delete the session's text and restore a replaced selection.
///
/// Returns true when original text was re-inserted. A replacement session
/// that never inserted anything still restores: its deletion happened at
/// session start and would otherwise be unrecoverable.
pub fn reject_session<D: DocumentBuffer>(
    document: &mut D,
    session: SuggestionSession,
) -> bool {
    if let Some(range) = session.range() {
        document.delete_range(range);
    }
    match session.replaced() {
        Some(captured) => {
            document.insert_plain(captured.start(), captured.text());
            true
        }
        None => false,
    }
}

/// Clear the pending text and re-arm the session for `action`.
///
/// Returns the re-armed session plus the text that was just removed, which
/// becomes the source for the replacement stream. The anchor survives, so
/// the new stream inserts exactly where the old suggestion was.
pub fn begin_modify<D: DocumentBuffer>(
    document: &mut D,
    session: SuggestionSession,
    action: WriteAction,
) -> (SuggestionSession, String) {
    let prior = match session.range() {
        Some(range) => {
            let text = document.text_in_range(range.clone());
            document.delete_range(range);
            text
        }
        None => String::new(),
    };
    (session.remodel(action), prior)
}
