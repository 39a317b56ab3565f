//! Selection capture for AI-on-selection actions.
//!
//! Capture is only armed while the engine is idle. A qualifying selection is
//! non-collapsed and at least a configured number of grapheme clusters long;
//! anything shorter is not worth a transformation round-trip.

use nib_utils_text::grapheme_len;

use crate::document::DocumentBuffer;

/// Snapshot of a user selection, taken strictly before the replacing
/// deletion is applied.
///
/// `start` doubles as the session anchor hint: generated text for a
/// replacement lands exactly where the selection was removed, and the
/// original text is re-inserted there if the suggestion is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedSelection {
    start: usize,
    text: String,
}

impl CapturedSelection {
    pub fn new(start: usize, text: String) -> Self {
        Self { start, text }
    }

    /// Char offset where the selection began.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The selected text as it read at capture time.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Captured width in chars.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Evaluate an observed `[start, end)` range against the capture rules and
/// snapshot its text.
///
/// Returns `None` for collapsed ranges, ranges whose text falls below
/// `min_graphemes`, or ranges lying wholly outside the document.
pub(crate) fn capture_range<D: DocumentBuffer>(
    document: &D,
    start: usize,
    end: usize,
    min_graphemes: usize,
) -> Option<CapturedSelection> {
    let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
    if lo == hi {
        return None;
    }
    let text = document.text_in_range(lo..hi);
    if text.is_empty() || grapheme_len(&text) < min_graphemes {
        return None;
    }
    Some(CapturedSelection { start: lo, text })
}

/// Capture the document's own current selection, if it qualifies.
pub(crate) fn capture_current<D: DocumentBuffer>(
    document: &D,
    min_graphemes: usize,
) -> Option<CapturedSelection> {
    let selection = document.selection();
    let (lo, hi) = selection.normalized();
    capture_range(document, lo, hi, min_graphemes)
}
