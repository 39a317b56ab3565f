//! Capability surface required from the host rich-text document.
//!
//! The engine never talks to a concrete editor. It drives any buffer that
//! can insert text with a "generated" visual attribute, delete and unmark
//! half-open ranges, and report its text and selection. All offsets are
//! `char` offsets; implementations clamp out-of-range inputs instead of
//! panicking.

use std::ops::Range;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

/// A selection range in `char` offsets. `start == end` is a caret.
///
/// `start` and `end` are stored as reported by the host; use
/// [`SelectionState::normalized`] before arithmetic, since a host may report
/// a backwards (right-to-left) selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub start: usize,
    pub end: usize,
}

impl SelectionState {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A collapsed selection at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Endpoints in ascending order.
    pub fn normalized(&self) -> (usize, usize) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    /// Selection width in chars.
    pub fn len(&self) -> usize {
        let (lo, hi) = self.normalized();
        hi - lo
    }

    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }
}

/// Rich-text buffer operations the engine depends on.
///
/// The contract mirrors what any attribute-capable editor component offers:
///
/// - inserts can carry a "generated" visual attribute or none;
/// - deletes and attribute removal act on half-open `char` ranges;
/// - text and the current selection are readable at any time;
/// - offsets stay stable between edits issued through this trait (the host
///   performs no implicit renumbering of its own).
///
/// Implementations must clamp offsets and ranges that fall outside the
/// current document rather than panic.
pub trait DocumentBuffer {
    /// Insert `text` at `offset` carrying the generated attribute.
    fn insert_marked(&mut self, offset: usize, text: &str);

    /// Insert `text` at `offset` as ordinary, unmarked content.
    fn insert_plain(&mut self, offset: usize, text: &str);

    /// Delete the chars in `range`.
    fn delete_range(&mut self, range: Range<usize>);

    /// Remove the generated attribute over `range`, leaving text untouched.
    fn unmark_range(&mut self, range: Range<usize>);

    /// Plain text currently inside `range`.
    fn text_in_range(&self, range: Range<usize>) -> String;

    /// Document length in chars.
    fn char_len(&self) -> usize;

    /// The current user selection.
    fn selection(&self) -> SelectionState;

    /// Whole-document plain text.
    fn text(&self) -> String {
        self.text_in_range(0..self.char_len())
    }
}

#[derive(Default)]
struct DocumentInner {
    chars: Vec<char>,
    marked: Vec<bool>,
    selection: SelectionState,
}

impl DocumentInner {
    fn clamp_range(&self, range: &Range<usize>) -> Range<usize> {
        let hi = range.end.min(self.chars.len());
        let lo = range.start.min(hi);
        lo..hi
    }

    fn insert(&mut self, offset: usize, text: &str, mark: bool) {
        let at = offset.min(self.chars.len());
        let incoming: Vec<char> = text.chars().collect();
        let flags = vec![mark; incoming.len()];
        self.marked.splice(at..at, flags);
        self.chars.splice(at..at, incoming);
    }

    fn clamp_selection(&mut self) {
        let len = self.chars.len();
        self.selection.start = self.selection.start.min(len);
        self.selection.end = self.selection.end.min(len);
    }
}

/// Reference [`DocumentBuffer`] backed by a shared character vector.
///
/// Clones are handles onto the same buffer, so a test (or host) can keep one
/// handle for inspection while the engine owns another. Not a production
/// text store; it exists so the engine and its tests have a faithful,
/// attribute-aware document without an editor dependency.
#[derive(Clone, Default)]
pub struct InMemoryDocument {
    inner: Arc<Mutex<DocumentInner>>,
}

impl InMemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        let doc = Self::new();
        doc.lock().insert(0, text, false);
        doc
    }

    fn lock(&self) -> MutexGuard<'_, DocumentInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Set the user selection, clamped to the current document length.
    pub fn set_selection(&self, start: usize, end: usize) {
        let mut inner = self.lock();
        inner.selection = SelectionState::new(start, end);
        inner.clamp_selection();
    }

    /// Contiguous runs of chars still carrying the generated attribute.
    pub fn marked_ranges(&self) -> Vec<Range<usize>> {
        let inner = self.lock();
        let mut ranges = Vec::new();
        let mut open: Option<usize> = None;
        for (idx, marked) in inner.marked.iter().enumerate() {
            match (open, *marked) {
                (None, true) => open = Some(idx),
                (Some(start), false) => {
                    ranges.push(start..idx);
                    open = None;
                }
                _ => {}
            }
        }
        if let Some(start) = open {
            ranges.push(start..inner.marked.len());
        }
        ranges
    }
}

impl DocumentBuffer for InMemoryDocument {
    fn insert_marked(&mut self, offset: usize, text: &str) {
        self.lock().insert(offset, text, true);
    }

    fn insert_plain(&mut self, offset: usize, text: &str) {
        self.lock().insert(offset, text, false);
    }

    fn delete_range(&mut self, range: Range<usize>) {
        let mut inner = self.lock();
        let range = inner.clamp_range(&range);
        inner.chars.drain(range.clone());
        inner.marked.drain(range);
        inner.clamp_selection();
    }

    fn unmark_range(&mut self, range: Range<usize>) {
        let mut inner = self.lock();
        let range = inner.clamp_range(&range);
        for flag in &mut inner.marked[range] {
            *flag = false;
        }
    }

    fn text_in_range(&self, range: Range<usize>) -> String {
        let inner = self.lock();
        let range = inner.clamp_range(&range);
        inner.chars[range].iter().collect()
    }

    fn char_len(&self) -> usize {
        self.lock().chars.len()
    }

    fn selection(&self) -> SelectionState {
        self.lock().selection
    }
}
