//! Engine tuning knobs.

use serde::Deserialize;
use serde::Serialize;

/// Default minimum selection length eligible for capture, in grapheme
/// clusters.
pub const DEFAULT_MIN_SELECTION_GRAPHEMES: usize = 3;

/// Tunable parameters for [`crate::SuggestionEngine`].
///
/// Deserializes with per-field defaults, so hosts can supply a sparse table
/// and pick up new knobs without breakage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Selections shorter than this many grapheme clusters are never
    /// captured and cannot start a selection action.
    pub min_selection_graphemes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_selection_graphemes: DEFAULT_MIN_SELECTION_GRAPHEMES,
        }
    }
}
