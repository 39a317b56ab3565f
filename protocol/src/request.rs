use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;

/// Writing register applied to continuation requests.
///
/// Tones only shape continuations; transformations of existing text carry a
/// [`WriteAction`] instead, and the two never combine.
#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WriteTone {
    #[default]
    Neutral,
    Formal,
    Casual,
    Professional,
    Playful,
}

/// Transformation applied to existing text (a selection or a prior
/// suggestion).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WriteAction {
    Shorten,
    Expand,
    Rephrase,
    Formalize,
    Casualize,
    Summarize,
    Improve,
    Brainstorm,
}

/// What a generation request asks the text source to do.
///
/// The two variants carry mutually exclusive parameter sets: continuations
/// take a tone, transformations take an action.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationMode {
    /// Continue the document from its current end in the given register.
    Continuation { tone: WriteTone },
    /// Transform the supplied source text.
    Transform { action: WriteAction },
}

impl GenerationMode {
    pub fn action(&self) -> Option<WriteAction> {
        match self {
            Self::Continuation { .. } => None,
            Self::Transform { action } => Some(*action),
        }
    }

    pub fn tone(&self) -> Option<WriteTone> {
        match self {
            Self::Continuation { tone } => Some(*tone),
            Self::Transform { .. } => None,
        }
    }
}
