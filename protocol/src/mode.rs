use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;

/// Process-wide lifecycle mode of the suggestion engine.
///
/// Exactly one suggestion session is meaningful while the mode is not
/// [`LifecycleMode::Idle`]; `Idle` retains no session data beyond a possibly
/// surfaced error message.
#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum LifecycleMode {
    /// No session; selection capture is active.
    #[default]
    Idle,
    /// A continuation or selection-action stream is inserting text.
    Streaming,
    /// The stream finished; marked text awaits accept / reject / modify.
    PendingDecision,
    /// The prior suggestion was discarded and a replacement stream is
    /// inserting at the same anchor.
    Modifying,
}

impl LifecycleMode {
    /// Whether a fragment stream is currently open.
    pub fn is_streaming(self) -> bool {
        matches!(self, Self::Streaming | Self::Modifying)
    }
}
