//! Intent gating for the lifecycle state machine.

use nib_protocol::Intent;
use nib_protocol::LifecycleMode;

/// Whether `intent` is actionable in `mode`.
///
/// The table is strict: generate intents act only from idle, `Stop` only
/// while a stream is open, and decisions only while one is pending. Anything
/// outside the table is an invalid intent, which the engine drops with a
/// debug log and no state change. Selection observations are accepted in
/// every mode; they only drive capture while idle.
pub fn intent_allowed(mode: LifecycleMode, intent: &Intent) -> bool {
    if intent.is_observation() {
        return true;
    }
    match mode {
        LifecycleMode::Idle => matches!(
            intent,
            Intent::Generate { .. } | Intent::GenerateOnSelection { .. }
        ),
        LifecycleMode::Streaming | LifecycleMode::Modifying => matches!(intent, Intent::Stop),
        LifecycleMode::PendingDecision => matches!(
            intent,
            Intent::Accept | Intent::Reject | Intent::Modify { .. }
        ),
    }
}
