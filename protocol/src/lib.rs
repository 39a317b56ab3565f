//! Shared vocabulary between the suggestion engine and its host surface.
//!
//! The engine is driven by [`Intent`] submissions and reports through
//! [`EngineEvent`]s; everything in this crate is plain serializable data so a
//! host process (or a UI layer on the far side of an IPC boundary) can speak
//! the protocol without linking the engine itself.

mod event;
mod intent;
mod mode;
mod request;

pub use event::EngineEvent;
pub use intent::Intent;
pub use mode::LifecycleMode;
pub use request::GenerationMode;
pub use request::WriteAction;
pub use request::WriteTone;
