//! AI suggestion lifecycle engine for a writing surface.
//!
//! The engine coordinates three things: a cancellable streaming text source,
//! a live rich-text document the user keeps editing, and the
//! accept/reject/modify protocol over visually marked suggestion text. Hosts
//! hand the engine a [`DocumentBuffer`] and a [`TextGenerator`], submit
//! [`nib_protocol::Intent`]s, and render
//! [`nib_protocol::EngineEvent`]s.

// Library output goes through tracing, never stdout/stderr.
#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod config;
pub mod document;
mod engine;
pub mod error;
mod generator;
pub mod insertion;
pub mod lifecycle;
mod selection;
mod session;
pub mod testing;

pub use config::EngineConfig;
pub use document::DocumentBuffer;
pub use document::InMemoryDocument;
pub use document::SelectionState;
pub use engine::SuggestionEngine;
pub use error::EngineError;
pub use error::GenerationError;
pub use error::Result;
pub use generator::FragmentStream;
pub use generator::GenerationRequest;
pub use generator::TextGenerator;
pub use selection::CapturedSelection;
pub use session::SuggestionSession;
