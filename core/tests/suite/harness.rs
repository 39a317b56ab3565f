//! Shared setup for the engine suites.

use std::sync::Arc;

use nib_core::EngineConfig;
use nib_core::InMemoryDocument;
use nib_core::SuggestionEngine;
use nib_core::testing::ScriptedGenerator;

/// Spawn an engine over a shared document handle and a scripted generator,
/// keeping the generator around for request inspection.
pub fn spawn_engine(
    document: &InMemoryDocument,
    generator: ScriptedGenerator,
) -> (SuggestionEngine, Arc<ScriptedGenerator>) {
    let generator = Arc::new(generator);
    let engine = SuggestionEngine::spawn(document.clone(), generator.clone(), EngineConfig::default());
    (engine, generator)
}
