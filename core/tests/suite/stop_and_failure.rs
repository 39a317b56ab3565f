use anyhow::Result;
use nib_core::DocumentBuffer;
use nib_core::GenerationError;
use nib_core::InMemoryDocument;
use nib_core::testing::ScriptedGenerator;
use nib_core::testing::wait_for_event;
use nib_core::testing::wait_for_event_match;
use nib_protocol::EngineEvent;
use nib_protocol::Intent;
use nib_protocol::WriteAction;
use nib_protocol::WriteTone;
use pretty_assertions::assert_eq;

use super::harness::spawn_engine;

#[tokio::test]
async fn stop_keeps_delivered_text_for_decision() -> Result<()> {
    let doc = InMemoryDocument::from_text("Log:");
    doc.set_selection(4, 4);
    let (engine, _generator) =
        spawn_engine(&doc, ScriptedGenerator::new().stream_then_hold(["alpha "]));

    engine
        .submit(Intent::Generate {
            tone: WriteTone::Neutral,
        })
        .await?;
    wait_for_event(&engine, |e| matches!(e, EngineEvent::FragmentApplied { .. })).await;

    engine.submit(Intent::Stop).await?;
    let emitted = wait_for_event_match(&engine, |e| match e {
        EngineEvent::StreamStopped { emitted } => Some(*emitted),
        _ => None,
    })
    .await;
    assert_eq!(emitted, 6);

    // The partial text stays marked and accept finalizes it like any
    // completed stream.
    assert_eq!(doc.text(), "Log:alpha ");
    assert_eq!(doc.marked_ranges(), vec![4..10]);
    engine.submit(Intent::Accept).await?;
    let accepted = wait_for_event_match(&engine, |e| match e {
        EngineEvent::SessionAccepted { start, len } => Some((*start, *len)),
        _ => None,
    })
    .await;
    assert_eq!(accepted, (4, 6));
    assert_eq!(doc.marked_ranges(), vec![]);
    Ok(())
}

#[tokio::test]
async fn stop_before_output_restores_a_replaced_selection() -> Result<()> {
    let doc = InMemoryDocument::from_text("hello world");
    let (engine, _generator) = spawn_engine(
        &doc,
        ScriptedGenerator::new().stream_then_hold(Vec::<&str>::new()),
    );

    engine
        .submit(Intent::SelectionChanged { start: 0, end: 11 })
        .await?;
    wait_for_event(&engine, |e| matches!(e, EngineEvent::SelectionCaptured { .. })).await;
    engine
        .submit(Intent::GenerateOnSelection {
            action: WriteAction::Summarize,
        })
        .await?;
    wait_for_event(&engine, |e| matches!(e, EngineEvent::StreamStarted)).await;
    assert_eq!(doc.text(), "");

    engine.submit(Intent::Stop).await?;
    let emitted = wait_for_event_match(&engine, |e| match e {
        EngineEvent::StreamStopped { emitted } => Some(*emitted),
        _ => None,
    })
    .await;
    assert_eq!(emitted, 0);
    assert_eq!(doc.text(), "hello world");
    assert_eq!(doc.marked_ranges(), vec![]);

    // Back to idle; the engine keeps serving.
    engine
        .submit(Intent::SelectionChanged { start: 0, end: 5 })
        .await?;
    let captured = wait_for_event_match(&engine, |e| match e {
        EngineEvent::SelectionCaptured { start, end } => Some((*start, *end)),
        _ => None,
    })
    .await;
    assert_eq!(captured, (0, 5));
    Ok(())
}

#[tokio::test]
async fn failure_keeps_partial_text_marked() -> Result<()> {
    let doc = InMemoryDocument::from_text("Draft:");
    doc.set_selection(6, 6);
    let (engine, _generator) = spawn_engine(
        &doc,
        ScriptedGenerator::new()
            .stream_then_fail(
                ["partial "],
                GenerationError::Network("reset".to_string()),
            )
            .stream(["again"]),
    );

    engine
        .submit(Intent::Generate {
            tone: WriteTone::Neutral,
        })
        .await?;
    let message = wait_for_event_match(&engine, |e| match e {
        EngineEvent::GenerationFailed { message } => Some(message.clone()),
        _ => None,
    })
    .await;
    assert_eq!(message, "network failure while streaming: reset");

    // Partial output survives, still marked, for manual cleanup.
    assert_eq!(doc.text(), "Draft:partial ");
    assert_eq!(doc.marked_ranges(), vec![6..14]);

    // The engine is idle again and a fresh generation works.
    doc.set_selection(14, 14);
    engine
        .submit(Intent::Generate {
            tone: WriteTone::Neutral,
        })
        .await?;
    wait_for_event(&engine, |e| matches!(e, EngineEvent::StreamCompleted { .. })).await;
    engine.submit(Intent::Accept).await?;
    wait_for_event(&engine, |e| matches!(e, EngineEvent::SessionAccepted { .. })).await;
    assert_eq!(doc.text(), "Draft:partial again");
    // Only the stranded first run is still marked.
    assert_eq!(doc.marked_ranges(), vec![6..14]);
    Ok(())
}

#[tokio::test]
async fn fragments_after_stop_are_never_applied() -> Result<()> {
    let doc = InMemoryDocument::from_text("X:");
    doc.set_selection(2, 2);
    let (engine, _generator) = spawn_engine(
        &doc,
        ScriptedGenerator::new().stream_then_defy_cancel(["good "], ["evil"]),
    );

    engine
        .submit(Intent::Generate {
            tone: WriteTone::Neutral,
        })
        .await?;
    wait_for_event(&engine, |e| matches!(e, EngineEvent::FragmentApplied { .. })).await;
    engine.submit(Intent::Stop).await?;
    let emitted = wait_for_event_match(&engine, |e| match e {
        EngineEvent::StreamStopped { emitted } => Some(*emitted),
        _ => None,
    })
    .await;
    assert_eq!(emitted, 5);

    engine.submit(Intent::Accept).await?;
    wait_for_event(&engine, |e| matches!(e, EngineEvent::SessionAccepted { .. })).await;

    // Give the defiant producer every chance to sneak its late fragment in.
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
    assert_eq!(doc.text(), "X:good ");
    Ok(())
}

#[tokio::test]
async fn open_failure_on_a_replacement_restores_the_selection() -> Result<()> {
    let doc = InMemoryDocument::from_text("hello world");
    let (engine, _generator) = spawn_engine(
        &doc,
        ScriptedGenerator::new().fail_on_open(GenerationError::QuotaExceeded),
    );

    engine
        .submit(Intent::SelectionChanged { start: 0, end: 11 })
        .await?;
    wait_for_event(&engine, |e| matches!(e, EngineEvent::SelectionCaptured { .. })).await;
    engine
        .submit(Intent::GenerateOnSelection {
            action: WriteAction::Summarize,
        })
        .await?;

    wait_for_event(&engine, |e| matches!(e, EngineEvent::StreamStarted)).await;
    let message = wait_for_event_match(&engine, |e| match e {
        EngineEvent::GenerationFailed { message } => Some(message.clone()),
        _ => None,
    })
    .await;
    assert_eq!(message, "generation quota exhausted");

    // The deleted selection is put back rather than left as a silent hole.
    assert_eq!(doc.text(), "hello world");
    assert_eq!(doc.marked_ranges(), vec![]);
    Ok(())
}

#[tokio::test]
async fn empty_stream_completes_into_a_decision() -> Result<()> {
    let doc = InMemoryDocument::from_text("Intact.");
    doc.set_selection(7, 7);
    let (engine, _generator) = spawn_engine(
        &doc,
        ScriptedGenerator::new()
            .stream(Vec::<&str>::new())
            .stream(Vec::<&str>::new()),
    );

    // Accept on a zero-output session is a no-op on the document.
    engine
        .submit(Intent::Generate {
            tone: WriteTone::Neutral,
        })
        .await?;
    let emitted = wait_for_event_match(&engine, |e| match e {
        EngineEvent::StreamCompleted { emitted } => Some(*emitted),
        _ => None,
    })
    .await;
    assert_eq!(emitted, 0);
    engine.submit(Intent::Accept).await?;
    let len = wait_for_event_match(&engine, |e| match e {
        EngineEvent::SessionAccepted { len, .. } => Some(*len),
        _ => None,
    })
    .await;
    assert_eq!(len, 0);

    // So is reject, and it reports nothing restored.
    engine
        .submit(Intent::Generate {
            tone: WriteTone::Neutral,
        })
        .await?;
    wait_for_event(&engine, |e| matches!(e, EngineEvent::StreamCompleted { .. })).await;
    engine.submit(Intent::Reject).await?;
    let restored = wait_for_event_match(&engine, |e| match e {
        EngineEvent::SessionRejected { restored } => Some(*restored),
        _ => None,
    })
    .await;
    assert!(!restored);

    assert_eq!(doc.text(), "Intact.");
    assert_eq!(doc.marked_ranges(), vec![]);
    Ok(())
}
