//! Test doubles and helpers for exercising the engine without a live model.
//!
//! [`ScriptedGenerator`] plays pre-arranged fragment streams, including
//! misbehaving ones, so lifecycle tests stay deterministic. The wait helpers
//! drain engine events until an expected one shows up, failing loudly on a
//! hang.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;

use async_trait::async_trait;
use nib_protocol::EngineEvent;
use nib_utils_text::grapheme_chunks;
use nib_utils_text::normalize_whitespace;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::engine::SuggestionEngine;
use crate::error::GenerationError;
use crate::generator::FragmentStream;
use crate::generator::GenerationRequest;
use crate::generator::TextGenerator;

const FRAGMENT_CHANNEL_CAPACITY: usize = 16;
const EVENT_WAIT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
enum ScriptEnd {
    /// Close the stream normally.
    Complete,
    /// Report a backend fault and end.
    Fail(GenerationError),
    /// Keep the stream open until cancelled.
    Hold,
    /// Keep the stream open until cancelled, then misbehave by sending more
    /// fragments anyway.
    HoldThenSend(Vec<String>),
}

#[derive(Debug, Clone)]
struct Script {
    open_error: Option<GenerationError>,
    fragments: Vec<String>,
    end: ScriptEnd,
}

#[derive(Debug, Clone, Copy)]
struct Pacing {
    delay: Duration,
    chunk_graphemes: usize,
}

/// Scripted [`TextGenerator`].
///
/// Each `generate` call consumes the next queued script, records the request
/// for later inspection, and plays the script on a background task.
/// Fragments are whitespace-normalized on the way out, matching the adapter
/// contract. A `generate` call with no script queued panics; queue exactly
/// as many scripts as the test opens streams.
#[derive(Default)]
pub struct ScriptedGenerator {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<GenerationRequest>>,
    pacing: Option<Pacing>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a stream that yields `fragments` and completes.
    #[must_use]
    pub fn stream<I, S>(self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Script {
            open_error: None,
            fragments: into_fragments(fragments),
            end: ScriptEnd::Complete,
        })
    }

    /// Queue a stream that yields `fragments` and then fails with `error`.
    #[must_use]
    pub fn stream_then_fail<I, S>(self, fragments: I, error: GenerationError) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Script {
            open_error: None,
            fragments: into_fragments(fragments),
            end: ScriptEnd::Fail(error),
        })
    }

    /// Queue a stream that yields `fragments` and then stays open until it
    /// is cancelled. Use this to park the engine mid-stream.
    #[must_use]
    pub fn stream_then_hold<I, S>(self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Script {
            open_error: None,
            fragments: into_fragments(fragments),
            end: ScriptEnd::Hold,
        })
    }

    /// Queue a stream that yields `fragments`, waits for cancellation, and
    /// then defies it by sending `late` fragments anyway.
    #[must_use]
    pub fn stream_then_defy_cancel<I, S>(self, fragments: I, late: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Script {
            open_error: None,
            fragments: into_fragments(fragments),
            end: ScriptEnd::HoldThenSend(into_fragments(late)),
        })
    }

    /// Queue a `generate` call that fails before any stream opens.
    #[must_use]
    pub fn fail_on_open(self, error: GenerationError) -> Self {
        self.push(Script {
            open_error: Some(error),
            fragments: Vec::new(),
            end: ScriptEnd::Complete,
        })
    }

    /// Deliver fragments in `chunk_graphemes`-sized units with `delay`
    /// between them, imitating the cosmetic typing effect.
    #[must_use]
    pub fn with_pacing(mut self, delay: Duration, chunk_graphemes: usize) -> Self {
        self.pacing = Some(Pacing {
            delay,
            chunk_graphemes,
        });
        self
    }

    /// Requests seen so far, in call order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        lock(&self.requests).clone()
    }

    fn push(self, script: Script) -> Self {
        lock(&self.scripts).push_back(script);
        self
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        request: GenerationRequest,
        cancel: CancellationToken,
    ) -> Result<FragmentStream, GenerationError> {
        lock(&self.requests).push(request);
        let script = match lock(&self.scripts).pop_front() {
            Some(script) => script,
            None => panic!("ScriptedGenerator: no script queued for this generate call"),
        };
        if let Some(error) = script.open_error {
            return Err(error);
        }
        let (tx, stream) = FragmentStream::channel(FRAGMENT_CHANNEL_CAPACITY);
        tokio::spawn(run_script(script, self.pacing, tx, cancel));
        Ok(stream)
    }
}

async fn run_script(
    script: Script,
    pacing: Option<Pacing>,
    tx: mpsc::Sender<Result<String, GenerationError>>,
    cancel: CancellationToken,
) {
    for fragment in &script.fragments {
        let normalized = normalize_whitespace(fragment);
        let units: Vec<String> = match pacing {
            Some(pacing) => grapheme_chunks(&normalized, pacing.chunk_graphemes)
                .into_iter()
                .map(str::to_string)
                .collect(),
            None => vec![normalized],
        };
        for unit in units {
            if let Some(pacing) = pacing {
                tokio::time::sleep(pacing.delay).await;
            }
            tokio::select! {
                _ = cancel.cancelled() => return,
                sent = tx.send(Ok(unit)) => {
                    if sent.is_err() {
                        return;
                    }
                }
            }
        }
    }
    match script.end {
        ScriptEnd::Complete => {}
        ScriptEnd::Fail(error) => {
            let _ = tx.send(Err(error)).await;
        }
        ScriptEnd::Hold => cancel.cancelled().await,
        ScriptEnd::HoldThenSend(late) => {
            cancel.cancelled().await;
            for fragment in late {
                let _ = tx.send(Ok(normalize_whitespace(&fragment))).await;
            }
        }
    }
}

/// Receive events until `pred` matches, panicking on timeout or shutdown.
pub async fn wait_for_event<F>(engine: &SuggestionEngine, pred: F) -> EngineEvent
where
    F: Fn(&EngineEvent) -> bool,
{
    wait_for_event_match(engine, |event| pred(event).then(|| event.clone())).await
}

/// Receive events until `map` returns a value, panicking on timeout or
/// shutdown.
pub async fn wait_for_event_match<F, T>(engine: &SuggestionEngine, map: F) -> T
where
    F: Fn(&EngineEvent) -> Option<T>,
{
    loop {
        let event = match tokio::time::timeout(EVENT_WAIT_TIMEOUT, engine.next_event()).await {
            Ok(Ok(event)) => event,
            Ok(Err(err)) => panic!("engine closed while waiting for an event: {err}"),
            Err(_) => panic!("timed out waiting for an event"),
        };
        if let Some(value) = map(&event) {
            return value;
        }
    }
}

fn into_fragments<I, S>(fragments: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fragments.into_iter().map(Into::into).collect()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
