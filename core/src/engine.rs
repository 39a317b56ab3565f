//! The suggestion lifecycle engine.
//!
//! A single spawned task owns the document handle, the current mode, and the
//! session bookkeeping. Intents and stream fragments are serialized through
//! one loop, so the document is only ever mutated in response to a discrete
//! event and fragments apply strictly in arrival order.

use std::sync::Arc;

use futures::StreamExt;
use nib_protocol::EngineEvent;
use nib_protocol::Intent;
use nib_protocol::LifecycleMode;
use nib_protocol::WriteAction;
use nib_protocol::WriteTone;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::config::EngineConfig;
use crate::document::DocumentBuffer;
use crate::error::EngineError;
use crate::error::GenerationError;
use crate::error::Result;
use crate::generator::FragmentStream;
use crate::generator::GenerationRequest;
use crate::generator::TextGenerator;
use crate::insertion;
use crate::insertion::AppendOutcome;
use crate::lifecycle;
use crate::selection;
use crate::selection::CapturedSelection;
use crate::session::SuggestionSession;

pub(crate) const INTENT_CHANNEL_CAPACITY: usize = 64;
pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 128;

/// Handle to a running suggestion engine.
///
/// Intents go in through [`SuggestionEngine::submit`]; events come back out
/// through [`SuggestionEngine::next_event`]. Both queues preserve order.
/// Dropping the handle shuts the engine down and cancels any open stream.
pub struct SuggestionEngine {
    tx_intent: async_channel::Sender<Intent>,
    rx_event: async_channel::Receiver<EngineEvent>,
}

impl SuggestionEngine {
    /// Spawn the engine task over `document`, drawing text from `generator`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<D>(document: D, generator: Arc<dyn TextGenerator>, config: EngineConfig) -> Self
    where
        D: DocumentBuffer + Send + 'static,
    {
        let (tx_intent, rx_intent) = async_channel::bounded(INTENT_CHANNEL_CAPACITY);
        let (tx_event, rx_event) = async_channel::bounded(EVENT_CHANNEL_CAPACITY);
        let state = EngineState {
            document,
            generator,
            config,
            tx_event,
            mode: LifecycleMode::Idle,
            session: None,
            captured: None,
            active: None,
        };
        tokio::spawn(run(state, rx_intent));
        Self { tx_intent, rx_event }
    }

    /// Queue `intent` for the engine.
    pub async fn submit(&self, intent: Intent) -> Result<()> {
        self.tx_intent
            .send(intent)
            .await
            .map_err(|_| EngineError::Closed)
    }

    /// Wait for the next engine event.
    pub async fn next_event(&self) -> Result<EngineEvent> {
        self.rx_event.recv().await.map_err(|_| EngineError::Closed)
    }
}

/// One open fragment stream plus the token that cancels its producer.
struct ActiveStream {
    stream: FragmentStream,
    cancel: CancellationToken,
}

struct EngineState<D> {
    document: D,
    generator: Arc<dyn TextGenerator>,
    config: EngineConfig,
    tx_event: async_channel::Sender<EngineEvent>,
    mode: LifecycleMode,
    session: Option<SuggestionSession>,
    captured: Option<CapturedSelection>,
    active: Option<ActiveStream>,
}

enum Step {
    Intent(Intent),
    StreamItem(Option<std::result::Result<String, GenerationError>>),
    Shutdown,
}

async fn run<D>(mut state: EngineState<D>, rx_intent: async_channel::Receiver<Intent>)
where
    D: DocumentBuffer + Send + 'static,
{
    debug!("suggestion engine started");
    loop {
        let step = match state.active.as_mut() {
            Some(active) => tokio::select! {
                intent = rx_intent.recv() => match intent {
                    Ok(intent) => Step::Intent(intent),
                    Err(_) => Step::Shutdown,
                },
                item = active.stream.next() => Step::StreamItem(item),
            },
            None => match rx_intent.recv().await {
                Ok(intent) => Step::Intent(intent),
                Err(_) => Step::Shutdown,
            },
        };
        match step {
            Step::Intent(intent) => state.handle_intent(intent).await,
            Step::StreamItem(item) => state.handle_stream_item(item).await,
            Step::Shutdown => break,
        }
    }
    state.drop_active();
    debug!("suggestion engine stopped");
}

impl<D> EngineState<D>
where
    D: DocumentBuffer + Send + 'static,
{
    async fn handle_intent(&mut self, intent: Intent) {
        if !lifecycle::intent_allowed(self.mode, &intent) {
            debug!(intent = %intent, mode = %self.mode, "dropping intent outside its mode");
            return;
        }
        match intent {
            Intent::Generate { tone } => self.start_continuation(tone).await,
            Intent::GenerateOnSelection { action } => self.start_replacement(action).await,
            Intent::Stop => self.stop_stream().await,
            Intent::Accept => self.accept().await,
            Intent::Reject => self.reject().await,
            Intent::Modify { action } => self.modify(action).await,
            Intent::SelectionChanged { start, end } => self.observe_selection(start, end).await,
        }
    }

    async fn handle_stream_item(
        &mut self,
        item: Option<std::result::Result<String, GenerationError>>,
    ) {
        match item {
            Some(Ok(fragment)) => self.apply_fragment(&fragment).await,
            Some(Err(err)) => self.fail_stream(err).await,
            None => self.complete_stream().await,
        }
    }

    /// Selection observations drive capture, but only while idle; elsewhere
    /// they are recorded and dropped.
    async fn observe_selection(&mut self, start: usize, end: usize) {
        if self.mode != LifecycleMode::Idle {
            trace!(start, end, mode = %self.mode, "selection observed outside idle");
            return;
        }
        let next = selection::capture_range(
            &self.document,
            start,
            end,
            self.config.min_selection_graphemes,
        );
        if next == self.captured {
            return;
        }
        match &next {
            Some(captured) => {
                let end = captured.start() + captured.char_len();
                self.emit(EngineEvent::SelectionCaptured {
                    start: captured.start(),
                    end,
                })
                .await;
            }
            None => self.emit(EngineEvent::SelectionCleared).await,
        }
        self.captured = next;
    }

    async fn start_continuation(&mut self, tone: WriteTone) {
        let source_text = self.document.text();
        if source_text.is_empty() {
            debug!("dropping generate on an empty document");
            return;
        }
        self.captured = None;
        let session = SuggestionSession::continuation(tone);
        self.open_stream(session, source_text, LifecycleMode::Streaming)
            .await;
    }

    async fn start_replacement(&mut self, action: WriteAction) {
        // Re-read the selection at action time; the idle-time capture may
        // have gone stale if the user kept editing.
        let captured = match self.captured.take() {
            Some(captured) => {
                let start = captured.start();
                selection::capture_range(
                    &self.document,
                    start,
                    start + captured.char_len(),
                    self.config.min_selection_graphemes,
                )
            }
            None => {
                selection::capture_current(&self.document, self.config.min_selection_graphemes)
            }
        };
        let Some(captured) = captured else {
            debug!(action = %action, "dropping selection action without a qualifying selection");
            return;
        };
        // Delete-and-remember is one synchronous step; the deletion point
        // becomes the anchor hint.
        let start = captured.start();
        self.document.delete_range(start..start + captured.char_len());
        let source_text = captured.text().to_string();
        let session = SuggestionSession::replacement(action, captured);
        self.open_stream(session, source_text, LifecycleMode::Streaming)
            .await;
    }

    async fn open_stream(
        &mut self,
        session: SuggestionSession,
        source_text: String,
        next_mode: LifecycleMode,
    ) {
        let request = GenerationRequest {
            source_text,
            mode: session.mode(),
        };
        self.session = Some(session);
        self.mode = next_mode;
        self.emit(EngineEvent::StreamStarted).await;
        let cancel = CancellationToken::new();
        match self.generator.generate(request, cancel.child_token()).await {
            Ok(stream) => self.active = Some(ActiveStream { stream, cancel }),
            Err(err) => self.fail_stream(err).await,
        }
    }

    async fn apply_fragment(&mut self, fragment: &str) {
        let Some(session) = self.session.take() else {
            warn!("fragment arrived without an active session");
            return;
        };
        match insertion::append_fragment(&mut self.document, session, fragment) {
            AppendOutcome::Applied {
                session,
                offset,
                text,
            } => {
                trace!(offset, chars = text.chars().count(), "fragment applied");
                self.session = Some(session);
                self.emit(EngineEvent::FragmentApplied { offset, text }).await;
            }
            AppendOutcome::SkippedEmpty { session } => {
                trace!("empty fragment skipped");
                self.session = Some(session);
            }
        }
    }

    async fn complete_stream(&mut self) {
        self.drop_active();
        let emitted = self.session.as_ref().map(SuggestionSession::emitted).unwrap_or(0);
        self.mode = LifecycleMode::PendingDecision;
        self.emit(EngineEvent::StreamCompleted { emitted }).await;
    }

    /// Backend failure: return to idle, keep whatever marked text already
    /// landed, and surface the message. A replacement round that inserted
    /// nothing puts its deleted selection back rather than leaving a silent
    /// hole.
    async fn fail_stream(&mut self, err: GenerationError) {
        warn!(error = %err, "generation stream failed");
        self.drop_active();
        // Emitted, not the anchor: a modify round keeps its anchor but
        // starts over at zero output, and its deletion also needs undoing.
        if let Some(session) = self.session.take()
            && !session.has_output()
            && let Some(captured) = session.replaced()
        {
            self.document.insert_plain(captured.start(), captured.text());
        }
        self.mode = LifecycleMode::Idle;
        self.emit(EngineEvent::GenerationFailed {
            message: err.to_string(),
        })
        .await;
    }

    async fn stop_stream(&mut self) {
        self.drop_active();
        let emitted = self.session.as_ref().map(SuggestionSession::emitted).unwrap_or(0);
        if emitted > 0 {
            self.mode = LifecycleMode::PendingDecision;
        } else {
            // Stopped before anything arrived; undo a replacing deletion.
            if let Some(session) = self.session.take()
                && let Some(captured) = session.replaced()
            {
                self.document.insert_plain(captured.start(), captured.text());
            }
            self.mode = LifecycleMode::Idle;
        }
        self.emit(EngineEvent::StreamStopped { emitted }).await;
    }

    async fn accept(&mut self) {
        let Some(session) = self.take_session() else {
            return;
        };
        let start = session
            .anchor()
            .or_else(|| session.anchor_hint())
            .unwrap_or(0);
        let len = session.emitted();
        insertion::accept_session(&mut self.document, session);
        self.mode = LifecycleMode::Idle;
        self.emit(EngineEvent::SessionAccepted { start, len }).await;
    }

    async fn reject(&mut self) {
        let Some(session) = self.take_session() else {
            return;
        };
        let restored = insertion::reject_session(&mut self.document, session);
        self.mode = LifecycleMode::Idle;
        self.emit(EngineEvent::SessionRejected { restored }).await;
    }

    async fn modify(&mut self, action: WriteAction) {
        let Some(session) = self.take_session() else {
            return;
        };
        if session.anchor().is_none() {
            // Nothing was ever inserted, so there is no text to transform;
            // fall back to reject semantics.
            debug!(action = %action, "modify on a session with no output falls back to reject");
            let restored = insertion::reject_session(&mut self.document, session);
            self.mode = LifecycleMode::Idle;
            self.emit(EngineEvent::SessionRejected { restored }).await;
            return;
        }
        let (session, prior) = insertion::begin_modify(&mut self.document, session, action);
        let source_text = if prior.is_empty() {
            session
                .replaced()
                .map(|captured| captured.text().to_string())
                .unwrap_or_else(|| self.document.text())
        } else {
            prior
        };
        self.open_stream(session, source_text, LifecycleMode::Modifying)
            .await;
    }

    fn take_session(&mut self) -> Option<SuggestionSession> {
        let session = self.session.take();
        if session.is_none() {
            warn!(mode = %self.mode, "no session for a decision intent");
        }
        session
    }

    fn drop_active(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
        }
    }

    // Takes `&mut self` so the actor future never holds a shared borrow of
    // the state across an await; `run` must stay `Send` for `D: Send`.
    async fn emit(&mut self, event: EngineEvent) {
        // The consumer may already be gone during shutdown.
        let _ = self.tx_event.send(event).await;
    }
}
