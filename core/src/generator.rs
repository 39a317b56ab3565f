//! Streaming source contract between the engine and a text backend.

use std::pin::Pin;
use std::task::Context;
use std::task::Poll;

use async_trait::async_trait;
use futures::Stream;
use nib_protocol::GenerationMode;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::GenerationError;

/// Prompt context for one generation stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Text the request operates on: the document so far for continuations,
    /// the selected or pending suggestion text for transformations. Never
    /// empty; the engine refuses to open a stream without source text.
    pub source_text: String,
    pub mode: GenerationMode,
}

/// A cancellable, incremental text source.
///
/// Implementations deliver whitespace-normalized fragments (newline and
/// whitespace runs collapsed to single spaces) in emission order, and never
/// split a grapheme cluster across fragments. Once `cancel` fires no further
/// fragments may be delivered. The engine also drops the stream on
/// cancellation, so a producer that keeps sending anyway still cannot reach
/// the document.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        request: GenerationRequest,
        cancel: CancellationToken,
    ) -> Result<FragmentStream, GenerationError>;
}

/// Fragment sequence for one open generation.
///
/// Ends after `None` on natural completion. A backend fault yields a single
/// `Err` item and then the stream ends.
pub struct FragmentStream {
    rx: mpsc::Receiver<Result<String, GenerationError>>,
}

impl FragmentStream {
    pub fn new(rx: mpsc::Receiver<Result<String, GenerationError>>) -> Self {
        Self { rx }
    }

    /// Channel-backed stream with room for `capacity` in-flight fragments.
    pub fn channel(
        capacity: usize,
    ) -> (mpsc::Sender<Result<String, GenerationError>>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self { rx })
    }
}

impl Stream for FragmentStream {
    type Item = Result<String, GenerationError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
