//! Streaming completions.
//!
//! ```text
//! body bytes -> SseDecoder -> SseEvent -> ChatCompletionChunk
//! ```
//!
//! [`ChatCompletionStream`] is pulled one chunk at a time, can be consumed
//! once, and ends at the provider's `[DONE]` marker. Dropping it early drops
//! the response body, which closes the connection without draining it.

pub mod decode;

pub use decode::{SseDecoder, SseEvent};

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::{stream, Stream, StreamExt};

use crate::types::response::ChatCompletionChunk;
use crate::{BoxStream, Result};

/// Lazy, single-pass sequence of completion chunks.
pub struct ChatCompletionStream {
    inner: BoxStream<'static, ChatCompletionChunk>,
    request_id: String,
    finished: bool,
}

impl ChatCompletionStream {
    /// Decode an event-stream response body.
    pub fn from_body(body: BoxStream<'static, Bytes>, request_id: impl Into<String>) -> Self {
        let chunks = SseDecoder::default()
            .decode(body)
            .map(|ev| ev.and_then(|ev| ev.parse_chunk()));
        Self {
            inner: Box::pin(chunks),
            request_id: request_id.into(),
            finished: false,
        }
    }

    /// The `x-request-id` sent with the request that opened this stream.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Drain the stream and concatenate every text delta.
    pub async fn collect_content(mut self) -> Result<String> {
        let mut content = String::new();
        while let Some(chunk) = self.next().await {
            content.push_str(&chunk?.content());
        }
        Ok(content)
    }

    fn finish(&mut self) {
        self.finished = true;
        // Release the body (and its connection) as soon as nothing more will be read.
        self.inner = Box::pin(stream::empty());
    }
}

impl Stream for ChatCompletionStream {
    type Item = Result<ChatCompletionChunk>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.finished {
            return Poll::Ready(None);
        }
        match self.inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Err(e))) => {
                self.finish();
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                self.finish();
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

impl std::fmt::Debug for ChatCompletionStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionStream")
            .field("request_id", &self.request_id)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}
