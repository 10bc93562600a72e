//! Incremental `text/event-stream` decoder (Bytes -> SSE events).

use bytes::Bytes;
use futures::{stream, StreamExt};
use tracing::warn;

use crate::types::response::ChatCompletionChunk;
use crate::{BoxStream, Error, ErrorContext, Result};

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: Option<String>,
    pub data: String,
    pub id: Option<String>,
}

impl SseEvent {
    /// Decode `data` as a completion chunk.
    pub fn parse_chunk(&self) -> Result<ChatCompletionChunk> {
        serde_json::from_str(&self.data).map_err(|e| {
            warn!(error = %e, "event-stream data is not a completion chunk");
            Error::parse_with_context(
                "event-stream data is not a valid completion chunk",
                ErrorContext::new()
                    .with_details(format!("{}: {}", e, truncate(&self.data, 120)))
                    .with_source("sse_decoder"),
            )
        })
    }
}

/// SSE decoder:
/// - frames end at a blank line (`\n\n`, CRLF tolerated)
/// - multiple `data:` lines in a frame are joined with `\n`
/// - comment lines (`:`) and frames without data are skipped
/// - stops on `done_signal` (default "[DONE]")
///
/// Bytes are buffered raw so multi-byte characters split across reads
/// decode correctly.
pub struct SseDecoder {
    done_signal: String,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SseDecoder {
    pub fn new(done_signal: Option<String>) -> Self {
        Self {
            done_signal: done_signal.unwrap_or_else(|| "[DONE]".to_string()),
        }
    }

    /// Turn a body stream into an event stream.
    ///
    /// The result ends at the done signal, at end of input, or right after the
    /// first error it yields. A body that ends without a single `data:` frame
    /// is a parse error.
    pub fn decode(&self, input: BoxStream<'static, Bytes>) -> BoxStream<'static, SseEvent> {
        let done_signal = self.done_signal.clone();

        let stream = stream::unfold(
            Some((input, Vec::<u8>::new(), false)),
            move |state| {
                let done_signal = done_signal.clone();
                async move {
                    let Some((mut input, mut buf, mut seen_data)) = state else {
                        return None;
                    };

                    loop {
                        // If we have a full frame in buffer, emit it.
                        if let Some(idx) = find_frame_end(&buf) {
                            let frame: Vec<u8> = buf.drain(..idx + 2).collect();
                            match parse_frame(&frame[..idx]) {
                                Ok(None) => continue,
                                Ok(Some(ev)) if ev.data.trim() == done_signal => return None,
                                Ok(Some(ev)) => {
                                    seen_data = true;
                                    return Some((Ok(ev), Some((input, buf, seen_data))));
                                }
                                Err(e) => return Some((Err(e), None)),
                            }
                        }

                        // Need more data.
                        match input.next().await {
                            Some(Ok(bytes)) => {
                                buf.extend(bytes.iter().copied().filter(|b| *b != b'\r'));
                            }
                            Some(Err(e)) => return Some((Err(e), None)),
                            None => {
                                // EOF: a trailing frame without its blank line still counts.
                                return match parse_frame(&buf) {
                                    Ok(Some(ev)) if ev.data.trim() != done_signal => {
                                        Some((Ok(ev), None))
                                    }
                                    Ok(Some(_)) => None,
                                    Ok(None) if seen_data => None,
                                    Ok(None) => Some((Err(no_data_error(&buf)), None)),
                                    Err(e) => Some((Err(e), None)),
                                };
                            }
                        }
                    }
                }
            },
        );

        Box::pin(stream)
    }
}

fn no_data_error(tail: &[u8]) -> Error {
    let tail = String::from_utf8_lossy(tail);
    warn!(tail = truncate(tail.trim(), 120), "event stream ended without data");
    Error::parse_with_context(
        "event stream ended without any data frame",
        ErrorContext::new()
            .with_details(truncate(tail.trim(), 120))
            .with_source("sse_decoder"),
    )
}

fn find_frame_end(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\n\n")
}

fn parse_frame(raw: &[u8]) -> Result<Option<SseEvent>> {
    let text = std::str::from_utf8(raw).map_err(|e| {
        Error::parse_with_context(
            "event-stream frame is not valid UTF-8",
            ErrorContext::new()
                .with_details(e.to_string())
                .with_source("sse_decoder"),
        )
    })?;

    let mut event = None;
    let mut id = None;
    let mut data: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let (field, value) = match line.split_once(':') {
            Some((f, v)) => (f, v.strip_prefix(' ').unwrap_or(v)),
            None => (line, ""),
        };
        match field {
            "data" => data.push(value),
            "event" => event = Some(value.to_string()),
            "id" => id = Some(value.to_string()),
            "retry" => {}
            other if is_field_name(other) => {}
            _ => {
                warn!(line = truncate(line, 120), "malformed event-stream line");
                return Err(Error::parse_with_context(
                    "malformed event-stream framing",
                    ErrorContext::new()
                        .with_details(truncate(line, 120))
                        .with_source("sse_decoder"),
                ));
            }
        }
    }

    if data.is_empty() {
        return Ok(None);
    }

    Ok(Some(SseEvent {
        event,
        data: data.join("\n"),
        id,
    }))
}

// Unknown but well-formed field names are ignored, as the SSE format requires.
fn is_field_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
