//! SSE streaming support for the gateway's chat-completion endpoint.
//!
//! The gateway emits server-sent-events-style data frames, one JSON payload
//! per `data:` line, terminated by a `[DONE]` sentinel:
//!
//! ```text
//! data: {"content_type":"thinking","content":"考虑一下"}
//!
//! data: {"content_type":"response","content":"人工智能是"}
//!
//! data: [DONE]
//! ```
//!
//! Older gateway builds emit the plain OpenAI delta shape instead:
//!
//! ```text
//! data: {"choices":[{"delta":{"content":"人工智能是"}}]}
//! ```
//!
//! Each frame is classified into a [`StreamChunk`]. Malformed frames are
//! logged and skipped; only transport failures end the stream early.

use std::pin::Pin;

use futures::{Stream, StreamExt};

use crate::error::StreamError;

/// SSE data-frame prefix. Lines without it are not data frames.
const DATA_PREFIX: &str = "data: ";

/// End-of-stream sentinel payload.
const DONE_SENTINEL: &str = "[DONE]";

/// A classified `data:` frame from a streaming response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamChunk {
    /// Chain-of-thought narration (`content_type: "thinking"`).
    Thinking(String),
    /// Answer text (`content_type: "response"`).
    Response(String),
    /// The older delta shape without a `content_type` tag; carries answer
    /// text.
    LegacyDelta(String),
    /// Well-formed JSON matching no known shape. Contributes nothing.
    Unrecognized,
}

impl StreamChunk {
    /// The text carried by this chunk, if any.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Thinking(s) | Self::Response(s) | Self::LegacyDelta(s) => Some(s),
            Self::Unrecognized => None,
        }
    }
}

/// An item emitted while reading a streaming response.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// A classified data frame.
    Chunk(StreamChunk),
    /// Transport-level failure. The stream ends after this event.
    Error(StreamError),
}

/// Handle to a streaming chat completion.
///
/// The stream is one-shot: it ends at `[DONE]`, at the end of the response
/// body, or after a transport error, and cannot be restarted.
pub struct ChunkStream {
    /// The stream of events. Consume with `StreamExt::next()`.
    pub receiver: Pin<Box<dyn Stream<Item = StreamEvent> + Send>>,
}

impl std::fmt::Debug for ChunkStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkStream").finish_non_exhaustive()
    }
}

/// Fragments gathered from a completed stream, split by kind.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StreamTranscript {
    /// Thinking narration fragments in arrival order.
    pub thinking: Vec<String>,
    /// Answer fragments (tagged response and legacy delta) in arrival order.
    pub response: Vec<String>,
}

impl StreamTranscript {
    /// Record one classified chunk.
    pub fn record(&mut self, chunk: StreamChunk) {
        match chunk {
            StreamChunk::Thinking(s) => self.thinking.push(s),
            StreamChunk::Response(s) | StreamChunk::LegacyDelta(s) => self.response.push(s),
            StreamChunk::Unrecognized => {}
        }
    }

    /// Whether no fragment of either kind arrived.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.thinking.is_empty() && self.response.is_empty()
    }

    /// Drain a stream into a transcript.
    ///
    /// A transport error aborts reading and surfaces as `Err`.
    pub async fn collect(mut stream: ChunkStream) -> Result<Self, StreamError> {
        let mut transcript = Self::default();
        while let Some(event) = stream.receiver.next().await {
            match event {
                StreamEvent::Chunk(chunk) => transcript.record(chunk),
                StreamEvent::Error(e) => return Err(e),
            }
        }
        Ok(transcript)
    }
}

/// Wrap an HTTP response body into a [`ChunkStream`].
pub(crate) fn stream_completion(response: reqwest::Response) -> ChunkStream {
    let byte_stream = response.bytes_stream();
    ChunkStream {
        receiver: Box::pin(parse_sse_stream(byte_stream)),
    }
}

/// Parse a raw byte stream into classified [`StreamEvent`]s.
///
/// Buffers partial lines across byte chunks. Consumption stops at the
/// `[DONE]` sentinel: lines after it are never read.
fn parse_sse_stream(
    byte_stream: impl Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send + 'static,
) -> impl Stream<Item = StreamEvent> + Send + 'static {
    async_stream::stream! {
        let mut bytes_stream = std::pin::pin!(byte_stream);
        let mut line_buf = String::new();

        while let Some(chunk_result) = bytes_stream.next().await {
            let chunk = match chunk_result {
                Ok(b) => b,
                Err(e) => {
                    yield StreamEvent::Error(StreamError::retryable(format!("stream read error: {e}")));
                    return;
                }
            };

            let chunk_str = match std::str::from_utf8(&chunk) {
                Ok(s) => s,
                Err(e) => {
                    yield StreamEvent::Error(StreamError::non_retryable(format!("UTF-8 decode error: {e}")));
                    return;
                }
            };

            // Append chunk to line buffer and process complete lines
            line_buf.push_str(chunk_str);

            while let Some(newline_pos) = line_buf.find('\n') {
                let line = line_buf[..newline_pos].trim_end_matches('\r').to_string();
                line_buf.drain(..=newline_pos);

                match process_line(&line) {
                    LineOutcome::Chunk(chunk) => yield StreamEvent::Chunk(chunk),
                    LineOutcome::Skip => {}
                    LineOutcome::Done => return,
                }
            }
        }

        // Trailing bytes without a final newline can still hold one frame
        let remaining = std::mem::take(&mut line_buf);
        if let LineOutcome::Chunk(chunk) = process_line(remaining.trim_end_matches('\r')) {
            yield StreamEvent::Chunk(chunk);
        }
    }
}

/// What one input line produced.
#[derive(Debug, PartialEq, Eq)]
enum LineOutcome {
    /// A classified data frame.
    Chunk(StreamChunk),
    /// Nothing; keep reading.
    Skip,
    /// The `[DONE]` sentinel: stop consuming the stream.
    Done,
}

/// Process a single line of the event stream.
///
/// Keep-alive blank lines and lines without the `data: ` prefix are skipped
/// silently. Malformed JSON payloads are logged at `warn` and skipped; they
/// never abort the read loop.
fn process_line(line: &str) -> LineOutcome {
    if line.trim().is_empty() {
        return LineOutcome::Skip;
    }

    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return LineOutcome::Skip;
    };

    let payload = payload.trim();
    if payload == DONE_SENTINEL {
        return LineOutcome::Done;
    }

    match serde_json::from_str::<serde_json::Value>(payload) {
        Ok(json) => LineOutcome::Chunk(classify_frame(&json)),
        Err(e) => {
            tracing::warn!(error = %e, payload, "skipping malformed streaming frame");
            LineOutcome::Skip
        }
    }
}

/// Classify a well-formed frame payload.
///
/// The `content_type` tag is the discriminant; frames without a recognized
/// tag fall back to the legacy `choices[0].delta.content` shape.
fn classify_frame(json: &serde_json::Value) -> StreamChunk {
    match json["content_type"].as_str() {
        Some("thinking") => StreamChunk::Thinking(frame_content(json)),
        Some("response") => StreamChunk::Response(frame_content(json)),
        _ => match json["choices"][0]["delta"]["content"].as_str() {
            Some(content) => StreamChunk::LegacyDelta(content.to_string()),
            None => StreamChunk::Unrecognized,
        },
    }
}

fn frame_content(json: &serde_json::Value) -> String {
    json["content"].as_str().unwrap_or_default().to_string()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
