#![deny(missing_docs)]
//! Client for a chat-completion gateway's deep-thinking extension.
//!
//! The gateway exposes an OpenAI-style `POST /v1/chat/completions` endpoint
//! with one addition: a `thinking` request object that controls
//! chain-of-thought output. Streamed responses arrive as SSE `data:` frames
//! carrying either the gateway's tagged chunk format
//! (`content_type: "thinking" | "response"`) or, on older gateway builds,
//! the plain OpenAI delta shape.
//!
//! [`GatewayClient`] sends the requests; the streaming module classifies the
//! frames into [`StreamChunk`]s and gathers them into a
//! [`StreamTranscript`]; [`probe`] answers the "is anything listening there"
//! question without ever failing.

mod client;
mod error;
mod health;
mod streaming;
mod types;

pub use client::GatewayClient;
pub use error::{GatewayError, StreamError};
pub use health::{ServiceHealth, probe};
pub use streaming::{ChunkStream, StreamChunk, StreamEvent, StreamTranscript};
pub use types::{
    AssistantMessage, ChatChoice, ChatCompletion, ChatMessage, ChatRequest, ThinkingLanguage,
    ThinkingOptions, has_english_thinking_markers, has_thinking_markers,
};
