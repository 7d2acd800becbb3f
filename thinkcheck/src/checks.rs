//! The fixed check scenarios.
//!
//! Each scenario is one request against the gateway, isolated from the
//! others: a failure (including a transport failure) marks that scenario
//! failed and the run moves on to the next one.

use std::future::Future;
use std::time::Instant;

use futures::StreamExt;
use thinkcheck_client::{
    ChatRequest, GatewayClient, StreamChunk, StreamEvent, StreamTranscript, ThinkingLanguage,
    ThinkingOptions, has_english_thinking_markers, has_thinking_markers,
};

use crate::report;

/// Outcome of one scenario.
#[derive(Debug)]
pub struct CheckOutcome {
    /// Scenario name shown in the summary.
    pub name: &'static str,
    /// Whether the scenario passed.
    pub passed: bool,
}

/// Run every scenario in order, continuing past failures.
pub async fn run_all(client: &GatewayClient) -> Vec<CheckOutcome> {
    vec![
        run("non-streaming thinking (zh)", non_streaming_thinking(client)).await,
        run("streaming thinking (zh)", streaming_thinking(client)).await,
        run("thinking disabled", thinking_disabled(client)).await,
        run("english thinking", english_thinking(client)).await,
    ]
}

async fn run(name: &'static str, scenario: impl Future<Output = bool>) -> CheckOutcome {
    let started = Instant::now();
    let passed = scenario.await;
    report::info(&format!(
        "{name} finished in {:.1}s",
        started.elapsed().as_secs_f64()
    ));
    CheckOutcome { name, passed }
}

/// Non-streaming completion with a visible Chinese thinking process.
async fn non_streaming_thinking(client: &GatewayClient) -> bool {
    report::heading("🧠 non-streaming thinking");

    let request = ChatRequest::user("解释量子计算的基本原理，并分析其优势")
        .thinking(ThinkingOptions::enabled(ThinkingLanguage::Zh, 1000));

    match client.complete(request).await {
        Ok(completion) => {
            report::pass("request succeeded");
            report::info(&format!("model: {}", completion.model));
            let content = completion.first_content().unwrap_or_default();
            report::info(&format!("content: {}…", report::preview(content)));
            if has_thinking_markers(content) {
                report::pass("thinking process markers present");
            } else {
                report::info("no thinking markers in the response");
            }
            true
        }
        Err(e) => {
            report::fail(&format!("request failed: {e}"));
            false
        }
    }
}

/// Streaming completion with a visible Chinese thinking process.
///
/// Prints fragments as they arrive, then the per-kind counts. Passes when
/// the stream completes and carried at least one fragment of either kind.
async fn streaming_thinking(client: &GatewayClient) -> bool {
    report::heading("🚀 streaming thinking");

    let request = ChatRequest::user("什么是人工智能？请详细解释其发展历程和未来前景")
        .thinking(ThinkingOptions::enabled(ThinkingLanguage::Zh, 1500));

    let mut stream = match client.complete_stream(request).await {
        Ok(stream) => stream,
        Err(e) => {
            report::fail(&format!("request failed: {e}"));
            return false;
        }
    };
    report::pass("stream opened");

    let mut transcript = StreamTranscript::default();
    while let Some(event) = stream.receiver.next().await {
        match event {
            StreamEvent::Chunk(chunk) => {
                match &chunk {
                    StreamChunk::Thinking(text) => report::fragment("🧠", text),
                    StreamChunk::Response(text) => report::fragment("💭", text),
                    StreamChunk::LegacyDelta(text) => report::fragment("📝", text),
                    StreamChunk::Unrecognized => {}
                }
                transcript.record(chunk);
            }
            StreamEvent::Error(e) => {
                println!();
                report::fail(&format!("stream aborted: {e}"));
                return false;
            }
        }
    }
    println!();

    report::info(&format!("thinking fragments: {}", transcript.thinking.len()));
    report::info(&format!("response fragments: {}", transcript.response.len()));

    if transcript.is_empty() {
        report::fail("stream carried no content");
        return false;
    }
    if !transcript.thinking.is_empty() {
        report::pass("received thinking content");
    }
    if !transcript.response.is_empty() {
        report::pass("received response content");
    }
    true
}

/// Completion with thinking switched off; the content must stay clean.
async fn thinking_disabled(client: &GatewayClient) -> bool {
    report::heading("🚫 thinking disabled");

    let request = ChatRequest::user("简单介绍一下机器学习").thinking(ThinkingOptions::disabled());

    match client.complete(request).await {
        Ok(completion) => {
            report::pass("request succeeded");
            let content = completion.first_content().unwrap_or_default();
            report::info(&format!("content: {}…", report::preview(content)));
            if has_thinking_markers(content) {
                report::warn("thinking markers present despite disabled thinking");
            } else {
                report::pass("no thinking process in the response");
            }
            true
        }
        Err(e) => {
            report::fail(&format!("request failed: {e}"));
            false
        }
    }
}

/// Non-streaming completion with an English thinking process.
async fn english_thinking(client: &GatewayClient) -> bool {
    report::heading("🇺🇸 english thinking");

    let request = ChatRequest::user("Explain the concept of blockchain technology")
        .thinking(ThinkingOptions::enabled(ThinkingLanguage::En, 800));

    match client.complete(request).await {
        Ok(completion) => {
            report::pass("request succeeded");
            let content = completion.first_content().unwrap_or_default();
            report::info(&format!("content: {}…", report::preview(content)));
            if has_english_thinking_markers(content) {
                report::pass("english thinking markers present");
            } else {
                report::info("no english thinking markers detected");
            }
            true
        }
        Err(e) => {
            report::fail(&format!("request failed: {e}"));
            false
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
