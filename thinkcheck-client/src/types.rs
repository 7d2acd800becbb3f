//! Wire types for the gateway's `/v1/chat/completions` endpoint.
//!
//! The request body is OpenAI-shaped plus a `thinking` object. Optional
//! thinking fields are omitted from the JSON when unset, so switching the
//! feature off serializes as exactly `{"enabled": false}`.

use serde::{Deserialize, Serialize};

/// Language the gateway narrates its thinking process in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThinkingLanguage {
    /// Chinese narration.
    Zh,
    /// English narration.
    En,
}

/// The `thinking` request object controlling chain-of-thought output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThinkingOptions {
    /// Whether the gateway should produce a thinking process at all.
    pub enabled: bool,
    /// Whether the thinking process is shown in the response content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_process: Option<bool>,
    /// Narration language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<ThinkingLanguage>,
    /// Maximum tokens for the thinking process.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ThinkingOptions {
    /// Thinking switched on with a visible process in the given language.
    #[must_use]
    pub fn enabled(language: ThinkingLanguage, max_tokens: u32) -> Self {
        Self {
            enabled: true,
            show_process: Some(true),
            language: Some(language),
            max_tokens: Some(max_tokens),
        }
    }

    /// Thinking switched off. Serializes as `{"enabled": false}`.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            show_process: None,
            language: None,
            max_tokens: None,
        }
    }
}

/// A message in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant".
    pub role: String,
    /// Message text content.
    pub content: String,
}

impl ChatMessage {
    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// `/v1/chat/completions` request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier. Left empty, the client fills in its default.
    pub model: String,
    /// Conversation messages.
    pub messages: Vec<ChatMessage>,
    /// Whether the response is streamed. Set by the client send path.
    pub(crate) stream: bool,
    /// Cap on generated tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Chain-of-thought configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking: Option<ThinkingOptions>,
}

impl ChatRequest {
    /// Request with the given messages; the client fills in its default model.
    #[must_use]
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            model: String::new(),
            messages,
            stream: false,
            max_tokens: None,
            thinking: None,
        }
    }

    /// Single user-message request.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(vec![ChatMessage::user(content)])
    }

    /// Select a model explicitly instead of the client default.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Attach thinking configuration.
    #[must_use]
    pub fn thinking(mut self, options: ThinkingOptions) -> Self {
        self.thinking = Some(options);
        self
    }

    /// Cap the number of generated tokens.
    #[must_use]
    pub fn max_tokens(mut self, limit: u32) -> Self {
        self.max_tokens = Some(limit);
        self
    }
}

/// `/v1/chat/completions` non-streaming response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletion {
    /// Model that served the request.
    #[serde(default)]
    pub model: String,
    /// Response choices. The gateway returns exactly one.
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

impl ChatCompletion {
    /// Content of the first choice, if any.
    #[must_use]
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// One response choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// The assistant's message.
    pub message: AssistantMessage,
}

/// The assistant message within a choice.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantMessage {
    /// Full response text. Thinking markers appear inline when
    /// `show_process` is on.
    #[serde(default)]
    pub content: String,
}

/// Whether the gateway's thinking-process markers appear in `content`.
#[must_use]
pub fn has_thinking_markers(content: &str) -> bool {
    content.contains("<thinking>") || content.contains("【思考】")
}

/// Whether English thinking markers appear in `content`.
#[must_use]
pub fn has_english_thinking_markers(content: &str) -> bool {
    content.to_lowercase().contains("think step by step") || content.contains("<thinking>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn thinking_enabled_serializes_all_fields() {
        let options = ThinkingOptions::enabled(ThinkingLanguage::Zh, 1000);
        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(
            value,
            json!({
                "enabled": true,
                "show_process": true,
                "language": "zh",
                "max_tokens": 1000,
            })
        );
    }

    #[test]
    fn thinking_disabled_serializes_enabled_only() {
        let options = ThinkingOptions::disabled();
        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(value, json!({ "enabled": false }));
    }

    #[test]
    fn language_serializes_lowercase() {
        assert_eq!(serde_json::to_value(ThinkingLanguage::En).unwrap(), "en");
        assert_eq!(serde_json::to_value(ThinkingLanguage::Zh).unwrap(), "zh");
    }

    #[test]
    fn request_omits_unset_optionals() {
        let request = ChatRequest::user("hello");
        let value = serde_json::to_value(&request).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("max_tokens"));
        assert!(!object.contains_key("thinking"));
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hello");
    }

    #[test]
    fn request_builder_sets_thinking_and_limit() {
        let request = ChatRequest::user("hi")
            .model("gpt-3.5-turbo")
            .thinking(ThinkingOptions::enabled(ThinkingLanguage::En, 800))
            .max_tokens(10);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-3.5-turbo");
        assert_eq!(value["max_tokens"], 10);
        assert_eq!(value["thinking"]["language"], "en");
        assert_eq!(value["thinking"]["max_tokens"], 800);
    }

    #[test]
    fn completion_first_content() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "model": "gpt-3.5-turbo",
            "choices": [{ "message": { "content": "answer" } }],
        }))
        .unwrap();
        assert_eq!(completion.first_content(), Some("answer"));
    }

    #[test]
    fn completion_without_choices() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "model": "gpt-3.5-turbo",
        }))
        .unwrap();
        assert_eq!(completion.first_content(), None);
    }

    #[test]
    fn thinking_markers_detected() {
        assert!(has_thinking_markers("before <thinking>deep</thinking> after"));
        assert!(has_thinking_markers("【思考】量子比特可以叠加"));
        assert!(!has_thinking_markers("plain answer"));
    }

    #[test]
    fn english_markers_detected() {
        assert!(has_english_thinking_markers("Let me Think Step By Step."));
        assert!(has_english_thinking_markers("<thinking>hm</thinking>"));
        assert!(!has_english_thinking_markers("a direct answer"));
    }
}
