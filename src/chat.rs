//!
//! # Chat Relay
//!
//! Thin pass-through to the external chat-completions provider. The caller
//! supplies the whole conversation history on every request — there is no
//! server-side conversation memory. The relay prepends the fixed assistant
//! persona, appends the new user message, and returns the provider's single
//! reply text verbatim.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AppError;

/// Completion model requested from the provider.
pub const CHAT_MODEL: &str = "gpt-4o-mini";

/// Fixed persona instruction prepended to every conversation.
pub const SYSTEM_PERSONA: &str = "You are a friendly AI assistant with a warm \"pookie\" personality.\n\
Be concise, encouraging, and use \u{2661} sparingly. Help manage tasks naturally.";

/// One role/content pair in a conversation. History entries are taken from
/// the caller as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// HTTP client for the chat-completions provider.
///
/// Every request carries the configured timeout; a stalled provider surfaces
/// as `AppError::Timeout` instead of hanging the caller indefinitely.
pub struct OpenAiClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.chat_timeout_secs))
            .build()
            .map_err(|e| {
                AppError::InternalServerError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            api_base: config.openai_api_base.trim_end_matches('/').to_string(),
            api_key: config.openai_api_key.clone(),
        })
    }

    /// Whether a provider credential is configured. The health check reports
    /// `"degraded"` when it is not.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Persona, then the caller's history in order, then the new message.
    pub fn build_messages(message: &str, history: &[ChatMessage]) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(SYSTEM_PERSONA));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(message));
        messages
    }

    /// Forwards the conversation and returns the provider's reply text.
    pub async fn chat(&self, message: &str, history: &[ChatMessage]) -> Result<String, AppError> {
        let messages = Self::build_messages(message, history);

        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&CompletionRequest {
                model: CHAT_MODEL,
                messages: &messages,
            })
            .send()
            .await?
            .error_for_status()?;

        let body: CompletionResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::Upstream("Provider returned no completion".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_messages_order() {
        let history = vec![
            ChatMessage::user("add buy milk"),
            ChatMessage {
                role: "assistant".to_string(),
                content: "Done!".to_string(),
            },
        ];
        let messages = OpenAiClient::build_messages("mark it complete", &history);

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, SYSTEM_PERSONA);
        assert_eq!(messages[1].content, "add buy milk");
        assert_eq!(messages[2].role, "assistant");
        assert_eq!(messages[3].role, "user");
        assert_eq!(messages[3].content, "mark it complete");
    }

    #[test]
    fn test_build_messages_without_history() {
        let messages = OpenAiClient::build_messages("hello", &[]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
    }

    #[test]
    fn test_completion_response_parsing() {
        let raw = r#"{
            "id": "chatcmpl-123",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Got it, pookie!"},
                 "finish_reason": "stop"}
            ]
        }"#;
        let parsed: CompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("Got it, pookie!")
        );
    }

    #[test]
    fn test_completion_request_shape() {
        let messages = vec![ChatMessage::user("hi")];
        let body = serde_json::to_value(CompletionRequest {
            model: CHAT_MODEL,
            messages: &messages,
        })
        .unwrap();
        assert_eq!(body["model"], CHAT_MODEL);
        assert_eq!(body["messages"][0]["role"], "user");
    }
}
