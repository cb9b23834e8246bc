use crate::models::{Message, RelatedVideo};
use serde::{Deserialize, Serialize};
use shared::types::Result;

/// Returned when the provider envelope carries no text.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't understand.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPart {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub parts: Vec<ContentPart>,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_role("user", text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::with_role("model", text)
    }

    fn with_role(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![ContentPart { text: text.into() }],
        }
    }
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub history: Vec<ChatTurn>,
    pub message: String,
    pub system_instruction: String,
}

impl ChatRequest {
    /// Blank messages are dropped; bot messages become `model` turns.
    pub fn history_from(messages: &[Message]) -> Vec<ChatTurn> {
        messages
            .iter()
            .filter(|m| !m.text.trim().is_empty())
            .map(|m| {
                let text = m.text.trim();
                if m.is_bot {
                    ChatTurn::model(text)
                } else {
                    ChatTurn::user(text)
                }
            })
            .collect()
    }
}

pub trait ChatGateway {
    /// Raw reply text; a malformed envelope resolves to [`FALLBACK_REPLY`].
    fn send_chat(&self, request: &ChatRequest) -> impl std::future::Future<Output = Result<String>> + Send;

    /// Single-prompt generation without history.
    fn generate(&self, prompt: &str) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait VideoSearch {
    /// `None` when the lookup failed or found nothing; errors never escape.
    fn search_videos(
        &self,
        query: &str,
        max_results: u32,
    ) -> impl std::future::Future<Output = Option<Vec<RelatedVideo>>> + Send;
}
