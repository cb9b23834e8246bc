use domain::gateway::{ChatGateway, ChatRequest, ChatTurn, FALLBACK_REPLY};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use shared::telemetry::Telemetry;
use shared::types::Result;
use std::sync::Arc;

use crate::config::Config;

const INSTRUCTION_ACK: &str = "Okay, I understand. I will act as instructed.";
const TEMPERATURE: f32 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 8192;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<ChatTurn>,
    generation_config: GenerationConfig,
}

/// Pull `candidates[0].content.parts[0].text` out of a provider envelope.
pub fn extract_reply_text(envelope: &Value) -> String {
    envelope
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .unwrap_or(FALLBACK_REPLY)
        .to_string()
}

/// Instruction first, acknowledged by the model, then history and the new turn.
fn build_contents(request: &ChatRequest) -> Vec<ChatTurn> {
    let mut contents = Vec::with_capacity(request.history.len() + 3);
    contents.push(ChatTurn::user(request.system_instruction.clone()));
    contents.push(ChatTurn::model(INSTRUCTION_ACK));
    contents.extend(request.history.iter().cloned());
    contents.push(ChatTurn::user(request.message.clone()));
    contents
}

/// Direct client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Arc<Client>,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            client: Arc::new(Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config
            .gemini_api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("No Gemini API key configured (set GOOGLE_API_KEY)"))?;
        Ok(Self::new(&config.gemini_base_url, &config.gemini_model, api_key))
    }

    async fn generate_content(&self, contents: Vec<ChatTurn>) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateContentRequest {
            contents,
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };
        let timer = Telemetry::new();
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        tracing::debug!(status = %status, elapsed_ms = timer.elapsed_ms(), "gemini generateContent");
        if !status.is_success() {
            return Err(anyhow::anyhow!("Gemini API error ({}): {}", status, text));
        }
        let envelope: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
        Ok(extract_reply_text(&envelope))
    }
}

impl ChatGateway for GeminiClient {
    async fn send_chat(&self, request: &ChatRequest) -> Result<String> {
        self.generate_content(build_contents(request)).await
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_content(vec![ChatTurn::user(prompt)]).await
    }
}
