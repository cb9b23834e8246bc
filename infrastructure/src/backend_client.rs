use domain::gateway::{ChatGateway, ChatRequest};
use domain::models::UserData;
use reqwest::Client;
use serde_json::Value;
use shared::telemetry::Telemetry;
use shared::types::Result;
use std::sync::Arc;

use crate::config::Config;
use crate::gemini_client::extract_reply_text;

const RELAY_INSTRUCTION: &str = "You are a helpful study assistant.";

/// Client for the LearnMyWay backend: chat relay and read-only profile.
#[derive(Clone)]
pub struct BackendClient {
    client: Arc<Client>,
    base_url: String,
    id_token: Option<String>,
}

impl BackendClient {
    pub fn new(base_url: &str, id_token: Option<String>) -> Self {
        Self {
            client: Arc::new(Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
            id_token,
        }
    }

    pub fn from_config(config: &Config) -> Option<Self> {
        config
            .backend_url
            .as_deref()
            .map(|url| Self::new(url, config.id_token.clone()))
    }

    pub async fn fetch_user_data(&self, uid: &str) -> Result<UserData> {
        let url = format!("{}/api/user/{}", self.base_url, uid);
        let mut request = self.client.get(&url);
        if let Some(token) = &self.id_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Profile request failed ({}): {}", status, body));
        }
        Ok(response.json::<UserData>().await?)
    }

    async fn post_chat(&self, request: &ChatRequest) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let timer = Telemetry::new();
        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();
        let text = response.text().await?;
        tracing::debug!(status = %status, elapsed_ms = timer.elapsed_ms(), "backend /api/chat");
        if !status.is_success() {
            return Err(anyhow::anyhow!("Chat relay error ({}): {}", status, text));
        }
        let envelope: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
        Ok(extract_reply_text(&envelope))
    }
}

impl ChatGateway for BackendClient {
    async fn send_chat(&self, request: &ChatRequest) -> Result<String> {
        self.post_chat(request).await
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            history: Vec::new(),
            message: prompt.to_string(),
            system_instruction: RELAY_INSTRUCTION.to_string(),
        };
        self.post_chat(&request).await
    }
}
