use domain::gateway::{ChatGateway, ChatRequest};
use shared::types::Result;

use crate::backend_client::BackendClient;
use crate::config::Config;
use crate::gemini_client::GeminiClient;

/// The configured transport: backend relay when `VITE_BACKEND_URL` is set,
/// otherwise Gemini directly.
#[derive(Clone)]
pub enum AiGateway {
    Direct(GeminiClient),
    Relay(BackendClient),
}

impl AiGateway {
    pub fn from_config(config: &Config) -> Result<Self> {
        if let Some(backend) = BackendClient::from_config(config) {
            tracing::info!("using backend chat relay");
            return Ok(Self::Relay(backend));
        }
        Ok(Self::Direct(GeminiClient::from_config(config)?))
    }
}

impl ChatGateway for AiGateway {
    async fn send_chat(&self, request: &ChatRequest) -> Result<String> {
        match self {
            Self::Direct(client) => client.send_chat(request).await,
            Self::Relay(client) => client.send_chat(request).await,
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        match self {
            Self::Direct(client) => client.generate(prompt).await,
            Self::Relay(client) => client.generate(prompt).await,
        }
    }
}
