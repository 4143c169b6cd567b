//! OpenAI chat-completions client
//!
//! Implements [`GenerationService`]: one POST to `{base_url}/chat/completions`
//! per request, returning the content of the first choice.

use async_trait::async_trait;
use pcl_core::config::Config;
use pcl_core::{ChatMessage, GenerationRequest, GenerationService, PclError, Result, Service};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{endpoint, status_error, transport};

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl From<&Config> for OpenAiConfig {
    fn from(cfg: &Config) -> Self {
        OpenAiConfig {
            base_url: cfg.openai_base_url.clone(),
            api_key: cfg.openai_api_key.clone(),
            model: cfg.openai_model.clone(),
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    seed: i64,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiClient {
    config: OpenAiConfig,
    http_client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("pcl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(transport(Service::Generation))?;

        Ok(OpenAiClient {
            config,
            http_client,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl GenerationService for OpenAiClient {
    async fn complete(&self, request: &GenerationRequest) -> Result<String> {
        let url = endpoint(&self.config.base_url, "/chat/completions");
        let body = ChatCompletionBody {
            model: &self.config.model,
            messages: request.messages(),
            seed: request.seed(),
        };

        debug!(url = %url, model = %self.config.model, "sending chat completion");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport(Service::Generation))?;

        if !response.status().is_success() {
            return Err(status_error(Service::Generation, response).await);
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(transport(Service::Generation))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| PclError::Transport {
                service: Service::Generation,
                message: "response contained no choices".to_string(),
            })
    }
}
