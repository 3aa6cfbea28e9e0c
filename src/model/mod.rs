use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::Config;
use crate::web::models::{Message, Role};

pub const MODEL: &str = "gpt-4.1-mini";
pub const TEMPERATURE: f64 = 0.7;
pub const MAX_TOKENS: u32 = 500;

pub const PERSONA: &str = "당신은 사용자의 고민을 들어주고 공감해주는 상담 챗봇입니다. 사용자에게 친절하고 따뜻하게 응답해주세요.";

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("request to completion service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("completion service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("completion service returned an undecodable body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("completion service returned no completion text")]
    EmptyCompletion,
}

/// Anything that can turn an ordered message list into a reply.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError>;
}

/// Persona first, then the caller's history untouched, then the new user turn.
pub fn compose_messages(history: &[Message], message: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::new(Role::System, PERSONA));
    messages.extend(history.iter().cloned());
    messages.push(Message::new(Role::User, message));
    messages
}

// A wrapper for the OpenAI chat completions API
pub struct OpenAiModel {
    url: String,
    api_key: String,
    client: Client,
}

impl OpenAiModel {
    pub fn new(config: &Config) -> Self {
        let url = format!("{}/chat/completions", config.base_url);
        info!("Using completion endpoint at: {}", url);

        Self {
            url,
            api_key: config.api_key.clone(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl CompletionService for OpenAiModel {
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError> {
        let payload = json!({
            "model": MODEL,
            "messages": messages,
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS
        });

        info!("Sending {} messages to {}", messages.len(), MODEL);
        debug!("Payload: {}", payload);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let response_json: Value = serde_json::from_slice(&bytes)?;
        debug!("Response JSON: {}", response_json);

        let content = response_json
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .ok_or(CompletionError::EmptyCompletion)?;

        info!("Response length: {} characters", content.len());
        Ok(content.to_string())
    }
}
