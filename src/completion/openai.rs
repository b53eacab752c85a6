//! OpenAI-compatible chat-completions client
//!
//! One POST to `{api_base}/chat/completions` per call, no retries.

use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::config::CompletionConfig;
use crate::error::CompletionError;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiClient {
    client: Client,
    url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiClient {
    pub fn new(config: &CompletionConfig, api_key: &str) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .build()
            .map_err(|e| CompletionError::ClientSetup(e.to_string()))?;

        Ok(Self {
            client,
            url: format!("{}/chat/completions", config.api_base.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the trimmed text of the first choice
    pub async fn complete(
        &self,
        system_prompt: &str,
        message: &str,
        context: &[&Product],
    ) -> Result<String, CompletionError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: build_messages(system_prompt, message, context),
        };

        debug!("POST {} ({} context items)", self.url, context.len());
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<response unavailable>".to_string());
            return Err(CompletionError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(CompletionError::EmptyReply)
    }
}

/// System instruction, catalog context as JSON, then the user's message
fn build_messages(system_prompt: &str, message: &str, context: &[&Product]) -> Vec<ChatMessage> {
    let context_json = serde_json::to_string(context).unwrap_or_else(|_| "[]".to_string());
    vec![
        ChatMessage {
            role: "system",
            content: system_prompt.to_string(),
        },
        ChatMessage {
            role: "system",
            content: format!("Relevant catalog items (JSON): {}", context_json),
        },
        ChatMessage {
            role: "user",
            content: message.to_string(),
        },
    ]
}
