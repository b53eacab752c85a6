//! Completion gateway
//!
//! Boundary to the hosted chat model. Without a credential it runs in demo
//! mode and answers deterministically without touching the network. Upstream
//! failures are returned as `CompletionResult::Failure`, never propagated.

use log::{info, warn};

use super::openai::OpenAiClient;
use super::results::CompletionResult;
use crate::catalog::Product;
use crate::config::CompletionConfig;
use crate::error::CompletionError;

pub enum CompletionGateway {
    Demo,
    Remote(OpenAiClient),
}

impl CompletionGateway {
    pub fn from_config(config: &CompletionConfig) -> Result<Self, CompletionError> {
        match config.api_key.as_deref() {
            Some(key) => {
                let client = OpenAiClient::new(config, key)?;
                info!(
                    "Completion gateway using {} at {}",
                    client.model(),
                    config.api_base
                );
                Ok(CompletionGateway::Remote(client))
            }
            None => {
                warn!("No API key configured, completion gateway running in demo mode");
                Ok(CompletionGateway::Demo)
            }
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, CompletionGateway::Demo)
    }

    pub async fn complete(
        &self,
        system_prompt: &str,
        message: &str,
        context: &[&Product],
    ) -> CompletionResult {
        match self {
            CompletionGateway::Demo => CompletionResult::Success(demo_reply(message, context)),
            CompletionGateway::Remote(client) => {
                match client.complete(system_prompt, message, context).await {
                    Ok(text) => CompletionResult::Success(text),
                    Err(e) => {
                        warn!("Completion request failed: {}", e);
                        CompletionResult::Failure(e.to_string())
                    }
                }
            }
        }
    }
}

/// Canned reply used in demo mode
pub fn demo_reply(message: &str, context: &[&Product]) -> String {
    let items = if context.is_empty() {
        "no matching items".to_string()
    } else {
        context
            .iter()
            .map(|product| product.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!("(demo) You asked: “{}”. Relevant items: {}.", message, items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_reply_without_context() {
        assert_eq!(
            demo_reply("hello", &[]),
            "(demo) You asked: “hello”. Relevant items: no matching items."
        );
    }

    #[test]
    fn demo_reply_lists_context_names() {
        let rice = Product::new("Rice", 15000, 10, "food,grain");
        let sugar = Product::new("Sugar", 12000, 5, "food");
        assert_eq!(
            demo_reply("food?", &[&rice, &sugar]),
            "(demo) You asked: “food?”. Relevant items: Rice, Sugar."
        );
    }

    #[test]
    fn missing_key_selects_demo_mode() {
        let gateway = CompletionGateway::from_config(&CompletionConfig::default()).unwrap();
        assert!(gateway.is_demo());
    }

    #[tokio::test]
    async fn unreachable_upstream_becomes_failure() {
        // Reserve a port, then free it so nothing is listening there
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = CompletionConfig {
            api_base: format!("http://{}", addr),
            api_key: Some("test-key".to_string()),
            ..CompletionConfig::default()
        };
        let gateway = CompletionGateway::from_config(&config).unwrap();
        assert!(!gateway.is_demo());

        let result = gateway.complete("sys", "hello", &[]).await;
        assert!(matches!(result, CompletionResult::Failure(_)));
        assert!(result.into_reply().starts_with("Sorry"));
    }
}
