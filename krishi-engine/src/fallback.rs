//! Multi-model chat fallback.
//!
//! Some free-tier chat models intermittently reject requests (authorization
//! errors on exhausted quotas) or answer with empty content. The fallback
//! walks an ordered candidate list and returns the first usable response;
//! earlier failures stay internal. Only total exhaustion surfaces an error.

use crate::traits::ChatTurn;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// A chat backend that can be pointed at a specific model per call.
#[async_trait]
pub trait ModelChatProvider: Send + Sync {
    async fn complete_with_model(
        &self,
        model: &str,
        system_prompt: &str,
        history: &[ChatTurn],
    ) -> anyhow::Result<String>;
}

#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("all candidate models failed: {0}")]
    Exhausted(String),
}

pub struct ChatFallback {
    models: Vec<String>,
    provider: Arc<dyn ModelChatProvider>,
}

impl ChatFallback {
    pub fn new(models: Vec<String>, provider: Arc<dyn ModelChatProvider>) -> Self {
        Self { models, provider }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Tries each candidate in order. A candidate is skipped when it errors
    /// (authorization failures included) or returns empty content; the first
    /// non-empty response wins and prior failures are not reported.
    pub async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
    ) -> Result<String, FallbackError> {
        let mut attempts: Vec<String> = Vec::new();

        for model in &self.models {
            match self
                .provider
                .complete_with_model(model, system_prompt, history)
                .await
            {
                Ok(content) if !content.trim().is_empty() => {
                    if !attempts.is_empty() {
                        log::info!(
                            "chat fallback recovered via {model} after {} failed candidate(s)",
                            attempts.len()
                        );
                    }
                    return Ok(content);
                }
                Ok(_) => attempts.push(format!("{model}: empty response")),
                Err(e) => attempts.push(format!("{model}: {e:#}")),
            }
        }

        Err(FallbackError::Exhausted(attempts.join("; ")))
    }
}
