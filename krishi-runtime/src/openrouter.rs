//! OpenRouter-backed implementations: the per-model chat backend used by the
//! fallback chain, and the vision crop classifier.

use async_trait::async_trait;
use krishi_core::text::normalize_crop_label;
use krishi_engine::fallback::ModelChatProvider;
use krishi_engine::traits::{ChatTurn, CropClassifier, Role};
use krishi_providers::chat::ChatMessage;
use krishi_providers::openrouter::OpenRouterConfig;
use krishi_providers::{openrouter, parse, runtime};

/// Free-tier candidates tried in order by the fallback chain.
pub const DEFAULT_FALLBACK_MODELS: [&str; 3] = [
    "meta-llama/llama-3.3-70b-instruct:free",
    "google/gemma-3-27b-it:free",
    "mistralai/mistral-small-3.1-24b-instruct:free",
];

pub fn default_fallback_models() -> Vec<String> {
    DEFAULT_FALLBACK_MODELS.iter().map(|m| m.to_string()).collect()
}

#[derive(Debug, Clone)]
pub struct OpenRouterChatProvider {
    cfg: OpenRouterConfig,
}

impl OpenRouterChatProvider {
    pub fn new(cfg: OpenRouterConfig) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl ModelChatProvider for OpenRouterChatProvider {
    async fn complete_with_model(
        &self,
        model: &str,
        system_prompt: &str,
        history: &[ChatTurn],
    ) -> anyhow::Result<String> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(system_prompt));
        for turn in history {
            messages.push(match turn.role {
                Role::User => ChatMessage::user(turn.content.clone()),
                Role::Assistant => ChatMessage::assistant(turn.content.clone()),
            });
        }

        let req = openrouter::build_chat_request(&self.cfg, model, &messages);
        let resp = runtime::execute(&req).await?;
        anyhow::ensure!(resp.is_success(), "chat returned status {}", resp.status);
        parse::parse_chat_completion(&resp.body)
    }
}

#[derive(Debug, Clone)]
pub struct OpenRouterVision {
    cfg: OpenRouterConfig,
}

impl OpenRouterVision {
    pub fn new(cfg: OpenRouterConfig) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl CropClassifier for OpenRouterVision {
    async fn classify(&self, image_base64: &str) -> anyhow::Result<Option<String>> {
        let req = openrouter::build_vision_request(&self.cfg, image_base64);
        let resp = runtime::execute(&req).await?;
        anyhow::ensure!(resp.is_success(), "vision returned status {}", resp.status);
        let answer = parse::parse_chat_completion(&resp.body)?;
        // The model is told to answer in one word; anything unusable
        // normalizes away to None.
        Ok(normalize_crop_label(&answer))
    }
}
