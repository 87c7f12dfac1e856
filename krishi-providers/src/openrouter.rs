//! Request builders for OpenRouter: multi-model text chat and the vision
//! crop-identification call.

use crate::chat::{ChatMessage, join_url};
use crate::request::{Body, HttpRequest};
use serde_json::json;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

pub const VISION_MODEL: &str = "nvidia/nemotron-nano-12b-v2-vl:free";

/// The model is instructed to answer with a bare crop name; anything longer
/// is treated as noise by the caller.
pub const CROP_INSTRUCTION: &str = "Identify the primary crop in this image. \
    Return ONLY the name of the crop (e.g., Rice, Wheat, Sugarcane) in one word.";

#[derive(Clone, PartialEq, Eq)]
pub struct OpenRouterConfig {
    pub base_url: String,
    pub api_key: String,
}

impl OpenRouterConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("Content-Type".into(), "application/json".into()),
            ("Authorization".into(), format!("Bearer {}", self.api_key)),
        ]
    }
}

impl std::fmt::Debug for OpenRouterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

pub fn build_chat_request(
    cfg: &OpenRouterConfig,
    model: &str,
    messages: &[ChatMessage],
) -> HttpRequest {
    let payload = json!({
        "model": model,
        "messages": messages
            .iter()
            .map(|m| json!({"role": m.role, "content": m.content}))
            .collect::<Vec<_>>(),
    });

    HttpRequest {
        method: "POST".into(),
        url: join_url(&cfg.base_url, "/chat/completions"),
        headers: cfg.headers(),
        body: Body::Json(payload.to_string()),
    }
}

/// Builds the vision request: one user message carrying the instruction and
/// the image as a base64 data URL.
pub fn build_vision_request(cfg: &OpenRouterConfig, image_base64: &str) -> HttpRequest {
    let payload = json!({
        "model": VISION_MODEL,
        "messages": [{
            "role": "user",
            "content": [
                {"type": "text", "text": CROP_INSTRUCTION},
                {
                    "type": "image_url",
                    "image_url": {
                        "url": format!("data:image/jpeg;base64,{image_base64}")
                    }
                }
            ]
        }],
    });

    HttpRequest {
        method: "POST".into(),
        url: join_url(&cfg.base_url, "/chat/completions"),
        headers: cfg.headers(),
        body: Body::Json(payload.to_string()),
    }
}
