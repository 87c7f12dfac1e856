use async_trait::async_trait;
use krishi_core::profile::FarmerProfile;
use serde::{Deserialize, Serialize};

/// A captured audio payload handed to transcription.
///
/// The engine never inspects the bytes; capture and encoding happen at the
/// boundary (browser widget, CLI file read).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Synthesized speech ready for playback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpokenAudio {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One conversational exchange. Assistant turns may still contain the raw
/// structured-data fragment; stripping happens at display/speech time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
    ) -> anyhow::Result<String>;
}

#[async_trait]
pub trait TranslationProvider: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> anyhow::Result<String>;
}

/// Infallible translation surface consumed by the engine and UI code.
///
/// Implementations degrade to the source text on any failure; rendering
/// must never block on translation availability.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate_to(&self, text: &str, target_language: &str) -> String;
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    /// `Ok(None)` means the provider answered but produced no usable
    /// transcript; callers treat it the same as silence.
    async fn transcribe(
        &self,
        audio: &AudioClip,
        language: &str,
    ) -> anyhow::Result<Option<String>>;
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, language: &str) -> anyhow::Result<SpokenAudio>;
}

#[async_trait]
pub trait CropClassifier: Send + Sync {
    /// Classifies a base64-encoded field photo into a single crop label.
    /// `Ok(None)` when the model's answer was unusable.
    async fn classify(&self, image_base64: &str) -> anyhow::Result<Option<String>>;
}

/// Handle to the persisted farmer profile, injected into the engine so the
/// conversational loop can merge extracted data immediately.
pub trait ProfileRepository: Send + Sync {
    /// Never fails: a missing or malformed backing file yields an empty
    /// profile.
    fn load(&self) -> FarmerProfile;
    fn save(&self, profile: &FarmerProfile) -> anyhow::Result<()>;
}
