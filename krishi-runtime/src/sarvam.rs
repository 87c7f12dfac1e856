//! Sarvam-backed implementations of the engine's provider traits.

use async_trait::async_trait;
use krishi_engine::traits::{
    AudioClip, ChatProvider, ChatTurn, Role, SpeechSynthesizer, SpokenAudio, Transcriber,
    TranslationProvider,
};
use krishi_providers::chat::ChatMessage;
use krishi_providers::sarvam::{AudioFile, SarvamConfig};
use krishi_providers::{parse, runtime, sarvam};
use std::time::Duration;

/// Conversational replies should stay close to the prompt's rules, so the
/// temperature is kept low.
const CHAT_TEMPERATURE: f32 = 0.2;

fn to_messages(system_prompt: &str, history: &[ChatTurn]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage::system(system_prompt));
    for turn in history {
        messages.push(match turn.role {
            Role::User => ChatMessage::user(turn.content.clone()),
            Role::Assistant => ChatMessage::assistant(turn.content.clone()),
        });
    }
    messages
}

#[derive(Debug, Clone)]
pub struct SarvamChatProvider {
    cfg: SarvamConfig,
}

impl SarvamChatProvider {
    pub fn new(cfg: SarvamConfig) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl ChatProvider for SarvamChatProvider {
    async fn complete(&self, system_prompt: &str, history: &[ChatTurn]) -> anyhow::Result<String> {
        let messages = to_messages(system_prompt, history);
        let req = sarvam::build_chat_request(&self.cfg, &messages, CHAT_TEMPERATURE);
        let resp = runtime::execute(&req).await?;
        anyhow::ensure!(resp.is_success(), "chat returned status {}", resp.status);
        parse::parse_chat_completion(&resp.body)
    }
}

#[derive(Debug, Clone)]
pub struct SarvamTranslationProvider {
    cfg: SarvamConfig,
}

impl SarvamTranslationProvider {
    pub fn new(cfg: SarvamConfig) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl TranslationProvider for SarvamTranslationProvider {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> anyhow::Result<String> {
        let req = sarvam::build_translate_request(&self.cfg, text, source_language, target_language);
        let resp = runtime::execute(&req).await?;
        anyhow::ensure!(resp.is_success(), "translate returned status {}", resp.status);
        parse::parse_translation(&resp.body)
    }
}

#[derive(Debug, Clone)]
pub struct SarvamTtsProvider {
    cfg: SarvamConfig,
}

impl SarvamTtsProvider {
    pub fn new(cfg: SarvamConfig) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl SpeechSynthesizer for SarvamTtsProvider {
    async fn synthesize(&self, text: &str, language: &str) -> anyhow::Result<SpokenAudio> {
        let req = sarvam::build_tts_request(&self.cfg, text, language);
        let resp = runtime::execute(&req).await?;
        anyhow::ensure!(resp.is_success(), "tts returned status {}", resp.status);
        let bytes = parse::parse_tts_audio(&resp.body)?;
        Ok(SpokenAudio { mime_type: "audio/mpeg".into(), bytes })
    }
}

fn to_audio_file(audio: &AudioClip) -> AudioFile {
    AudioFile {
        filename: "capture.wav".into(),
        mime_type: audio.mime_type.clone(),
        bytes: audio.bytes.clone(),
    }
}

/// Immediate (synchronous-response) speech-to-text.
#[derive(Debug, Clone)]
pub struct SarvamSttProvider {
    cfg: SarvamConfig,
}

impl SarvamSttProvider {
    pub fn new(cfg: SarvamConfig) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl Transcriber for SarvamSttProvider {
    async fn transcribe(
        &self,
        audio: &AudioClip,
        language: &str,
    ) -> anyhow::Result<Option<String>> {
        let req = sarvam::build_stt_request(&self.cfg, &to_audio_file(audio), Some(language));
        let resp = runtime::execute(&req).await?;
        anyhow::ensure!(resp.is_success(), "stt returned status {}", resp.status);
        parse::parse_transcript(&resp.body)
    }
}

/// Batch-job speech-to-text: submit, then poll the job status until it
/// completes or the poll budget runs out. Meant for long recordings where
/// the immediate endpoint times out.
#[derive(Debug, Clone)]
pub struct SarvamBatchSttProvider {
    cfg: SarvamConfig,
    poll_interval: Duration,
    max_polls: u32,
}

impl SarvamBatchSttProvider {
    pub fn new(cfg: SarvamConfig) -> Self {
        Self { cfg, poll_interval: Duration::from_secs(2), max_polls: 30 }
    }

    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }
}

#[async_trait]
impl Transcriber for SarvamBatchSttProvider {
    async fn transcribe(
        &self,
        audio: &AudioClip,
        language: &str,
    ) -> anyhow::Result<Option<String>> {
        let submit =
            sarvam::build_stt_job_submit_request(&self.cfg, &to_audio_file(audio), Some(language));
        let resp = runtime::execute(&submit).await?;
        anyhow::ensure!(resp.is_success(), "stt job submit returned status {}", resp.status);
        let job_id = parse::parse_stt_job_submit(&resp.body)?;

        for _ in 0..self.max_polls {
            tokio::time::sleep(self.poll_interval).await;

            let status_req = sarvam::build_stt_job_status_request(&self.cfg, &job_id);
            let resp = runtime::execute(&status_req).await?;
            anyhow::ensure!(
                resp.is_success(),
                "stt job status returned status {}",
                resp.status
            );
            match parse::parse_stt_job_status(&resp.body)? {
                parse::JobStatus::Completed { transcript } => return Ok(transcript),
                parse::JobStatus::Failed { message } => {
                    let reason = message.unwrap_or_else(|| "no reason given".into());
                    anyhow::bail!("stt job {job_id} failed: {reason}")
                }
                parse::JobStatus::Pending => {}
            }
        }

        anyhow::bail!("stt job {job_id} did not complete within the poll budget")
    }
}
