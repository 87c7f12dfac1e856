//! The voice conversational loop.
//!
//! A linear turn-taking pipeline advanced by discrete external events:
//! audio captured, provider responded. One turn is transcribe → chat →
//! extract structured data → synthesize speech. Fully synchronous per call;
//! there is nothing to cancel.

use crate::traits::{
    AudioClip, ChatProvider, ChatTurn, ProfileRepository, SpeechSynthesizer, Transcriber,
    Translator,
};
use crate::turn::{ConversationState, TurnOutcome, TurnStage, TurnTimings, ms};
use krishi_core::extract::extract_data_fragment;
use std::sync::Arc;
use std::time::Instant;

/// Spoken before any user input on first entry.
pub const GREETING: &str = "Namaste! I am your AI farming assistant. \
    Tell me about your farm — where is it located and what crops do you grow?";

/// Only the most recent turns are forwarded to the model; the profile JSON
/// in the system prompt carries the accumulated state.
const HISTORY_WINDOW: usize = 6;

pub struct ConversationEngine {
    language: String,
    chat: Arc<dyn ChatProvider>,
    translator: Arc<dyn Translator>,
    transcriber: Arc<dyn Transcriber>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    profiles: Arc<dyn ProfileRepository>,

    history: Vec<ChatTurn>,
    turn: u32,
    state: ConversationState,
}

impl ConversationEngine {
    pub fn new(
        language: impl Into<String>,
        chat: Arc<dyn ChatProvider>,
        translator: Arc<dyn Translator>,
        transcriber: Arc<dyn Transcriber>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        profiles: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            language: language.into(),
            chat,
            translator,
            transcriber,
            synthesizer,
            profiles,
            history: Vec::new(),
            turn: 0,
            state: ConversationState::AwaitingGreeting,
        }
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    /// Completed round-trips so far. Callers key their audio-capture widget
    /// on this so a stale capture is never reprocessed.
    pub fn turn_count(&self) -> u32 {
        self.turn
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    /// Clears history and the turn counter; the next entry greets again.
    pub fn reset(&mut self) {
        self.history.clear();
        self.turn = 0;
        self.state = ConversationState::AwaitingGreeting;
    }

    /// Queues the fixed greeting utterance. Idempotent: once the
    /// conversation has started this does nothing.
    pub async fn greet(&mut self) -> TurnOutcome {
        if !self.history.is_empty() {
            self.state = ConversationState::AwaitingUserAudio;
            return TurnOutcome {
                stage: TurnStage::Greeted,
                transcript: None,
                reply_text: None,
                audio: None,
                applied_update: None,
                timings: TurnTimings::default(),
                error: None,
            };
        }

        self.history.push(ChatTurn::assistant(GREETING));

        let spoken = self.translator.translate_to(GREETING, &self.language).await;
        let audio = match self.synthesizer.synthesize(&spoken, &self.language).await {
            Ok(a) => Some(a),
            Err(e) => {
                log::warn!("greeting synthesis failed, continuing without audio: {e:#}");
                None
            }
        };

        self.state = ConversationState::AwaitingUserAudio;
        TurnOutcome {
            stage: TurnStage::Greeted,
            transcript: None,
            reply_text: Some(spoken),
            audio,
            applied_update: None,
            timings: TurnTimings::default(),
            error: None,
        }
    }

    /// Runs one full turn on a fresh audio capture.
    ///
    /// The turn counter advances only on a fully successful round-trip;
    /// recoverable failures (nothing heard, chat unavailable) leave it
    /// unchanged so the caller re-prompts for audio.
    pub async fn run_turn(&mut self, audio: AudioClip) -> TurnOutcome {
        let mut timings = TurnTimings::default();

        // 1) Speech to text.
        self.state = ConversationState::Transcribing;
        let t0 = Instant::now();
        let transcript = match self.transcriber.transcribe(&audio, &self.language).await {
            Ok(Some(text)) if !text.trim().is_empty() => text,
            Ok(_) => {
                self.state = ConversationState::AwaitingUserAudio;
                return TurnOutcome::recoverable(
                    TurnStage::NoSpeech,
                    "Could not hear you. Try again.",
                );
            }
            Err(e) => {
                log::warn!("transcription failed: {e:#}");
                self.state = ConversationState::AwaitingUserAudio;
                return TurnOutcome::recoverable(
                    TurnStage::NoSpeech,
                    "Could not hear you. Try again.",
                );
            }
        };
        timings.transcription_ms = Some(ms(t0.elapsed()));

        self.history.push(ChatTurn::user(transcript.clone()));

        // 2) Chat completion over the profile-aware system prompt.
        self.state = ConversationState::GeneratingResponse;
        let mut profile = self.profiles.load();
        let system_prompt = build_system_prompt(
            &serde_json::to_string(&profile).unwrap_or_else(|_| "{}".into()),
        );

        let window_start = self.history.len().saturating_sub(HISTORY_WINDOW);
        let c0 = Instant::now();
        let reply = match self.chat.complete(&system_prompt, &self.history[window_start..]).await
        {
            Ok(r) if !r.trim().is_empty() => r,
            Ok(_) => {
                self.state = ConversationState::AwaitingUserAudio;
                let mut out =
                    TurnOutcome::recoverable(TurnStage::ChatFailed, "AI failed to respond");
                out.transcript = Some(transcript);
                out.timings = timings;
                return out;
            }
            Err(e) => {
                log::warn!("chat completion failed: {e:#}");
                self.state = ConversationState::AwaitingUserAudio;
                let mut out =
                    TurnOutcome::recoverable(TurnStage::ChatFailed, "AI failed to respond");
                out.transcript = Some(transcript);
                out.timings = timings;
                return out;
            }
        };
        timings.chat_ms = Some(ms(c0.elapsed()));

        // 3) Extract structured data and persist it immediately. A fragment
        // that fails to parse is ignored; the conversation continues.
        self.state = ConversationState::ExtractingData;
        let extracted = extract_data_fragment(&reply);
        if let Some(update) = &extracted.update {
            profile.merge_update(update);
            if let Err(e) = self.profiles.save(&profile) {
                log::warn!("profile save failed after conversational update: {e:#}");
            }
        }

        self.history.push(ChatTurn::assistant(reply.clone()));

        // 4) Speak the fragment-stripped reply in the session language.
        self.state = ConversationState::SynthesizingSpeech;
        let spoken = self
            .translator
            .translate_to(&extracted.speech_text, &self.language)
            .await;
        let s0 = Instant::now();
        let audio_out = match self.synthesizer.synthesize(&spoken, &self.language).await {
            Ok(a) => {
                timings.synthesis_ms = Some(ms(s0.elapsed()));
                Some(a)
            }
            Err(e) => {
                log::warn!("speech synthesis failed, reply will be text-only: {e:#}");
                None
            }
        };

        self.turn += 1;
        self.state = ConversationState::AwaitingUserAudio;

        TurnOutcome {
            stage: TurnStage::Done,
            transcript: Some(transcript),
            reply_text: Some(spoken),
            audio: audio_out,
            applied_update: extracted.update,
            timings,
            error: None,
        }
    }
}

fn build_system_prompt(profile_json: &str) -> String {
    format!(
        "You are a friendly Indian agricultural advisor bot.\n\
         Collect farm profile details via conversation.\n\
         \n\
         Current known data:\n\
         {profile_json}\n\
         \n\
         Rules:\n\
         \u{2022} Ask ONE question at a time\n\
         \u{2022} If new data found, append JSON inside <data></data>\n\
         \u{2022} Be warm, simple, farmer-friendly\n\
         \n\
         Required fields:\n\
         location, crop, field_size (acres), burned (Yes/No), equipment (list)"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_embeds_profile_json() {
        let p = build_system_prompt(r#"{"crop":"Rice"}"#);
        assert!(p.contains(r#"{"crop":"Rice"}"#));
        assert!(p.contains("<data></data>"));
        assert!(p.contains("ONE question"));
    }
}
