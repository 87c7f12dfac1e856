use crate::traits::SpokenAudio;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Where the conversational loop currently sits between interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationState {
    AwaitingGreeting,
    AwaitingUserAudio,
    Transcribing,
    GeneratingResponse,
    ExtractingData,
    SynthesizingSpeech,
}

/// Terminal classification of a single turn attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnStage {
    /// The greeting was queued; no user input was consumed.
    Greeted,
    /// Full round-trip: transcript, reply, extraction, speech.
    Done,
    /// Transcription produced nothing usable; the turn did not advance.
    NoSpeech,
    /// The chat provider failed or returned nothing; user-visible inline
    /// error, turn did not advance.
    ChatFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TurnTimings {
    pub transcription_ms: Option<u64>,
    pub chat_ms: Option<u64>,
    pub synthesis_ms: Option<u64>,
}

/// Everything a caller needs to render one turn: what was heard, what the
/// assistant said (fragment already stripped), the audio to play, and what
/// profile update was applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub stage: TurnStage,
    pub transcript: Option<String>,
    /// Assistant text with the structured-data fragment removed, translated
    /// to the session language.
    pub reply_text: Option<String>,
    pub audio: Option<SpokenAudio>,
    /// The update merged into the profile this turn, if any.
    pub applied_update: Option<Value>,
    pub timings: TurnTimings,
    pub error: Option<String>,
}

impl TurnOutcome {
    pub fn recoverable(stage: TurnStage, error: impl Into<String>) -> Self {
        Self {
            stage,
            transcript: None,
            reply_text: None,
            audio: None,
            applied_update: None,
            timings: TurnTimings::default(),
            error: Some(error.into()),
        }
    }
}

pub fn ms(d: Duration) -> u64 {
    d.as_millis().try_into().unwrap_or(u64::MAX)
}
