//! Request builders for the Sarvam hosted AI endpoints: chat completion,
//! translation, text-to-speech, and speech-to-text (immediate and batch-job).

use crate::chat::{ChatMessage, join_url};
use crate::request::{Body, HttpRequest};
use serde_json::json;

pub const DEFAULT_BASE_URL: &str = "https://api.sarvam.ai";

pub const CHAT_MODEL: &str = "sarvam-m";
pub const TRANSLATE_MODEL: &str = "mayura:v1";
pub const TTS_MODEL: &str = "bulbul:v1";
pub const TTS_SPEAKER: &str = "amrit";
pub const STT_MODEL: &str = "saaras:v3";

#[derive(Clone, PartialEq, Eq)]
pub struct SarvamConfig {
    pub base_url: String,
    pub api_key: String,
}

impl SarvamConfig {
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

    fn json_headers(&self) -> Vec<(String, String)> {
        vec![
            ("Content-Type".into(), "application/json".into()),
            ("api-subscription-key".into(), self.api_key.clone()),
        ]
    }
}

impl std::fmt::Debug for SarvamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SarvamConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

pub fn build_chat_request(
    cfg: &SarvamConfig,
    messages: &[ChatMessage],
    temperature: f32,
) -> HttpRequest {
    let payload = json!({
        "model": CHAT_MODEL,
        "messages": messages
            .iter()
            .map(|m| json!({"role": m.role, "content": m.content}))
            .collect::<Vec<_>>(),
        "temperature": temperature,
    });

    HttpRequest {
        method: "POST".into(),
        url: join_url(&cfg.base_url, "/v1/chat/completions"),
        headers: cfg.json_headers(),
        body: Body::Json(payload.to_string()),
    }
}

pub fn build_translate_request(
    cfg: &SarvamConfig,
    text: &str,
    source_language: &str,
    target_language: &str,
) -> HttpRequest {
    let payload = json!({
        "input": text,
        "source_language_code": source_language,
        "target_language_code": target_language,
        "speaker_gender": "Male",
        "mode": "formal",
        "model": TRANSLATE_MODEL,
        "numerals_format": "native",
    });

    HttpRequest {
        method: "POST".into(),
        url: join_url(&cfg.base_url, "/translate"),
        headers: cfg.json_headers(),
        body: Body::Json(payload.to_string()),
    }
}

pub fn build_tts_request(cfg: &SarvamConfig, text: &str, language_code: &str) -> HttpRequest {
    let payload = json!({
        "text": text,
        "target_language_code": language_code,
        "model": TTS_MODEL,
        "speaker": TTS_SPEAKER,
    });

    HttpRequest {
        method: "POST".into(),
        url: join_url(&cfg.base_url, "/text-to-speech"),
        headers: cfg.json_headers(),
        body: Body::Json(payload.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Immediate transcription. `language_code: None` asks the model to
/// auto-detect.
pub fn build_stt_request(
    cfg: &SarvamConfig,
    audio: &AudioFile,
    language_code: Option<&str>,
) -> HttpRequest {
    build_stt_multipart(cfg, audio, language_code, "/speech-to-text")
}

/// Submits audio to the asynchronous transcription job endpoint. The caller
/// polls with [`build_stt_job_status_request`] until the job completes.
pub fn build_stt_job_submit_request(
    cfg: &SarvamConfig,
    audio: &AudioFile,
    language_code: Option<&str>,
) -> HttpRequest {
    build_stt_multipart(cfg, audio, language_code, "/speech-to-text/job")
}

pub fn build_stt_job_status_request(cfg: &SarvamConfig, job_id: &str) -> HttpRequest {
    HttpRequest {
        method: "GET".into(),
        url: join_url(&cfg.base_url, &format!("/speech-to-text/job/{job_id}/status")),
        headers: vec![
            ("Accept".into(), "application/json".into()),
            ("api-subscription-key".into(), cfg.api_key.clone()),
        ],
        body: Body::Empty,
    }
}

fn build_stt_multipart(
    cfg: &SarvamConfig,
    audio: &AudioFile,
    language_code: Option<&str>,
    path: &str,
) -> HttpRequest {
    let boundary = format!("Boundary-{}", uuid::Uuid::new_v4());

    let mut body: Vec<u8> = Vec::new();
    append_file(
        &mut body,
        &boundary,
        "file",
        &audio.filename,
        &audio.mime_type,
        &audio.bytes,
    );
    append_field(&mut body, &boundary, "model", STT_MODEL);
    if let Some(lang) = language_code.filter(|s| !s.trim().is_empty()) {
        append_field(&mut body, &boundary, "language_code", lang);
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    HttpRequest {
        method: "POST".into(),
        url: join_url(&cfg.base_url, path),
        headers: vec![
            (
                "Content-Type".into(),
                format!("multipart/form-data; boundary={}", boundary),
            ),
            ("Accept".into(), "application/json".into()),
            ("api-subscription-key".into(), cfg.api_key.clone()),
        ],
        body: Body::MultipartFormData { boundary, bytes: body },
    }
}

fn append_field(body: &mut Vec<u8>, boundary: &str, name: &str, value: &str) {
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
    );
    body.extend_from_slice(value.as_bytes());
    body.extend_from_slice(b"\r\n");
}

fn append_file(
    body: &mut Vec<u8>,
    boundary: &str,
    name: &str,
    filename: &str,
    mime_type: &str,
    bytes: &[u8],
) {
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            name, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> SarvamConfig {
        SarvamConfig::new("k")
    }

    #[test]
    fn chat_request_carries_subscription_key() {
        let req = build_chat_request(&cfg(), &[ChatMessage::user("hi")], 0.2);
        assert_eq!(req.method, "POST");
        assert!(req.url.ends_with("/v1/chat/completions"));
        assert_eq!(req.header("api-subscription-key"), Some("k"));
        match req.body {
            Body::Json(s) => {
                assert!(s.contains("\"temperature\":0.2"));
                assert!(s.contains("sarvam-m"));
            }
            _ => panic!("expected json"),
        }
    }

    #[test]
    fn translate_request_uses_formal_mayura() {
        let req = build_translate_request(&cfg(), "Hello", "en-IN", "hi-IN");
        assert!(req.url.ends_with("/translate"));
        match req.body {
            Body::Json(s) => {
                assert!(s.contains("\"input\":\"Hello\""));
                assert!(s.contains("\"target_language_code\":\"hi-IN\""));
                assert!(s.contains("mayura:v1"));
                assert!(s.contains("\"mode\":\"formal\""));
            }
            _ => panic!("expected json"),
        }
    }

    #[test]
    fn tts_request_selects_bulbul_amrit() {
        let req = build_tts_request(&cfg(), "Namaste", "hi-IN");
        assert!(req.url.ends_with("/text-to-speech"));
        match req.body {
            Body::Json(s) => {
                assert!(s.contains("bulbul:v1"));
                assert!(s.contains("amrit"));
            }
            _ => panic!("expected json"),
        }
    }

    #[test]
    fn stt_multipart_includes_model_and_language() {
        let audio = AudioFile {
            filename: "input.wav".into(),
            mime_type: "audio/wav".into(),
            bytes: vec![1, 2, 3],
        };
        let req = build_stt_request(&cfg(), &audio, Some("hi-IN"));
        assert!(req.url.ends_with("/speech-to-text"));
        assert_eq!(req.header("api-subscription-key"), Some("k"));
        match req.body {
            Body::MultipartFormData { bytes, .. } => {
                let s = String::from_utf8_lossy(&bytes);
                assert!(s.contains("name=\"model\""));
                assert!(s.contains("saaras:v3"));
                assert!(s.contains("name=\"language_code\""));
                assert!(s.contains("hi-IN"));
                assert!(s.contains("filename=\"input.wav\""));
            }
            _ => panic!("expected multipart"),
        }
    }

    #[test]
    fn stt_auto_detect_omits_language_field() {
        let audio = AudioFile {
            filename: "input.wav".into(),
            mime_type: "audio/wav".into(),
            bytes: vec![0],
        };
        let req = build_stt_request(&cfg(), &audio, None);
        match req.body {
            Body::MultipartFormData { bytes, .. } => {
                let s = String::from_utf8_lossy(&bytes);
                assert!(!s.contains("language_code"));
            }
            _ => panic!("expected multipart"),
        }
    }

    #[test]
    fn job_status_request_targets_job_id() {
        let req = build_stt_job_status_request(&cfg(), "job-42");
        assert_eq!(req.method, "GET");
        assert!(req.url.ends_with("/speech-to-text/job/job-42/status"));
        assert_eq!(req.body, Body::Empty);
    }
}
