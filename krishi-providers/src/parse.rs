//! Tolerant response decoders.
//!
//! The hosted providers do not contractually guarantee their response
//! shapes, so each decoder tries a prioritized list of known field names
//! over untyped JSON and reports an "unrecognized shape" error instead of
//! failing on a strict struct.

use anyhow::{Context, anyhow};
use base64::Engine;
use serde_json::Value;

/// `choices[0].message.content`, the shape shared by Sarvam chat and
/// OpenRouter.
pub fn parse_chat_completion(body: &[u8]) -> anyhow::Result<String> {
    let v: Value = serde_json::from_slice(body).context("decode chat completion JSON")?;
    v.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("unrecognized chat completion shape"))
}

/// Known translation fields, in priority order.
pub fn parse_translation(body: &[u8]) -> anyhow::Result<String> {
    let v: Value = serde_json::from_slice(body).context("decode translation JSON")?;
    first_string(&v, &["translated_text", "output", "text"])
        .ok_or_else(|| anyhow!("unrecognized translation shape"))
}

/// Known audio fields, in priority order; values are base64-encoded.
pub fn parse_tts_audio(body: &[u8]) -> anyhow::Result<Vec<u8>> {
    let v: Value = serde_json::from_slice(body).context("decode TTS JSON")?;
    let encoded = v
        .pointer("/audios/0")
        .and_then(Value::as_str)
        .or_else(|| v.get("audio").and_then(Value::as_str))
        .or_else(|| v.get("audio_content").and_then(Value::as_str))
        .ok_or_else(|| anyhow!("unrecognized TTS shape"))?;

    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .context("decode TTS audio base64")
}

/// Known transcript fields, in priority order.
///
/// `Ok(None)` means the response was valid JSON but carried no recognized
/// transcript field; callers must treat that as "nothing heard", not a
/// hard failure.
pub fn parse_transcript(body: &[u8]) -> anyhow::Result<Option<String>> {
    let v: Value = serde_json::from_slice(body).context("decode transcript JSON")?;
    Ok(first_string(&v, &["transcript", "text"])
        .or_else(|| {
            v.pointer("/data/transcript")
                .and_then(Value::as_str)
                .map(str::to_string)
        }))
}

/// Known job-id fields of the batch submit response, in priority order.
pub fn parse_stt_job_submit(body: &[u8]) -> anyhow::Result<String> {
    let v: Value = serde_json::from_slice(body).context("decode job submit JSON")?;
    first_string(&v, &["job_id", "id"])
        .or_else(|| {
            v.pointer("/data/job_id")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .ok_or_else(|| anyhow!("unrecognized job submit shape"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Completed { transcript: Option<String> },
    Failed { message: Option<String> },
}

/// Batch job status. Unknown status strings are treated as still pending so
/// the poll loop keeps going until its attempt budget runs out.
pub fn parse_stt_job_status(body: &[u8]) -> anyhow::Result<JobStatus> {
    let v: Value = serde_json::from_slice(body).context("decode job status JSON")?;
    let status = first_string(&v, &["status", "state"])
        .ok_or_else(|| anyhow!("unrecognized job status shape"))?
        .to_lowercase();

    if status.contains("complet") || status.contains("success") {
        let transcript = first_string(&v, &["transcript", "text"]).or_else(|| {
            v.pointer("/output/transcript")
                .and_then(Value::as_str)
                .map(str::to_string)
        });
        return Ok(JobStatus::Completed { transcript });
    }

    if status.contains("fail") || status.contains("error") {
        let message = first_string(&v, &["message", "error"]);
        return Ok(JobStatus::Failed { message });
    }

    Ok(JobStatus::Pending)
}

fn first_string(v: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| v.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}
