use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn data_fragment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<data>(.*?)</data>").expect("valid data fragment regex"))
}

/// Result of scanning a chat response for an embedded profile update.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedResponse {
    /// Parsed update from the first `<data>...</data>` fragment, if the
    /// fragment was present and valid JSON. Parse failures yield `None`.
    pub update: Option<Value>,
    /// The response with every fragment removed and whitespace trimmed.
    /// This is what gets displayed and spoken; the user never hears the
    /// structured payload.
    pub speech_text: String,
}

/// Scans `text` for a delimited structured-data fragment.
///
/// Only the first fragment is parsed; all fragments are stripped from the
/// returned speech text. A fragment that fails to parse is ignored without
/// error, matching the tolerant contract of the conversational loop.
pub fn extract_data_fragment(text: &str) -> ExtractedResponse {
    let update = data_fragment_re()
        .captures(text)
        .and_then(|c| serde_json::from_str(c.get(1).map_or("", |m| m.as_str())).ok());

    let speech_text = data_fragment_re().replace_all(text, "").trim().to_string();

    ExtractedResponse { update, speech_text }
}
