//! The wire-level request handed from the builders to the executor.
//!
//! Builders stay pure (no I/O) by producing this value; only
//! [`crate::runtime::execute`] touches the network.

use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Body {
    Empty,
    Json(String),
    MultipartFormData { boundary: String, bytes: Vec<u8> },
}

/// Header names whose values must never reach logs. Covers Bearer auth,
/// Sarvam's subscription header, and any provider-specific `*api-key`
/// variant.
fn is_sensitive_header(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower == "authorization" || lower == "api-subscription-key" || lower.contains("api-key")
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Safe to log: credential headers are redacted and bodies are summarized
/// by length rather than printed.
impl std::fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(k, v)| {
                let v = if is_sensitive_header(k) { "[REDACTED]" } else { v.as_str() };
                (k.as_str(), v)
            })
            .collect();

        let body = match &self.body {
            Body::Empty => "Empty".to_string(),
            Body::Json(s) => format!("Json(len={})", s.len()),
            Body::MultipartFormData { boundary, bytes } => {
                format!("MultipartFormData(boundary={boundary}, bytes_len={})", bytes.len())
            }
        };

        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &headers)
            .field("body", &body)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(headers: Vec<(String, String)>) -> HttpRequest {
        HttpRequest {
            method: "POST".into(),
            url: "https://api.sarvam.ai/translate".into(),
            headers,
            body: Body::Json("{}".into()),
        }
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = sample(vec![("Content-Type".into(), "application/json".into())]);
        assert_eq!(req.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(req.header("accept"), None);
    }

    #[test]
    fn credential_headers_are_sensitive() {
        assert!(is_sensitive_header("Authorization"));
        assert!(is_sensitive_header("api-subscription-key"));
        assert!(is_sensitive_header("X-Api-Key"));
        assert!(!is_sensitive_header("Content-Type"));
    }

    #[test]
    fn debug_output_never_leaks_keys() {
        let req = sample(vec![
            ("api-subscription-key".into(), "sk_krishi_live_1".into()),
            ("Authorization".into(), "Bearer sk-or-v1-abc".into()),
            ("Accept".into(), "application/json".into()),
        ]);

        let rendered = format!("{req:?}");
        assert!(!rendered.contains("sk_krishi_live_1"));
        assert!(!rendered.contains("sk-or-v1-abc"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(rendered.contains("application/json"));
    }
}
