//! LLM Client — the single point of entry for all generation-API calls.
//!
//! ARCHITECTURAL RULE: no other module may talk to the provider directly.
//! The pipeline depends on the [`GenerationBackend`] trait, so tests swap in
//! a scripted backend and the transport can change without touching callers.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::PipelineError;

pub mod extract;
pub mod retry;

use retry::{exponential_secs, retry_with_backoff};

/// Attempt budget for one generation call, first try included.
pub const MAX_ATTEMPTS: u32 = 5;
const REQUEST_TIMEOUT_SECS: u64 = 120;
/// Cap on response-body excerpts carried in error messages.
const EXCERPT_CHARS: usize = 200;

/// Seam between the pipeline and the provider transport.
///
/// `web_search` asks the backend to ground the response with live search
/// results; only the listing stage uses it.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        system: &str,
        web_search: bool,
    ) -> Result<String, PipelineError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Request/response envelope
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: serde_json::Value,
}

impl Tool {
    fn google_search() -> Self {
        Tool {
            google_search: serde_json::json!({}),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate's parts, if any.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("");
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// HTTP transport to the generation endpoint, with bounded exponential
/// backoff. Auth rejections (401/403) are terminal and consume exactly one
/// attempt; everything else retries up to [`MAX_ATTEMPTS`].
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    endpoint: String,
    api_key: String,
    key_in_query: bool,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            endpoint: config.generate_endpoint(),
            api_key: config.gemini_api_key.clone(),
            key_in_query: config.api_key_in_query,
        }
    }

    async fn attempt(&self, body: &GenerateRequest) -> Result<String, PipelineError> {
        let mut request = self.http.post(&self.endpoint);
        request = if self.key_in_query {
            request.query(&[("key", self.api_key.as_str())])
        } else {
            request.header("x-goog-api-key", &self.api_key)
        };

        let response = request.json(body).send().await.map_err(|e| {
            PipelineError::Transport {
                status: None,
                message: self.redact(e.to_string()),
            }
        })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("generation endpoint returned {status}");
            return Err(classify_status(status, &self.redact(body)));
        }

        let body = response.text().await.map_err(|e| PipelineError::Transport {
            status: None,
            message: self.redact(e.to_string()),
        })?;
        let text = extract_envelope_text(&body)?;
        debug!("generation succeeded ({} chars)", text.len());
        Ok(text)
    }

    /// Strips the credential from any text destined for logs or errors.
    fn redact(&self, message: String) -> String {
        if self.api_key.is_empty() {
            message
        } else {
            message.replace(&self.api_key, "[REDACTED]")
        }
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        system: &str,
        web_search: bool,
    ) -> Result<String, PipelineError> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part {
                    text: system.to_string(),
                }],
            }),
            tools: if web_search {
                vec![Tool::google_search()]
            } else {
                Vec::new()
            },
        };

        retry_with_backoff(
            MAX_ATTEMPTS,
            exponential_secs,
            PipelineError::is_retryable,
            || self.attempt(&body),
        )
        .await
    }
}

/// Maps a non-success status to its pipeline error class: 401/403 are
/// terminal credential rejections, everything else is a retryable transport
/// failure carrying a bounded body excerpt. `body` must already be redacted.
fn classify_status(status: StatusCode, body: &str) -> PipelineError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        PipelineError::Auth
    } else {
        PipelineError::Transport {
            status: Some(status.as_u16()),
            message: excerpt(body),
        }
    }
}

/// Pulls the model's text payload out of a 2xx envelope body. An envelope
/// that does not decode, or decodes with no text parts, is `EmptyResponse` —
/// distinct from a payload-level `Format` failure.
fn extract_envelope_text(body: &str) -> Result<String, PipelineError> {
    let envelope: GenerateResponse =
        serde_json::from_str(body).map_err(|_| PipelineError::EmptyResponse)?;
    envelope.text().ok_or(PipelineError::EmptyResponse)
}

fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_text_joins_candidate_parts() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Hello, "}, {"text": "world"}]}}
            ]
        }"#;
        let envelope: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.text().as_deref(), Some("Hello, world"));
    }

    #[test]
    fn test_envelope_without_candidates_has_no_text() {
        let envelope: GenerateResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert_eq!(envelope.text(), None);
    }

    #[test]
    fn test_envelope_with_empty_parts_has_no_text() {
        let raw = r#"{"candidates": [{"content": {"parts": []}}]}"#;
        let envelope: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.text(), None);
    }

    #[test]
    fn test_request_body_includes_search_tool_only_when_grounded() {
        let grounded = GenerateRequest {
            contents: vec![],
            system_instruction: None,
            tools: vec![Tool::google_search()],
        };
        let value = serde_json::to_value(&grounded).unwrap();
        assert!(value["tools"][0].get("google_search").is_some());

        let plain = GenerateRequest {
            contents: vec![],
            system_instruction: None,
            tools: vec![],
        };
        let value = serde_json::to_value(&plain).unwrap();
        assert!(value.get("tools").is_none());
    }

    #[test]
    fn test_system_instruction_uses_camel_case_key() {
        let request = GenerateRequest {
            contents: vec![],
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part {
                    text: "be terse".into(),
                }],
            }),
            tools: vec![],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "be terse");
    }

    #[test]
    fn test_unauthorized_status_is_terminal_auth() {
        let err = classify_status(StatusCode::UNAUTHORIZED, "key invalid");
        assert_eq!(err, PipelineError::Auth);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_forbidden_status_is_terminal_auth() {
        assert_eq!(
            classify_status(StatusCode::FORBIDDEN, "blocked"),
            PipelineError::Auth
        );
    }

    #[test]
    fn test_server_error_is_retryable_transport_with_status() {
        let err = classify_status(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(err.is_retryable());
        assert_eq!(
            err,
            PipelineError::Transport {
                status: Some(500),
                message: "boom".into()
            }
        );
    }

    #[test]
    fn test_rate_limit_status_is_retryable_transport() {
        let err = classify_status(StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_transport_message_excerpt_is_bounded() {
        let long = "x".repeat(1000);
        match classify_status(StatusCode::BAD_GATEWAY, &long) {
            PipelineError::Transport { message, .. } => {
                assert_eq!(message.chars().count(), EXCERPT_CHARS)
            }
            other => panic!("expected Transport, got {other:?}"),
        }
    }

    #[test]
    fn test_envelope_text_is_extracted_from_success_body() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "hi"}]}}]}"#;
        assert_eq!(extract_envelope_text(body).unwrap(), "hi");
    }

    #[test]
    fn test_undecodable_success_body_is_empty_response() {
        assert_eq!(
            extract_envelope_text("<html>gateway page</html>").unwrap_err(),
            PipelineError::EmptyResponse
        );
    }

    #[test]
    fn test_textless_envelope_is_empty_response() {
        assert_eq!(
            extract_envelope_text(r#"{"candidates": []}"#).unwrap_err(),
            PipelineError::EmptyResponse
        );
    }

    #[test]
    fn test_redact_removes_credential_from_diagnostics() {
        let config = Config {
            gemini_api_key: "sk-secret-123".into(),
            gemini_api_url: "https://example.test".into(),
            gemini_model: "m".into(),
            api_key_in_query: true,
            force_fallback: false,
            port: 8080,
            rust_log: "info".into(),
        };
        let client = GeminiClient::new(&config);
        let message = client.redact("error for url https://example.test?key=sk-secret-123".into());
        assert!(!message.contains("sk-secret-123"));
        assert!(message.contains("[REDACTED]"));
    }
}
