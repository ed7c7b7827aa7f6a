//! Gemini `generateContent` client.

use crate::model::{LlmError, NarrativeModel};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for the Gemini generative API.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Build a client for `model` (e.g. `gemini-1.5-pro`).
    ///
    /// # Errors
    /// - [`LlmError::Http`] if the underlying HTTP client cannot be built
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Model name this client targets.
    #[inline]
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for GeminiClient {
    // The API key is a secret; keep it out of logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl NarrativeModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        debug!(model = %self.model, prompt_len = prompt.len(), "calling gemini");

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response: GenerateResponse = self
            .http
            .post(format!(
                "{GEMINI_BASE_URL}/{}:generateContent",
                self.model
            ))
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .filter(|text| !text.is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_extracts_first_candidate_text() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "first"}, {"text": "second"}]}},
                {"content": {"parts": [{"text": "other"}]}}
            ]
        }"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();

        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text);
        assert_eq!(text.as_deref(), Some("first"));
    }

    #[test]
    fn response_tolerates_empty_body() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(response.candidates.is_empty());
    }

    #[test]
    fn client_debug_redacts_api_key() {
        let client = GeminiClient::new("super-secret", "gemini-1.5-pro").unwrap();
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("gemini-1.5-pro"));
    }
}
