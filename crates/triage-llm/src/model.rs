//! The narrative collaborator trait.

use async_trait::async_trait;

/// Errors raised by a narrative-generation call.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// HTTP transport or decoding failure.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The model answered with no usable text.
    #[error("model returned an empty response")]
    EmptyResponse,
}

/// One prompt-to-text generation call.
///
/// Responses are free text; callers decide whether to parse them further.
#[async_trait]
pub trait NarrativeModel: Send + Sync {
    /// Generate text for one prompt.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}
