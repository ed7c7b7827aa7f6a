//! Environment-driven configuration.
//!
//! Every collaborator is optional: an unset or empty variable means
//! "unconfigured", which selects the deterministic fallback paths and lets
//! the whole pipeline run offline.

use triage_intel::IntelApiKeys;

/// Model used when `GEMINI_MODEL_NAME` is not set.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";

/// Refinement iterations requested by the entry surfaces.
pub const DEFAULT_MAX_ITERATIONS: u32 = 3;

/// Process configuration for the triage pipeline.
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Gemini API key; `None` disables the narrative model.
    pub gemini_api_key: Option<String>,
    /// Gemini model name.
    pub gemini_model: String,
    /// Reputation source API keys.
    pub intel_keys: IntelApiKeys,
    /// Refinement iterations to request.
    pub max_report_iterations: u32,
}

impl TriageConfig {
    /// Read configuration from the process environment.
    ///
    /// Recognized variables: `GEMINI_API_KEY`, `GEMINI_MODEL_NAME`,
    /// `ABUSEIPDB_API_KEY`, `VIRUSTOTAL_API_KEY`, `OTX_API_KEY`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: env_non_empty("GEMINI_API_KEY"),
            gemini_model: env_non_empty("GEMINI_MODEL_NAME")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            intel_keys: IntelApiKeys {
                abuseipdb: env_non_empty("ABUSEIPDB_API_KEY"),
                virustotal: env_non_empty("VIRUSTOTAL_API_KEY"),
                otx: env_non_empty("OTX_API_KEY"),
            },
            max_report_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Fully offline configuration: no collaborators anywhere.
    #[must_use]
    pub fn offline() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            intel_keys: IntelApiKeys::none(),
            max_report_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self::offline()
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_config_has_no_collaborators() {
        let config = TriageConfig::offline();
        assert!(config.gemini_api_key.is_none());
        assert!(!config.intel_keys.any_configured());
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.max_report_iterations, 3);
    }

    #[test]
    fn env_non_empty_filters_empty_values() {
        // Variable name chosen to not collide with anything real.
        std::env::set_var("TRIAGE_TEST_EMPTY_VAR", "");
        assert_eq!(env_non_empty("TRIAGE_TEST_EMPTY_VAR"), None);

        std::env::set_var("TRIAGE_TEST_EMPTY_VAR", "value");
        assert_eq!(
            env_non_empty("TRIAGE_TEST_EMPTY_VAR"),
            Some("value".to_string())
        );
        std::env::remove_var("TRIAGE_TEST_EMPTY_VAR");
    }
}
