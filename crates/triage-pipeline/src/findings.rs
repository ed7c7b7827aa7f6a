//! Synthesis and refinement output types.

use serde::{Deserialize, Serialize};

/// The five named fields of a structured synthesis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePlan {
    /// Likely attack type(s), in one or two sentences.
    pub attack_summary: String,
    /// MITRE ATT&CK technique references.
    pub mitre_techniques: Vec<String>,
    /// Severity label (free-form; placeholder uses `High`).
    pub severity: String,
    /// Concrete remediation actions.
    pub remediation_steps: Vec<String>,
    /// Indicators of compromise.
    pub ioc_list: Vec<String>,
}

impl ResponsePlan {
    /// The fixed plan substituted when no narrative model is configured.
    #[must_use]
    pub fn placeholder(ioc_list: Vec<String>) -> Self {
        Self {
            attack_summary: "Brute force SSH login attempts from suspicious IPs.".to_string(),
            mitre_techniques: vec!["T1110 - Brute Force".to_string()],
            severity: "High".to_string(),
            remediation_steps: vec![
                "Block offending IPs at the firewall.".to_string(),
                "Enable rate limiting for SSH.".to_string(),
                "Enforce key-based auth only.".to_string(),
            ],
            ioc_list,
        }
    }
}

/// Synthesis stage output.
///
/// Tagged so a caller can always tell a genuine model answer from a
/// fallback: `origin` is serialized alongside the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum Findings {
    /// Well-formed structured answer from the narrative model.
    Model(ResponsePlan),
    /// The model answered, but not with parseable structured data.
    Unparsed {
        /// Raw response text, preserved verbatim.
        raw_response: String,
    },
    /// Deterministic fallback used when no model is configured.
    Placeholder(ResponsePlan),
}

impl Findings {
    /// The structured plan, if this variant carries one.
    #[inline]
    #[must_use]
    pub fn plan(&self) -> Option<&ResponsePlan> {
        match self {
            Self::Model(plan) | Self::Placeholder(plan) => Some(plan),
            Self::Unparsed { .. } => None,
        }
    }

    /// Whether this value came from a fallback path rather than a parsed
    /// model answer.
    #[inline]
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        !matches!(self, Self::Model(_))
    }
}

/// Final narrative artifact of one investigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// The report text after the last refinement iteration.
    pub draft: String,
    /// Iterations actually run. With no model configured this is 1,
    /// regardless of the requested maximum.
    pub iterations: u32,
    /// Whether the draft is the fixed placeholder.
    pub placeholder: bool,
}
