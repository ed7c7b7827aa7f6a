//! Report evaluation rubric.
//!
//! A lightweight presence check over the final draft, not a quality metric:
//! it shows whether the expected report sections made it into the text.

use crate::findings::Report;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const CRITERIA: [(&str, &str); 4] = [
    ("has_executive_summary", "executive summary"),
    ("has_timeline", "timeline"),
    ("has_iocs", "indicators of compromise"),
    ("has_remediation", "remediation"),
];

/// Rubric result: one point per section found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Number of criteria met.
    pub score: u32,
    /// Per-criterion outcome.
    pub criteria: BTreeMap<String, bool>,
}

/// Score a report draft against the section rubric, case-insensitively.
#[must_use]
pub fn evaluate_report(report: &Report) -> Evaluation {
    let text = report.draft.to_lowercase();
    let criteria: BTreeMap<String, bool> = CRITERIA
        .iter()
        .map(|(name, section)| ((*name).to_string(), text.contains(section)))
        .collect();
    let score = criteria.values().filter(|met| **met).count() as u32;

    Evaluation { score, criteria }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(draft: &str) -> Report {
        Report {
            draft: draft.to_string(),
            iterations: 1,
            placeholder: false,
        }
    }

    #[test]
    fn full_report_scores_four() {
        let evaluation = evaluate_report(&report(
            "Executive Summary\nTimeline of events\n\
             Indicators of Compromise\nRemediation actions",
        ));
        assert_eq!(evaluation.score, 4);
        assert!(evaluation.criteria.values().all(|met| *met));
    }

    #[test]
    fn empty_report_scores_zero() {
        let evaluation = evaluate_report(&report(""));
        assert_eq!(evaluation.score, 0);
        assert_eq!(evaluation.criteria.len(), 4);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let evaluation = evaluate_report(&report("EXECUTIVE SUMMARY only"));
        assert_eq!(evaluation.score, 1);
        assert!(evaluation.criteria["has_executive_summary"]);
        assert!(!evaluation.criteria["has_timeline"]);
    }
}
