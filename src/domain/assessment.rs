//! Assessment wire payloads
//!
//! One assessment round produces an `AssessmentReport`; it lives until the
//! refinement step consumes it and is then discarded. Reward and penalty
//! tags are enumerated reason codes rather than free text so the report
//! stays machine-checkable.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Bonus reason codes the assessor may attach to a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardTag {
    ArchitectureFocus,
    OperationalInsight,
    CrossSystemReasoning,
    /// Anything the model emits outside the known set
    #[serde(other)]
    Other,
}

/// Penalty reason codes the assessor may attach to a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyTag {
    ClarityIssues,
    AtomicityIssues,
    UniquenessIssues,
    Verbosity,
    MissingContext,
    Wordiness,
    #[serde(other)]
    Other,
}

/// Per-card critique from one assessment round
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardAssessment {
    /// Position in the candidate list this assessment refers to
    #[serde(default)]
    pub card_index: usize,

    /// Factor scores in [0,1]; missing factors score 0
    #[serde(default)]
    pub quality_factors: HashMap<String, f64>,

    /// Model-reported weighted score in [0,10]
    #[serde(default)]
    pub weighted_score: f64,

    #[serde(default, rename = "reward_factors")]
    pub reward_tags: Vec<RewardTag>,

    #[serde(default, rename = "penalty_factors")]
    pub penalty_tags: Vec<PenaltyTag>,

    /// Improvement suggestions ranked by priority
    #[serde(default)]
    pub priority_improvements: Vec<String>,
}

/// Count of cards per quality tier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityDistribution {
    #[serde(default)]
    pub excellent: u32,

    #[serde(default)]
    pub good: u32,

    #[serde(default)]
    pub needs_work: u32,

    #[serde(default)]
    pub poor: u32,
}

/// Full assessment round output
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssessmentReport {
    #[serde(default)]
    pub assessments: Vec<CardAssessment>,

    /// Overall set score in [0,10]
    #[serde(default)]
    pub overall_score: f64,

    #[serde(default)]
    pub quality_distribution: QualityDistribution,

    #[serde(default)]
    pub critical_issues: u32,

    /// Set-level improvement priorities, highest first
    #[serde(default)]
    pub improvement_priorities: Vec<String>,
}

impl AssessmentReport {
    /// Feed the top-2 improvement priorities into the next round's prompt
    pub fn feedback(&self) -> Option<String> {
        if self.improvement_priorities.is_empty() {
            return None;
        }
        let top: Vec<&str> = self.improvement_priorities.iter().take(2).map(String::as_str).collect();
        Some(format!("Focus on: {}", top.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assessment_report() {
        let json = r#"{
            "assessments": [
                {
                    "card_index": 0,
                    "quality_factors": {"atomicity": 1.0, "conciseness": 0.6},
                    "weighted_score": 8.2,
                    "reward_factors": ["operational_insight"],
                    "penalty_factors": ["verbosity"],
                    "priority_improvements": ["reduce question from 12 to 7 words"]
                }
            ],
            "overall_score": 7.8,
            "quality_distribution": {"excellent": 3, "good": 4, "needs_work": 1, "poor": 0},
            "critical_issues": 2,
            "improvement_priorities": ["reduce question length", "reduce answer length"]
        }"#;

        let report: AssessmentReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.assessments.len(), 1);
        assert_eq!(report.assessments[0].reward_tags, vec![RewardTag::OperationalInsight]);
        assert_eq!(report.assessments[0].penalty_tags, vec![PenaltyTag::Verbosity]);
        assert_eq!(report.critical_issues, 2);
        assert_eq!(report.quality_distribution.excellent, 3);
    }

    #[test]
    fn test_unknown_tags_do_not_fail_parse() {
        let json = r#"{
            "card_index": 1,
            "reward_factors": ["novel_bonus_we_never_defined"],
            "penalty_factors": ["some_new_penalty"]
        }"#;

        let assessment: CardAssessment = serde_json::from_str(json).unwrap();
        assert_eq!(assessment.reward_tags, vec![RewardTag::Other]);
        assert_eq!(assessment.penalty_tags, vec![PenaltyTag::Other]);
    }

    #[test]
    fn test_feedback_joins_top_two_priorities() {
        let report = AssessmentReport {
            improvement_priorities: vec!["first".to_string(), "second".to_string(), "third".to_string()],
            ..Default::default()
        };
        assert_eq!(report.feedback(), Some("Focus on: first; second".to_string()));
    }

    #[test]
    fn test_feedback_none_without_priorities() {
        assert_eq!(AssessmentReport::default().feedback(), None);
    }

    #[test]
    fn test_feedback_single_priority() {
        let report = AssessmentReport {
            improvement_priorities: vec!["only".to_string()],
            ..Default::default()
        };
        assert_eq!(report.feedback(), Some("Focus on: only".to_string()));
    }
}
