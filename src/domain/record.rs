//! IterationRecord - append-only history of loop rounds

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AssessmentReport, QualityDistribution};

/// Snapshot of one assessed loop round
///
/// Appended to the engine's history after each successful assessment and
/// never mutated afterwards; used only for final reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationRecord {
    /// Iteration number (1-indexed)
    pub iteration: u32,

    pub overall_score: f64,

    pub critical_issues: u32,

    pub quality_distribution: QualityDistribution,

    pub improvement_priorities: Vec<String>,
}

impl IterationRecord {
    /// Capture a record from an assessment report
    pub fn from_report(iteration: u32, report: &AssessmentReport) -> Self {
        debug!(iteration, overall_score = report.overall_score, "IterationRecord::from_report: called");
        Self {
            iteration,
            overall_score: report.overall_score,
            critical_issues: report.critical_issues,
            quality_distribution: report.quality_distribution.clone(),
            improvement_priorities: report.improvement_priorities.clone(),
        }
    }
}
