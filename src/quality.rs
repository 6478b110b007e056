//! The scoring rubric
//!
//! Ten named factors in [0,1], a weighted aggregation onto a [0,10] scale,
//! and minimum floors for the four critical factors. Everything here is a
//! pure function of its inputs; the loop recomputes floors locally and
//! never trusts the model's own weighted scores for the convergence gate.

use std::collections::HashMap;

use crate::domain::QualityDistribution;

/// Fixed factor set with aggregation weights; weights sum to 1.0
pub const FACTOR_WEIGHTS: [(&str, f64); 10] = [
    ("atomicity", 0.15),
    ("conciseness", 0.15),
    ("standalone_context", 0.10),
    ("specific_answer", 0.10),
    ("no_hints", 0.10),
    ("technical_precision", 0.10),
    ("practical_value", 0.10),
    ("bidirectional_design", 0.10),
    ("uniqueness", 0.05),
    ("design_rationale", 0.05),
];

/// Minimum acceptable scores for the critical factors
pub const FACTOR_FLOORS: [(&str, f64); 4] = [
    ("atomicity", 0.9),
    ("conciseness", 0.8),
    ("standalone_context", 0.9),
    ("no_hints", 0.9),
];

/// Look up a factor score, accepting the legacy spellings some prompts used
///
/// Missing factors score 0.
fn lookup(factors: &HashMap<String, f64>, name: &str) -> f64 {
    if let Some(v) = factors.get(name) {
        return *v;
    }
    let alias = match name {
        "atomicity" => Some("conceptual_atomicity"),
        "specific_answer" => Some("requires_specific_answer"),
        _ => None,
    };
    alias.and_then(|a| factors.get(a)).copied().unwrap_or(0.0)
}

/// Weighted factor aggregation onto a [0,10] scale
pub fn aggregate(factors: &HashMap<String, f64>) -> f64 {
    FACTOR_WEIGHTS.iter().map(|(name, weight)| lookup(factors, name) * weight).sum::<f64>() * 10.0
}

/// Check the critical-factor floors
///
/// Returns false if ANY required factor is below its floor; a missing
/// factor counts as 0 and therefore fails.
pub fn meets_floor(factors: &HashMap<String, f64>) -> bool {
    FACTOR_FLOORS.iter().all(|(name, min)| lookup(factors, name) >= *min)
}

/// Classify a [0,10] card score into the reporting tiers
pub fn tier(score: f64) -> Tier {
    if score >= 9.0 {
        Tier::Excellent
    } else if score >= 7.0 {
        Tier::Good
    } else if score >= 5.0 {
        Tier::NeedsWork
    } else {
        Tier::Poor
    }
}

/// Quality tier for distribution reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Excellent,
    Good,
    NeedsWork,
    Poor,
}

/// Bucket a set of card scores into a tier distribution
pub fn distribution(scores: &[f64]) -> QualityDistribution {
    let mut dist = QualityDistribution::default();
    for &score in scores {
        match tier(score) {
            Tier::Excellent => dist.excellent += 1,
            Tier::Good => dist.good += 1,
            Tier::NeedsWork => dist.needs_work += 1,
            Tier::Poor => dist.poor += 1,
        }
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_factors(value: f64) -> HashMap<String, f64> {
        FACTOR_WEIGHTS.iter().map(|(name, _)| (name.to_string(), value)).collect()
    }

    #[test]
    fn test_weights_sum_to_one() {
        let sum: f64 = FACTOR_WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((sum - 1.0).abs() < 1e-9, "weights sum to {}", sum);
    }

    #[test]
    fn test_aggregate_all_ones_is_ten() {
        assert!((aggregate(&all_factors(1.0)) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_all_zeros_is_zero() {
        assert_eq!(aggregate(&all_factors(0.0)), 0.0);
    }

    #[test]
    fn test_aggregate_missing_factors_contribute_zero() {
        let factors = HashMap::from([("atomicity".to_string(), 1.0)]);
        assert!((aggregate(&factors) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_accepts_legacy_spellings() {
        let mut factors = all_factors(1.0);
        let atomicity = factors.remove("atomicity").unwrap();
        let specific = factors.remove("specific_answer").unwrap();
        factors.insert("conceptual_atomicity".to_string(), atomicity);
        factors.insert("requires_specific_answer".to_string(), specific);

        assert!((aggregate(&factors) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_meets_floor_all_high() {
        assert!(meets_floor(&all_factors(1.0)));
    }

    #[test]
    fn test_meets_floor_single_low_factor_fails() {
        // One failing factor fails the card regardless of the others
        let mut factors = all_factors(1.0);
        factors.insert("atomicity".to_string(), 0.5);
        assert!(!meets_floor(&factors));
    }

    #[test]
    fn test_meets_floor_at_boundary() {
        let mut factors = all_factors(1.0);
        factors.insert("conciseness".to_string(), 0.8);
        assert!(meets_floor(&factors));
        factors.insert("conciseness".to_string(), 0.79);
        assert!(!meets_floor(&factors));
    }

    #[test]
    fn test_meets_floor_missing_factor_fails() {
        let mut factors = all_factors(1.0);
        factors.remove("no_hints");
        assert!(!meets_floor(&factors));
    }

    #[test]
    fn test_meets_floor_ignores_noncritical_factors() {
        let mut factors = all_factors(1.0);
        factors.insert("design_rationale".to_string(), 0.0);
        assert!(meets_floor(&factors));
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(tier(10.0), Tier::Excellent);
        assert_eq!(tier(9.0), Tier::Excellent);
        assert_eq!(tier(8.9), Tier::Good);
        assert_eq!(tier(7.0), Tier::Good);
        assert_eq!(tier(6.9), Tier::NeedsWork);
        assert_eq!(tier(5.0), Tier::NeedsWork);
        assert_eq!(tier(4.9), Tier::Poor);
        assert_eq!(tier(0.0), Tier::Poor);
    }

    #[test]
    fn test_distribution_buckets() {
        let dist = distribution(&[9.5, 8.0, 7.2, 5.5, 2.0]);
        assert_eq!(dist.excellent, 1);
        assert_eq!(dist.good, 2);
        assert_eq!(dist.needs_work, 1);
        assert_eq!(dist.poor, 1);
    }
}
