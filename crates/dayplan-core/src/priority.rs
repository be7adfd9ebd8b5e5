//! Task priority calculation.
//!
//! A task's priority is a weighted sum of three attributes on a 0-10 scale:
//! - Effort (1-10)
//! - Urgency (1-10)
//! - Length, normalized so an 8-hour task scores 10 and longer tasks clamp
//!
//! The result is rounded to two decimals.

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Allowed drift of the weight sum away from 1.0.
pub const WEIGHT_TOLERANCE: f64 = 0.001;

/// Task length (hours) that maps to the top of the length scale.
const FULL_LENGTH_HOURS: f64 = 8.0;

/// Priority calculation weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityWeights {
    /// Weight for effort (default 0.3)
    #[serde(default = "default_effort_weight")]
    pub effort: f64,
    /// Weight for urgency (default 0.5)
    #[serde(default = "default_urgency_weight")]
    pub urgency: f64,
    /// Weight for normalized length (default 0.2)
    #[serde(default = "default_length_weight")]
    pub length: f64,
}

fn default_effort_weight() -> f64 {
    0.3
}
fn default_urgency_weight() -> f64 {
    0.5
}
fn default_length_weight() -> f64 {
    0.2
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            effort: default_effort_weight(),
            urgency: default_urgency_weight(),
            length: default_length_weight(),
        }
    }
}

impl PriorityWeights {
    pub fn new(effort: f64, urgency: f64, length: f64) -> Self {
        Self {
            effort,
            urgency,
            length,
        }
    }

    pub fn sum(&self) -> f64 {
        self.effort + self.urgency + self.length
    }

    /// Check that the weights sum to 1.0 within [`WEIGHT_TOLERANCE`].
    pub fn validate(&self) -> Result<(), ScheduleError> {
        let sum = self.sum();
        if !sum.is_finite() || (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ScheduleError::InvalidWeights { sum });
        }
        Ok(())
    }
}

/// Map a length in hours onto the 0-10 scale, clamping at both ends.
pub fn normalize_length(length_hours: f64) -> f64 {
    (length_hours / FULL_LENGTH_HOURS * 10.0).clamp(0.0, 10.0)
}

/// Calculate priority with the default weights (0.3 / 0.5 / 0.2).
pub fn calculate_priority(effort: u8, urgency: u8, length_hours: f64) -> f64 {
    let weights = PriorityWeights::default();
    score(effort, urgency, length_hours, &weights)
}

/// Calculate priority with caller-supplied weights.
///
/// # Errors
/// Returns [`ScheduleError::InvalidWeights`] if the weights do not sum to 1.
/// Nothing is computed before the weights are validated.
pub fn calculate_priority_with_weights(
    effort: u8,
    urgency: u8,
    length_hours: f64,
    weights: &PriorityWeights,
) -> Result<f64, ScheduleError> {
    weights.validate()?;
    Ok(score(effort, urgency, length_hours, weights))
}

fn score(effort: u8, urgency: u8, length_hours: f64, weights: &PriorityWeights) -> f64 {
    let raw = f64::from(effort) * weights.effort
        + f64::from(urgency) * weights.urgency
        + normalize_length(length_hours) * weights.length;
    round2(raw)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_weights_match_reference_values() {
        // 5*0.3 + 8*0.5 + (2/8*10)*0.2 = 1.5 + 4.0 + 0.5
        assert_eq!(calculate_priority(5, 8, 2.0), 6.0);
        assert_eq!(calculate_priority(10, 10, 8.0), 10.0);
        // 2*0.3 + 3*0.5 + (1/8*10)*0.2 = 0.6 + 1.5 + 0.25
        assert_eq!(calculate_priority(2, 3, 1.0), 2.35);
    }

    #[test]
    fn long_tasks_clamp_at_full_length() {
        assert_eq!(normalize_length(8.0), 10.0);
        assert_eq!(normalize_length(20.0), 10.0);
        assert_eq!(calculate_priority(4, 4, 8.0), calculate_priority(4, 4, 12.0));
    }

    #[test]
    fn negative_length_scores_as_zero_length() {
        assert_eq!(normalize_length(-40.0), 0.0);
        // 1*0.3 + 1*0.5 + 0*0.2
        assert_eq!(calculate_priority(1, 1, -40.0), 0.8);
        assert_eq!(calculate_priority(3, 7, -1.0), calculate_priority(3, 7, 0.0));
    }

    #[test]
    fn rejects_weights_not_summing_to_one() {
        let weights = PriorityWeights::new(0.5, 0.5, 0.5);
        let err = calculate_priority_with_weights(5, 5, 1.0, &weights).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidWeights { .. }));
    }

    #[test]
    fn accepts_weights_within_tolerance() {
        let weights = PriorityWeights::new(0.3, 0.5, 0.2005);
        assert!(calculate_priority_with_weights(5, 5, 1.0, &weights).is_ok());

        let weights = PriorityWeights::new(0.3, 0.5, 0.202);
        assert!(calculate_priority_with_weights(5, 5, 1.0, &weights).is_err());
    }

    #[test]
    fn custom_weights_change_the_score() {
        let urgency_only = PriorityWeights::new(0.0, 1.0, 0.0);
        assert_eq!(
            calculate_priority_with_weights(2, 9, 3.0, &urgency_only).unwrap(),
            9.0
        );
    }

    proptest! {
        #[test]
        fn urgency_is_monotonic(
            effort in 1u8..=10,
            urgency in 1u8..10,
            length in 0.1f64..24.0,
        ) {
            let lower = calculate_priority(effort, urgency, length);
            let higher = calculate_priority(effort, urgency + 1, length);
            prop_assert!(higher >= lower);
        }

        #[test]
        fn score_stays_on_ten_point_scale(
            effort in 1u8..=10,
            urgency in 1u8..=10,
            length in 0.01f64..48.0,
        ) {
            let p = calculate_priority(effort, urgency, length);
            prop_assert!((0.0..=10.0).contains(&p));
        }

        #[test]
        fn unbalanced_weights_always_fail(
            w1 in 0.0f64..1.0,
            w2 in 0.0f64..1.0,
            offset in 0.01f64..1.0,
        ) {
            let w3 = 1.0 - w1 - w2 + offset;
            let weights = PriorityWeights::new(w1, w2, w3);
            prop_assert!(calculate_priority_with_weights(5, 5, 2.0, &weights).is_err());
        }
    }
}
