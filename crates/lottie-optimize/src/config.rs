use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::OptimizeError;

/// Schedule of the top-level merge passes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Minimum merge score accepted in the first round
    pub initial_min_score: f64,
    /// Factor applied to the minimum score after each round
    pub min_score_decay: f64,
    /// Rounds stop once the minimum score drops to this value
    pub min_score_floor: f64,
    /// Largest gap in frames between merged layers in the first pass of a round
    pub initial_distance: f64,
    /// Factor applied to the allowed gap after each pass
    pub distance_growth: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            initial_min_score: 0.95,
            min_score_decay: 0.8,
            min_score_floor: 0.1,
            initial_distance: 1.0,
            distance_growth: 2.0,
        }
    }
}

impl OptimizerConfig {
    /// Rejects schedules that would never terminate or never accept anything.
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if !(self.min_score_decay > 0.0 && self.min_score_decay < 1.0) {
            return Err(OptimizeError::InvalidConfig(format!(
                "min_score_decay must be in (0, 1), got {}",
                self.min_score_decay
            )));
        }
        if !(self.distance_growth > 1.0) {
            return Err(OptimizeError::InvalidConfig(format!(
                "distance_growth must be greater than 1, got {}",
                self.distance_growth
            )));
        }
        if !(self.initial_distance > 0.0) {
            return Err(OptimizeError::InvalidConfig(format!(
                "initial_distance must be positive, got {}",
                self.initial_distance
            )));
        }
        if !(self.min_score_floor >= 0.0 && self.min_score_floor < 1.0) {
            return Err(OptimizeError::InvalidConfig(format!(
                "min_score_floor must be in [0, 1), got {}",
                self.min_score_floor
            )));
        }
        Ok(())
    }

    /// Validates the schedule and clamps the initial score to `1.0`, since no
    /// merge scores higher.
    pub fn validated(mut self) -> Result<Self, OptimizeError> {
        self.validate()?;
        if self.initial_min_score > 1.0 {
            warn!(
                initial_min_score = self.initial_min_score,
                "initial_min_score above 1.0, clamping"
            );
            self.initial_min_score = 1.0;
        }
        Ok(self)
    }

    /// Minimum scores of the successive rounds, highest first.
    pub fn min_scores(&self) -> impl Iterator<Item = f64> + '_ {
        std::iter::successors(Some(self.initial_min_score), |score| Some(score * self.min_score_decay))
            .take_while(|score| *score > self.min_score_floor)
    }

    /// Allowed gaps of the passes within one round. The last one covers `duration`.
    pub fn distances(&self, duration: f64) -> Vec<f64> {
        let mut distances = Vec::new();
        let mut distance = self.initial_distance;
        loop {
            distances.push(distance);
            if distance >= duration {
                break;
            }
            distance *= self.distance_growth;
        }
        distances
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let config = OptimizerConfig::default();
        let scores: Vec<f64> = config.min_scores().collect();
        assert_eq!(scores.len(), 11);
        assert_eq!(scores[0], 0.95);
        assert!(scores.iter().all(|score| *score > 0.1));

        assert_eq!(config.distances(10.0), vec![1.0, 2.0, 4.0, 8.0, 16.0]);
        assert_eq!(config.distances(0.5), vec![1.0]);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let bad_decay = OptimizerConfig {
            min_score_decay: 1.0,
            ..Default::default()
        };
        assert!(matches!(bad_decay.validate(), Err(OptimizeError::InvalidConfig(_))));

        let bad_growth = OptimizerConfig {
            distance_growth: 1.0,
            ..Default::default()
        };
        assert!(bad_growth.validate().is_err());

        let bad_distance = OptimizerConfig {
            initial_distance: 0.0,
            ..Default::default()
        };
        assert!(bad_distance.validate().is_err());

        let nan_floor = OptimizerConfig {
            min_score_floor: f64::NAN,
            ..Default::default()
        };
        assert!(nan_floor.validate().is_err());
    }

    #[test]
    fn test_initial_score_is_clamped() {
        let config = OptimizerConfig {
            initial_min_score: 1.5,
            ..Default::default()
        }
        .validated()
        .unwrap();
        assert_eq!(config.initial_min_score, 1.0);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: OptimizerConfig = serde_json::from_str(r#"{"distance_growth": 3.0}"#).unwrap();
        assert_eq!(config.distance_growth, 3.0);
        assert_eq!(config.initial_min_score, 0.95);
    }
}
