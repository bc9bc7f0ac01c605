//! Scoring parameters.
//!
//! Every constant used by the session scorer and the weekly aggregator is
//! held here so a configuration can be validated once, when a calculator is
//! built, instead of trusting hidden statics.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Allowed drift when checking that weights sum to 1.0.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Weights for each score factor. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Weight for task completion
    pub completion: f64,
    /// Weight for freedom from distractions
    pub distraction: f64,
    /// Weight for closeness to the target duration
    pub duration: f64,
    /// Weight for the consistency baseline
    pub consistency: f64,
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.completion + self.distraction + self.duration + self.consistency
    }

    /// # Errors
    /// Returns an error if any weight is outside [0, 1] or the sum is not 1.0.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let named = [
            ("weights.completion", self.completion),
            ("weights.distraction", self.distraction),
            ("weights.duration", self.duration),
            ("weights.consistency", self.consistency),
        ];
        for (field, value) in named {
            ensure_unit(field, value)?;
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ValidationError::WeightSum { sum });
        }
        Ok(())
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            completion: 0.4,
            distraction: 0.3,
            duration: 0.2,
            consistency: 0.1,
        }
    }
}

/// Parameters of the single-session score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ScoreWeights,
    /// Session length that earns full duration credit
    pub target_duration_minutes: f64,
    /// Lower edge of the fully-efficient ratio band (inclusive)
    pub efficient_ratio_min: f64,
    /// Upper edge of the fully-efficient ratio band (inclusive)
    pub efficient_ratio_max: f64,
    /// Minimum duration credit for overlong sessions
    pub long_session_floor: f64,
    /// Completion factor for sessions whose task was not finished
    pub incomplete_credit: f64,
    /// Fraction of the distraction factor lost per distraction
    pub distraction_penalty: f64,
    /// Flat consistency factor applied to every session
    pub consistency_baseline: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            target_duration_minutes: 25.0,
            efficient_ratio_min: 0.8,
            efficient_ratio_max: 1.2,
            long_session_floor: 0.5,
            incomplete_credit: 0.3,
            distraction_penalty: 0.2,
            consistency_baseline: 0.1,
        }
    }
}

impl ScoringConfig {
    /// # Errors
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.weights.validate()?;

        if !self.target_duration_minutes.is_finite() || self.target_duration_minutes <= 0.0 {
            return Err(ValidationError::invalid(
                "target_duration_minutes",
                "must be a positive number",
            ));
        }

        if !(self.efficient_ratio_min > 0.0 && self.efficient_ratio_min <= 1.0) {
            return Err(ValidationError::invalid(
                "efficient_ratio_min",
                "must be in (0, 1]",
            ));
        }
        if !(self.efficient_ratio_max >= 1.0 && self.efficient_ratio_max.is_finite()) {
            return Err(ValidationError::invalid(
                "efficient_ratio_max",
                "must be a finite number >= 1",
            ));
        }

        ensure_unit("long_session_floor", self.long_session_floor)?;
        ensure_unit("incomplete_credit", self.incomplete_credit)?;
        ensure_unit("distraction_penalty", self.distraction_penalty)?;
        ensure_unit("consistency_baseline", self.consistency_baseline)?;
        Ok(())
    }
}

/// Longest rolling window accepted, roughly a century.
pub const MAX_WINDOW_DAYS: u32 = 36_500;

/// Parameters of the weekly aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyConfig {
    /// Length of the rolling window in days
    pub window_days: u32,
    /// Session count at which the consistency multiplier would reach +100%
    /// before capping
    pub sessions_for_full_bonus: f64,
    /// Cap on the consistency multiplier
    pub max_consistency_multiplier: f64,
}

impl Default for WeeklyConfig {
    fn default() -> Self {
        Self {
            window_days: 7,
            sessions_for_full_bonus: 14.0,
            max_consistency_multiplier: 1.1,
        }
    }
}

impl WeeklyConfig {
    /// # Errors
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.window_days == 0 || self.window_days > MAX_WINDOW_DAYS {
            return Err(ValidationError::invalid(
                "window_days",
                format!("must be between 1 and {MAX_WINDOW_DAYS}"),
            ));
        }
        if !self.sessions_for_full_bonus.is_finite() || self.sessions_for_full_bonus <= 0.0 {
            return Err(ValidationError::invalid(
                "sessions_for_full_bonus",
                "must be a positive number",
            ));
        }
        if !self.max_consistency_multiplier.is_finite() || self.max_consistency_multiplier < 1.0 {
            return Err(ValidationError::invalid(
                "max_consistency_multiplier",
                "must be a finite number >= 1",
            ));
        }
        Ok(())
    }
}

fn ensure_unit(field: &str, value: f64) -> Result<(), ValidationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::invalid(
            field,
            format!("must be between 0 and 1, got {value}"),
        ))
    }
}
