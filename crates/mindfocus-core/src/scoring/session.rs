//! Single-session focus score.
//!
//! A session is scored from four factors, each in [0, 1]:
//!
//! | Factor | Source |
//! |--------|--------|
//! | completion | 1.0 if the task was finished, partial credit otherwise |
//! | distraction | linear decay per logged distraction, floored at 0 |
//! | duration | closeness of the measured length to the target |
//! | consistency | flat baseline |
//!
//! The weighted sum is scaled to 0-100, clamped and rounded.

use serde::{Deserialize, Serialize};

use super::config::ScoringConfig;
use crate::error::ValidationError;
use crate::session::FocusSession;

/// Per-factor values behind a session score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreFactors {
    pub session_completion: f64,
    pub distraction_impact: f64,
    pub duration_efficiency: f64,
    pub consistency_bonus: f64,
}

/// Score of one session with its breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionScore {
    /// Final score, 0-100
    pub score: u8,
    /// Weighted sum scaled to 100, before clamping and rounding
    pub raw_score: f64,
    pub factors: ScoreFactors,
}

/// Computes focus scores for individual sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionScoreCalculator {
    config: ScoringConfig,
}

impl SessionScoreCalculator {
    /// Create a calculator with the default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a calculator from a custom configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration fails validation, most notably
    /// when the weights do not sum to 1.0.
    pub fn try_new(config: ScoringConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Full credit for a finished task, partial credit for an attempt.
    pub fn completion_factor(&self, session: &FocusSession) -> f64 {
        if session.is_completed() {
            1.0
        } else {
            self.config.incomplete_credit
        }
    }

    /// Each distraction costs `distraction_penalty` of the factor.
    pub fn distraction_factor(&self, session: &FocusSession) -> f64 {
        let lost = session.distractions() as f64 * self.config.distraction_penalty;
        (1.0 - lost).max(0.0)
    }

    /// Duration credit relative to the target length.
    ///
    /// - unmeasured (0 minutes): 0
    /// - ratio within the efficient band, edges included: 1
    /// - shorter: scaled linearly down from the lower edge
    /// - longer: decays as `max_ratio / ratio`, never below the floor
    pub fn duration_efficiency(&self, session: &FocusSession) -> f64 {
        let actual = session.measured_duration();
        if actual == 0.0 {
            return 0.0;
        }

        let cfg = &self.config;
        let ratio = actual / cfg.target_duration_minutes;

        if ratio < cfg.efficient_ratio_min {
            ratio / cfg.efficient_ratio_min
        } else if ratio <= cfg.efficient_ratio_max {
            1.0
        } else {
            (cfg.efficient_ratio_max / ratio).max(cfg.long_session_floor)
        }
    }

    /// Constant for now; there is no multi-session context at this level.
    pub fn consistency_factor(&self, _session: &FocusSession) -> f64 {
        self.config.consistency_baseline
    }

    pub fn factors(&self, session: &FocusSession) -> ScoreFactors {
        ScoreFactors {
            session_completion: self.completion_factor(session),
            distraction_impact: self.distraction_factor(session),
            duration_efficiency: self.duration_efficiency(session),
            consistency_bonus: self.consistency_factor(session),
        }
    }

    /// Score a session and keep the factor breakdown.
    pub fn breakdown(&self, session: &FocusSession) -> SessionScore {
        let factors = self.factors(session);
        let w = &self.config.weights;

        let raw_score = (factors.session_completion * w.completion
            + factors.distraction_impact * w.distraction
            + factors.duration_efficiency * w.duration
            + factors.consistency_bonus * w.consistency)
            * 100.0;
        let score = raw_score.clamp(0.0, 100.0).round() as u8;

        tracing::trace!(
            score,
            raw_score,
            completion = factors.session_completion,
            distraction = factors.distraction_impact,
            duration = factors.duration_efficiency,
            "scored focus session"
        );

        SessionScore {
            score,
            raw_score,
            factors,
        }
    }

    /// Score a session on the 0-100 scale.
    pub fn calculate_session_score(&self, session: &FocusSession) -> u8 {
        self.breakdown(session).score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::config::ScoreWeights;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn session() -> FocusSession {
        FocusSession::started_at(Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap())
    }

    fn scored(duration: f64, distractions: u32, completed: bool) -> FocusSession {
        session()
            .with_duration(duration)
            .with_distractions(distractions)
            .completed(completed)
    }

    #[test]
    fn perfect_pomodoro_scores_91() {
        let calc = SessionScoreCalculator::new();
        let result = calc.breakdown(&scored(25.0, 0, true));

        assert_eq!(result.factors.session_completion, 1.0);
        assert_eq!(result.factors.distraction_impact, 1.0);
        assert_eq!(result.factors.duration_efficiency, 1.0);
        assert_eq!(result.factors.consistency_bonus, 0.1);
        assert_eq!(result.score, 91);
    }

    #[test]
    fn abandoned_distracted_session_scores_13() {
        let calc = SessionScoreCalculator::new();
        let result = calc.breakdown(&scored(0.0, 10, false));

        assert_eq!(result.factors.session_completion, 0.3);
        assert_eq!(result.factors.distraction_impact, 0.0);
        assert_eq!(result.factors.duration_efficiency, 0.0);
        assert_eq!(result.score, 13);
    }

    #[test]
    fn empty_record_uses_neutral_defaults() {
        let calc = SessionScoreCalculator::new();
        // completion 0.3, distraction 1.0, duration 0, consistency 0.1
        // (0.12 + 0.3 + 0 + 0.01) * 100 = 43
        assert_eq!(calc.calculate_session_score(&session()), 43);
    }

    #[test]
    fn zero_duration_gets_no_duration_credit() {
        let calc = SessionScoreCalculator::new();
        let factors = calc.factors(&scored(0.0, 0, true));
        assert_eq!(factors.duration_efficiency, 0.0);
    }

    #[test]
    fn five_distractions_zero_the_distraction_factor() {
        let calc = SessionScoreCalculator::new();
        assert!(calc.distraction_factor(&scored(25.0, 5, true)).abs() < 1e-12);
        assert_eq!(calc.distraction_factor(&scored(25.0, 6, true)), 0.0);
        assert!((calc.distraction_factor(&scored(25.0, 2, true)) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn efficiency_band_edges_are_inclusive() {
        let calc = SessionScoreCalculator::new();
        // 20 / 25 = 0.8, 30 / 25 = 1.2
        assert_eq!(calc.duration_efficiency(&scored(20.0, 0, true)), 1.0);
        assert_eq!(calc.duration_efficiency(&scored(30.0, 0, true)), 1.0);
    }

    #[test]
    fn short_sessions_scale_linearly() {
        let calc = SessionScoreCalculator::new();
        // ratio 0.4 -> 0.4 / 0.8 = 0.5
        let eff = calc.duration_efficiency(&scored(10.0, 0, true));
        assert!((eff - 0.5).abs() < 1e-12);
    }

    #[test]
    fn long_sessions_decay_to_floor() {
        let calc = SessionScoreCalculator::new();
        // ratio 2.0 -> 1.2 / 2.0 = 0.6
        let eff = calc.duration_efficiency(&scored(50.0, 0, true));
        assert!((eff - 0.6).abs() < 1e-12);

        // ratio 4.0 -> 0.3, floored at 0.5
        assert_eq!(calc.duration_efficiency(&scored(100.0, 0, true)), 0.5);
    }

    #[test]
    fn custom_target_changes_efficiency() {
        let config = ScoringConfig {
            target_duration_minutes: 50.0,
            ..ScoringConfig::default()
        };
        let calc = SessionScoreCalculator::try_new(config).unwrap();
        assert_eq!(calc.duration_efficiency(&scored(50.0, 0, true)), 1.0);
        assert!((calc.duration_efficiency(&scored(20.0, 0, true)) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn try_new_rejects_bad_weights() {
        let config = ScoringConfig {
            weights: ScoreWeights {
                completion: 0.9,
                ..ScoreWeights::default()
            },
            ..ScoringConfig::default()
        };
        assert!(matches!(
            SessionScoreCalculator::try_new(config),
            Err(ValidationError::WeightSum { .. })
        ));
    }

    #[test]
    fn breakdown_serializes() {
        let calc = SessionScoreCalculator::new();
        let json = serde_json::to_string(&calc.breakdown(&scored(25.0, 1, true))).unwrap();
        assert!(json.contains("\"score\":85"));
        assert!(json.contains("distraction_impact"));
    }

    proptest! {
        #[test]
        fn score_is_bounded(
            duration in prop_oneof![Just(0.0), 0.0f64..1_000.0, Just(-5.0), Just(f64::INFINITY)],
            distractions in 0u32..1_000,
            completed in any::<bool>(),
        ) {
            let calc = SessionScoreCalculator::new();
            let result = calc.breakdown(&scored(duration, distractions, completed));
            prop_assert!(result.score <= 100);
            prop_assert!(result.raw_score >= 0.0);
        }

        #[test]
        fn zero_duration_never_contributes(
            distractions in 0u32..50,
            completed in any::<bool>(),
        ) {
            let calc = SessionScoreCalculator::new();
            let factors = calc.factors(&scored(0.0, distractions, completed));
            prop_assert_eq!(factors.duration_efficiency, 0.0);
        }

        #[test]
        fn more_distractions_never_raise_the_score(
            duration in 0.0f64..200.0,
            distractions in 0u32..20,
            extra in 1u32..10,
            completed in any::<bool>(),
        ) {
            let calc = SessionScoreCalculator::new();
            let fewer = calc.calculate_session_score(&scored(duration, distractions, completed));
            let more = calc.calculate_session_score(&scored(duration, distractions + extra, completed));
            prop_assert!(more <= fewer);
        }

        #[test]
        fn factors_stay_in_unit_range(
            duration in 0.0f64..500.0,
            distractions in 0u32..100,
            completed in any::<bool>(),
        ) {
            let calc = SessionScoreCalculator::new();
            let f = calc.factors(&scored(duration, distractions, completed));
            for value in [f.session_completion, f.distraction_impact, f.duration_efficiency, f.consistency_bonus] {
                prop_assert!((0.0..=1.0).contains(&value));
            }
        }
    }
}
