//! Weekly aggregate score.
//!
//! The mean session score over a rolling window, scaled by a consistency
//! multiplier that rewards frequent sessions:
//!
//! ```text
//! multiplier = min(max_multiplier, 1 + count / sessions_for_full_bonus)
//! weekly     = round(min(100, mean * multiplier))
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::config::WeeklyConfig;
use super::session::SessionScoreCalculator;
use crate::error::ValidationError;
use crate::session::FocusSession;

/// Aggregate score for a set of sessions with its inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyScore {
    pub session_count: usize,
    /// Arithmetic mean of the per-session scores (0 when empty)
    pub mean_session_score: f64,
    /// Frequency multiplier applied to the mean (1 when empty)
    pub consistency_multiplier: f64,
    /// Final score, 0-100
    pub score: u8,
}

/// Combines per-session scores into one aggregate.
#[derive(Debug, Clone, Default)]
pub struct WeeklyScoreAggregator {
    scorer: SessionScoreCalculator,
    config: WeeklyConfig,
}

impl WeeklyScoreAggregator {
    pub fn new(scorer: SessionScoreCalculator) -> Self {
        Self {
            scorer,
            config: WeeklyConfig::default(),
        }
    }

    /// # Errors
    /// Returns an error if the weekly configuration is invalid.
    pub fn try_with_config(
        scorer: SessionScoreCalculator,
        config: WeeklyConfig,
    ) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self { scorer, config })
    }

    pub fn scorer(&self) -> &SessionScoreCalculator {
        &self.scorer
    }

    pub fn config(&self) -> &WeeklyConfig {
        &self.config
    }

    /// Multiplier for `count` sessions, capped at the configured maximum.
    pub fn consistency_multiplier(&self, count: usize) -> f64 {
        let uncapped = 1.0 + count as f64 / self.config.sessions_for_full_bonus;
        uncapped.min(self.config.max_consistency_multiplier)
    }

    pub fn breakdown(&self, sessions: &[FocusSession]) -> WeeklyScore {
        if sessions.is_empty() {
            return WeeklyScore {
                session_count: 0,
                mean_session_score: 0.0,
                consistency_multiplier: 1.0,
                score: 0,
            };
        }

        let total = total_score(
            sessions
                .iter()
                .map(|s| self.scorer.calculate_session_score(s)),
        );
        let count = sessions.len();
        let mean = total as f64 / count as f64;
        let multiplier = self.consistency_multiplier(count);
        let score = (mean * multiplier).clamp(0.0, 100.0).round() as u8;

        tracing::debug!(count, mean, multiplier, score, "aggregated weekly score");

        WeeklyScore {
            session_count: count,
            mean_session_score: mean,
            consistency_multiplier: multiplier,
            score,
        }
    }

    /// Aggregate score on the 0-100 scale; 0 for no sessions.
    pub fn calculate_weekly_score(&self, sessions: &[FocusSession]) -> u8 {
        self.breakdown(sessions).score
    }

    /// Sessions that started within the configured window ending at `now`.
    pub fn window(&self, sessions: &[FocusSession], now: DateTime<Utc>) -> Vec<FocusSession> {
        sessions_in_window(sessions, now, self.config.window_days)
    }
}

fn total_score(scores: impl IntoIterator<Item = u8>) -> u64 {
    scores.into_iter().map(u64::from).sum()
}

/// Sessions whose start lies in `(now - window_days, now]`.
///
/// A window reaching past the earliest representable instant keeps every
/// session up to `now`.
pub fn sessions_in_window(
    sessions: &[FocusSession],
    now: DateTime<Utc>,
    window_days: u32,
) -> Vec<FocusSession> {
    let since = now.checked_sub_signed(Duration::days(i64::from(window_days)));
    sessions
        .iter()
        .filter(|s| since.map_or(true, |since| s.start_time > since) && s.start_time <= now)
        .cloned()
        .collect()
}
