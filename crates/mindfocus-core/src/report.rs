//! Focus analytics report.
//!
//! Bundles the numbers a dashboard or insight generator needs into one
//! serializable value: window statistics, the weekly score and streaks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::scoring::{WeeklyScore, WeeklyScoreAggregator};
use crate::session::FocusSession;
use crate::storage::Config;
use crate::streak::{Clock, StreakCalculator, StreakSummary};

/// Analytics over a rolling window plus all-time streaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusReport {
    pub generated_at: DateTime<Utc>,
    /// Length of the window the statistics below cover
    pub window_days: u32,
    /// Sessions started inside the window
    pub session_count: usize,
    pub completed_sessions: usize,
    /// Completed over total (0.0 to 1.0)
    pub completion_rate: f64,
    pub total_focus_minutes: f64,
    pub average_distractions: f64,
    pub average_session_score: f64,
    pub weekly: WeeklyScore,
    /// Computed over the full history, not just the window
    pub streak: StreakSummary,
}

/// Produces [`FocusReport`]s from a session history.
#[derive(Debug, Clone)]
pub struct FocusReporter<C> {
    aggregator: WeeklyScoreAggregator,
    streaks: StreakCalculator<C>,
}

impl<C: Clock> FocusReporter<C> {
    pub fn new(aggregator: WeeklyScoreAggregator, streaks: StreakCalculator<C>) -> Self {
        Self {
            aggregator,
            streaks,
        }
    }

    /// Build every component from a validated configuration.
    ///
    /// # Errors
    /// Returns an error if any configuration section is invalid.
    pub fn from_config(config: &Config, clock: C) -> Result<Self> {
        Ok(Self::new(
            config.weekly_aggregator()?,
            config.streak_calculator(clock)?,
        ))
    }

    pub fn report(&self, sessions: &[FocusSession]) -> FocusReport {
        let now = self.streaks.clock().now();
        let window = self.aggregator.window(sessions, now);
        let count = window.len();

        let completed_sessions = window.iter().filter(|s| s.is_completed()).count();
        let total_focus_minutes: f64 = window.iter().map(FocusSession::measured_duration).sum();
        let total_distractions: u64 = window.iter().map(|s| u64::from(s.distractions())).sum();

        let weekly = self.aggregator.breakdown(&window);
        let streak = self.streaks.summary(sessions);

        tracing::debug!(
            total = sessions.len(),
            in_window = count,
            weekly = weekly.score,
            current_streak = streak.current,
            "built focus report"
        );

        FocusReport {
            generated_at: now,
            window_days: self.aggregator.config().window_days,
            session_count: count,
            completed_sessions,
            completion_rate: ratio(completed_sessions as f64, count),
            total_focus_minutes,
            average_distractions: ratio(total_distractions as f64, count),
            average_session_score: weekly.mean_session_score,
            weekly,
            streak,
        }
    }
}

fn ratio(numerator: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        numerator / count as f64
    }
}
