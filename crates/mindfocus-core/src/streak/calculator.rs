//! Current and longest streaks of active days.
//!
//! An active day is a calendar day with at least one session. Every instant,
//! including "now", is mapped to a calendar day through one fixed UTC offset
//! chosen when the calculator is built, so a single call never mixes
//! timezones.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use crate::error::ValidationError;
use crate::session::FocusSession;

/// Current and longest streak, in days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub current: u32,
    pub longest: u32,
}

/// Day-boundary settings for streak calculations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakConfig {
    /// Offset from UTC, in minutes, that defines where a day starts.
    /// `None` uses the host's local offset, resolved once.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

impl StreakConfig {
    /// Resolve the configured offset.
    ///
    /// # Errors
    /// Returns an error if the offset is a day or more away from UTC.
    pub fn resolve_offset(&self) -> Result<FixedOffset, ValidationError> {
        match self.utc_offset_minutes {
            None => Ok(Local::now().offset().fix()),
            Some(minutes) => minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .ok_or_else(|| {
                    ValidationError::invalid(
                        "utc_offset_minutes",
                        format!("{minutes} is not a valid UTC offset"),
                    )
                }),
        }
    }
}

/// Derives streaks from session start times.
#[derive(Debug, Clone)]
pub struct StreakCalculator<C> {
    clock: C,
    offset: FixedOffset,
}

impl<C: Clock> StreakCalculator<C> {
    /// Calculator whose days run midnight to midnight UTC.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            offset: Utc.fix(),
        }
    }

    /// Calculator whose days run midnight to midnight at `offset`.
    pub fn with_offset(clock: C, offset: FixedOffset) -> Self {
        Self { clock, offset }
    }

    /// # Errors
    /// Returns an error if the configured offset is invalid.
    pub fn from_config(clock: C, config: &StreakConfig) -> Result<Self, ValidationError> {
        Ok(Self::with_offset(clock, config.resolve_offset()?))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Calendar day of `instant` at this calculator's offset.
    pub fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.day_of(self.clock.now())
    }

    /// Consecutive active days ending today or yesterday.
    ///
    /// A streak whose last session was yesterday is still alive. Several
    /// sessions on one day count once. The backward walk stops at the first
    /// gap, so older history never affects the result. Sessions dated after
    /// today are ignored.
    pub fn calculate_current_streak(&self, sessions: &[FocusSession]) -> u32 {
        let today = self.today();

        let mut days: Vec<NaiveDate> = sessions
            .iter()
            .map(|s| self.day_of(s.start_time))
            .filter(|day| *day <= today)
            .collect();
        days.sort_unstable_by(|a, b| b.cmp(a));

        let Some((&latest, older)) = days.split_first() else {
            return 0;
        };

        let since_latest = (today - latest).num_days();
        if since_latest > 1 {
            tracing::debug!(%latest, %today, "streak broken, last active day too old");
            return 0;
        }

        let mut streak = 1;
        let mut tracked = latest;
        for &day in older {
            match (tracked - day).num_days() {
                0 => continue,
                1 => {
                    streak += 1;
                    tracked = day;
                }
                gap => {
                    tracing::trace!(%day, gap, streak, "streak walk stopped at gap");
                    break;
                }
            }
        }

        streak
    }

    /// Longest run of consecutive active days anywhere in the history.
    pub fn calculate_longest_streak(&self, sessions: &[FocusSession]) -> u32 {
        let days: BTreeSet<NaiveDate> = sessions.iter().map(|s| self.day_of(s.start_time)).collect();

        let mut longest = 0;
        let mut run = 0;
        let mut previous: Option<NaiveDate> = None;

        for day in days {
            run = match previous {
                Some(prev) if (day - prev).num_days() == 1 => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            previous = Some(day);
        }

        longest
    }

    pub fn summary(&self, sessions: &[FocusSession]) -> StreakSummary {
        StreakSummary {
            current: self.calculate_current_streak(sessions),
            longest: self.calculate_longest_streak(sessions),
        }
    }
}
