//! Streak analytics.
//!
//! Streaks are computed fresh from a session list on every call; nothing is
//! persisted between calls.

mod calculator;
mod clock;

pub use calculator::{StreakCalculator, StreakConfig, StreakSummary};
pub use clock::{Clock, FixedClock, SystemClock};
