//! # MindFocus Core Library
//!
//! Pure analytics for focus sessions: a 0-100 score per session, a weekly
//! aggregate that rewards consistency, and current/longest streaks of active
//! days.
//!
//! ## Architecture
//!
//! - **Scoring**: weighted factors per session, aggregated over a rolling
//!   window. All parameters live in a validated [`ScoringConfig`].
//! - **Streaks**: calendar-day runs derived from session start times, using an
//!   injected [`Clock`] and one fixed UTC offset per calculator.
//! - **Report**: one serializable summary combining both.
//! - **Storage**: TOML configuration file.
//!
//! Every calculator is a pure function of its inputs; nothing is cached or
//! mutated between calls, so they can be shared freely across threads.

pub mod error;
pub mod report;
pub mod scoring;
pub mod session;
pub mod storage;
pub mod streak;

pub use error::{ConfigError, CoreError, ValidationError};
pub use report::{FocusReport, FocusReporter};
pub use scoring::{
    ScoreFactors, ScoreWeights, ScoringConfig, SessionScore, SessionScoreCalculator,
    WeeklyConfig, WeeklyScore, WeeklyScoreAggregator,
};
pub use session::FocusSession;
pub use storage::Config;
pub use streak::{Clock, FixedClock, StreakCalculator, StreakConfig, StreakSummary, SystemClock};
