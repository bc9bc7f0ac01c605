//! Focus scoring.
//!
//! This module scores individual focus sessions from weighted factors and
//! aggregates those scores over a rolling window.

mod config;
mod session;
mod weekly;

pub use config::{ScoreWeights, ScoringConfig, WeeklyConfig};
pub use session::{ScoreFactors, SessionScore, SessionScoreCalculator};
pub use weekly::{sessions_in_window, WeeklyScore, WeeklyScoreAggregator};
