//! Canonical focus session record.
//!
//! This is the single input shape the calculators accept. Stored records
//! with other field names are adapted at the boundary before they reach
//! this type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A completed or in-progress focus session.
///
/// Only `start_time` is required. The scoring fields are optional and read
/// through accessors that fall back to their neutral value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusSession {
    /// When the session began
    pub start_time: DateTime<Utc>,
    /// When the session ended; `None` while in progress
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Actual focused time in minutes; `None` or 0 means not yet measured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
    /// Whether the session's task was marked done
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_completed: Option<bool>,
    /// Number of distraction events logged during the session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distraction_count: Option<u32>,
}

impl FocusSession {
    /// Create an unmeasured, in-progress session starting at `start_time`.
    pub fn started_at(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time: None,
            duration_minutes: None,
            task_completed: None,
            distraction_count: None,
        }
    }

    pub fn ended_at(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn with_duration(mut self, minutes: f64) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn with_distractions(mut self, count: u32) -> Self {
        self.distraction_count = Some(count);
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.task_completed = Some(completed);
        self
    }

    /// Measured duration in minutes.
    ///
    /// Absent, negative and non-finite values all read as 0.
    pub fn measured_duration(&self) -> f64 {
        match self.duration_minutes {
            Some(m) if m.is_finite() && m > 0.0 => m,
            _ => 0.0,
        }
    }

    pub fn distractions(&self) -> u32 {
        self.distraction_count.unwrap_or(0)
    }

    pub fn is_completed(&self) -> bool {
        self.task_completed.unwrap_or(false)
    }

    pub fn is_in_progress(&self) -> bool {
        self.end_time.is_none()
    }

    /// Check the record for values a well-behaved collaborator never sends.
    ///
    /// # Errors
    /// - [`ValidationError::InvalidTimeRange`] if `end_time` precedes `start_time`
    /// - [`ValidationError::InvalidValue`] if the duration is negative or not finite
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(end) = self.end_time {
            if end < self.start_time {
                return Err(ValidationError::InvalidTimeRange {
                    start: self.start_time,
                    end,
                });
            }
        }

        if let Some(minutes) = self.duration_minutes {
            if !minutes.is_finite() || minutes < 0.0 {
                return Err(ValidationError::invalid(
                    "duration_minutes",
                    format!("must be a non-negative number, got {minutes}"),
                ));
            }
        }

        Ok(())
    }
}
