//! Session records as stored by the backend, adapted to [`FocusSession`].
//!
//! Stored rows use either snake_case or camelCase column names and a few
//! legacy aliases (`duration`, `completed`, `distractions`). Those names are
//! resolved here so the core only ever sees the canonical shape.

use std::io::Read;
use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use clap::Args;
use mindfocus_core::FocusSession;
use serde::Deserialize;

/// Where to read session records from.
#[derive(Args)]
pub struct SessionInput {
    /// JSON file holding an array of session records (stdin when omitted or "-")
    #[arg(long, short)]
    file: Option<PathBuf>,
}

impl SessionInput {
    /// Read and adapt every record, skipping malformed ones.
    ///
    /// Timestamps without a zone are read at `offset`.
    pub fn load(&self, offset: FixedOffset) -> Result<Vec<FocusSession>, Box<dyn std::error::Error>> {
        let raw = match &self.file {
            Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?,
            _ => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            }
        };

        let (sessions, skipped) = parse_records(&raw, offset)?;
        if skipped > 0 {
            eprintln!("warning: skipped {skipped} malformed session record(s)");
        }
        Ok(sessions)
    }
}

#[derive(Debug, Deserialize)]
struct StoredSession {
    #[serde(alias = "startTime")]
    start_time: String,
    #[serde(default, alias = "endTime")]
    end_time: Option<String>,
    #[serde(default, alias = "duration")]
    duration_minutes: Option<f64>,
    #[serde(default, alias = "taskCompleted", alias = "completed")]
    task_completed: Option<bool>,
    #[serde(default, alias = "distractionCount", alias = "distractions")]
    distraction_count: Option<u32>,
}

impl StoredSession {
    fn into_session(self, offset: FixedOffset) -> Result<FocusSession, String> {
        let start_time = parse_timestamp(&self.start_time, offset)?;
        let end_time = self
            .end_time
            .as_deref()
            .map(|s| parse_timestamp(s, offset))
            .transpose()?;

        let session = FocusSession {
            start_time,
            end_time,
            duration_minutes: self.duration_minutes,
            task_completed: self.task_completed,
            distraction_count: self.distraction_count,
        };
        session.validate().map_err(|e| e.to_string())?;
        Ok(session)
    }
}

/// Parse a JSON array of stored records.
///
/// Returns the adapted sessions and the number of records dropped. Only a
/// document that is not a JSON array is an error.
fn parse_records(
    raw: &str,
    offset: FixedOffset,
) -> Result<(Vec<FocusSession>, usize), serde_json::Error> {
    let values: Vec<serde_json::Value> = serde_json::from_str(raw)?;
    let total = values.len();

    let sessions: Vec<FocusSession> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let adapted = serde_json::from_value::<StoredSession>(value)
                .map_err(|e| e.to_string())
                .and_then(|stored| stored.into_session(offset));
            match adapted {
                Ok(session) => Some(session),
                Err(reason) => {
                    tracing::warn!(index, %reason, "skipping session record");
                    None
                }
            }
        })
        .collect();

    let skipped = total - sessions.len();
    Ok((sessions, skipped))
}

/// RFC 3339, Postgres-style `YYYY-MM-DD HH:MM:SS+HH`, or a zone-less
/// date-time read at `offset`.
fn parse_timestamp(s: &str, offset: FixedOffset) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Ok(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .and_then(|naive| offset.from_local_datetime(&naive).single())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| format!("unrecognized timestamp '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn instant(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn accepts_snake_and_camel_case_fields() {
        let raw = r#"[
            {"start_time": "2024-01-15T09:00:00Z", "duration_minutes": 25, "task_completed": true, "distraction_count": 1},
            {"startTime": "2024-01-16T09:00:00Z", "duration": 20, "taskCompleted": false, "distractionCount": 2},
            {"startTime": "2024-01-17T09:00:00Z", "completed": true, "distractions": 3}
        ]"#;

        let (sessions, skipped) = parse_records(raw, utc()).unwrap();

        assert_eq!(skipped, 0);
        assert_eq!(sessions.len(), 3);
        assert_eq!(sessions[0].distraction_count, Some(1));
        assert_eq!(sessions[1].duration_minutes, Some(20.0));
        assert_eq!(sessions[1].task_completed, Some(false));
        assert_eq!(sessions[2].task_completed, Some(true));
        assert_eq!(sessions[2].distraction_count, Some(3));
    }

    #[test]
    fn skips_malformed_records() {
        let raw = r#"[
            {"start_time": "2024-01-15T09:00:00Z"},
            {"start_time": "yesterday-ish"},
            {"duration": 25},
            {"start_time": "2024-01-15T10:00:00Z", "end_time": "2024-01-15T09:00:00Z"}
        ]"#;

        let (sessions, skipped) = parse_records(raw, utc()).unwrap();

        assert_eq!(sessions.len(), 1);
        assert_eq!(skipped, 3);
    }

    #[test]
    fn rejects_non_array_document() {
        assert!(parse_records(r#"{"start_time": "2024-01-15T09:00:00Z"}"#, utc()).is_err());
    }

    #[test]
    fn parses_timestamp_variants() {
        let expected = instant("2024-01-15T09:00:00Z");

        assert_eq!(parse_timestamp("2024-01-15T09:00:00Z", utc()).unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-15T10:00:00+01:00", utc()).unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-15 09:00:00+00", utc()).unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-15 09:00:00.000+00:00", utc()).unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-15T09:00:00", utc()).unwrap(), expected);
        assert!(parse_timestamp("15/01/2024", utc()).is_err());
    }

    #[test]
    fn naive_timestamps_use_the_given_offset() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(
            parse_timestamp("2024-01-15T09:00:00", tokyo).unwrap(),
            instant("2024-01-15T00:00:00Z")
        );
    }
}
