//! TOML-based application configuration.
//!
//! Stores the tunable parameters of the analytics core:
//! - Session score weights and duration thresholds
//! - Weekly window length and consistency multiplier
//! - The UTC offset that defines calendar days for streaks
//!
//! Configuration is stored at `~/.config/mindfocus/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result, ValidationError};
use crate::scoring::{ScoringConfig, SessionScoreCalculator, WeeklyConfig, WeeklyScoreAggregator};
use crate::streak::{Clock, StreakCalculator, StreakConfig};

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/mindfocus/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub weekly: WeeklyConfig,
    #[serde(default)]
    pub streak: StreakConfig,
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                _ if value == "null" => serde_json::Value::Null,
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => parse_number(value).ok_or_else(|| {
                    invalid(format!("cannot parse '{value}' as number"))
                })?,
                serde_json::Value::Null => serde_json::from_str(value)
                    .unwrap_or_else(|_| serde_json::Value::String(value.into())),
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                serde_json::Value::String(_) => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location or return (and persist) defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read, parsed
    /// or validated, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        match Self::load_from(&path) {
            Err(CoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, writing defaults");
                let cfg = Self::default();
                cfg.save_to(&path)?;
                Ok(cfg)
            }
            other => other,
        }
    }

    /// Load and validate the config at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] if the file cannot be read, a
    /// [`ConfigError::LoadFailed`] if it is not valid TOML, and a
    /// [`ValidationError`] if the values are out of range.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Location of the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn file_path() -> Result<PathBuf> {
        Self::path()
    }

    /// # Errors
    /// Returns the first violated constraint across all sections.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        self.scoring.validate()?;
        self.weekly.validate()?;
        self.streak.resolve_offset()?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key.
    ///
    /// The change is applied only if the resulting configuration is still
    /// valid; it is not written to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the new configuration fails validation.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Session scorer built from the scoring section.
    ///
    /// # Errors
    /// Returns an error if the scoring section is invalid.
    pub fn session_scorer(&self) -> Result<SessionScoreCalculator> {
        Ok(SessionScoreCalculator::try_new(self.scoring.clone())?)
    }

    /// Weekly aggregator built from the scoring and weekly sections.
    ///
    /// # Errors
    /// Returns an error if either section is invalid.
    pub fn weekly_aggregator(&self) -> Result<WeeklyScoreAggregator> {
        Ok(WeeklyScoreAggregator::try_with_config(
            self.session_scorer()?,
            self.weekly.clone(),
        )?)
    }

    /// Streak calculator using the configured day boundary.
    ///
    /// # Errors
    /// Returns an error if the configured offset is invalid.
    pub fn streak_calculator<C: Clock>(&self, clock: C) -> Result<StreakCalculator<C>> {
        Ok(StreakCalculator::from_config(clock, &self.streak)?)
    }
}

fn parse_number(value: &str) -> Option<serde_json::Value> {
    if let Ok(n) = value.parse::<u64>() {
        Some(serde_json::Value::Number(n.into()))
    } else if let Ok(n) = value.parse::<i64>() {
        Some(serde_json::Value::Number(n.into()))
    } else {
        value
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert!(!toml_str.contains("utc_offset_minutes"));
    }

    #[test]
    fn partial_file_uses_defaults_for_the_rest() {
        let cfg: Config = toml::from_str(indoc! {r#"
            [scoring]
            target_duration_minutes = 50.0

            [streak]
            utc_offset_minutes = 540
        "#})
        .unwrap();

        assert_eq!(cfg.scoring.target_duration_minutes, 50.0);
        assert_eq!(cfg.scoring.weights.completion, 0.4);
        assert_eq!(cfg.weekly.window_days, 7);
        assert_eq!(cfg.streak.utc_offset_minutes, Some(540));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("scoring.weights.completion").as_deref(), Some("0.4"));
        assert_eq!(cfg.get("weekly.window_days").as_deref(), Some("7"));
        assert_eq!(cfg.get("streak.utc_offset_minutes").as_deref(), Some("null"));
        assert!(cfg.get("scoring.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("scoring.target_duration_minutes", "50").unwrap();
        assert_eq!(cfg.scoring.target_duration_minutes, 50.0);

        cfg.set("weekly.window_days", "14").unwrap();
        assert_eq!(cfg.weekly.window_days, 14);
    }

    #[test]
    fn set_accepts_negative_offset_and_null() {
        let mut cfg = Config::default();
        cfg.set("streak.utc_offset_minutes", "-300").unwrap();
        assert_eq!(cfg.streak.utc_offset_minutes, Some(-300));

        cfg.set("streak.utc_offset_minutes", "null").unwrap();
        assert_eq!(cfg.streak.utc_offset_minutes, None);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set("scoring.nonexistent_key", "1").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("weekly.window_days", "lots").is_err());
        assert!(cfg.set("weekly.window_days", "-3").is_err());
        assert_eq!(cfg.weekly.window_days, 7);
    }

    #[test]
    fn set_rejects_window_beyond_bound() {
        let mut cfg = Config::default();
        let err = cfg.set("weekly.window_days", "4000000000").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidValue { .. })
        ));
        assert_eq!(cfg.weekly.window_days, 7);
    }

    #[test]
    fn set_rejects_change_that_breaks_weight_sum() {
        let mut cfg = Config::default();
        let err = cfg.set("scoring.weights.completion", "0.5").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::WeightSum { .. })
        ));
        assert_eq!(cfg.scoring.weights.completion, 0.4);
    }

    #[test]
    fn set_accepts_whole_weights_object() {
        let mut cfg = Config::default();
        cfg.set(
            "scoring.weights",
            r#"{"completion":0.5,"distraction":0.2,"duration":0.2,"consistency":0.1}"#,
        )
        .unwrap();
        assert_eq!(cfg.scoring.weights.completion, 0.5);
        assert_eq!(cfg.scoring.weights.distraction, 0.2);
    }

    #[test]
    fn save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.set("weekly.window_days", "30").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.weekly.window_days, 30);
    }

    #[test]
    fn load_from_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scoring\nweights = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::LoadFailed { .. })));
    }

    #[test]
    fn load_from_rejects_invalid_weights() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            indoc! {r#"
                [scoring.weights]
                completion = 0.9
                distraction = 0.3
                duration = 0.2
                consistency = 0.1
            "#},
        )
        .unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn load_from_missing_file_is_io_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, CoreError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
    }

    #[test]
    fn builds_calculators_from_sections() {
        let cfg = Config {
            streak: StreakConfig {
                utc_offset_minutes: Some(60),
            },
            ..Config::default()
        };
        assert!(cfg.session_scorer().is_ok());
        assert_eq!(cfg.weekly_aggregator().unwrap().config().window_days, 7);

        let clock = crate::streak::FixedClock(chrono::Utc::now());
        let streaks = cfg.streak_calculator(clock).unwrap();
        assert_eq!(streaks.offset().local_minus_utc(), 3600);
    }
}
