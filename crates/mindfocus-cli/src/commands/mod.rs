pub mod completions;
pub mod config;
pub mod report;
pub mod score;
pub mod streak;
pub mod weekly;

use chrono::{DateTime, FixedOffset, Utc};
use mindfocus_core::{Clock, Config, FixedClock, StreakCalculator, SystemClock};

/// State shared by every command invocation.
pub struct Context {
    clock: Box<dyn Clock>,
}

impl Context {
    /// Pinned clock when `--now` was given, wall clock otherwise.
    pub fn new(now: Option<DateTime<Utc>>) -> Self {
        let clock: Box<dyn Clock> = match now {
            Some(instant) => Box::new(FixedClock(instant)),
            None => Box::new(SystemClock),
        };
        Self { clock }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Load the config file and fix the day boundary for this run.
    pub fn settings(&self) -> Result<Settings, Box<dyn std::error::Error>> {
        Settings::from_config(Config::load()?)
    }
}

/// Loaded configuration with its UTC offset resolved exactly once.
///
/// Naive input timestamps and streak days both use `offset`, so a DST
/// change during the run cannot split them.
pub struct Settings {
    pub config: Config,
    pub offset: FixedOffset,
}

impl Settings {
    pub fn from_config(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let offset = config.streak.resolve_offset()?;
        Ok(Self { config, offset })
    }

    pub fn streak_calculator<C: Clock>(&self, clock: C) -> StreakCalculator<C> {
        StreakCalculator::with_offset(clock, self.offset)
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
