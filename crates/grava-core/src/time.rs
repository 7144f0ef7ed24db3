//! Cache-window durations and the free-form time-unit notation parser.
//!
//! All durations are normalized to milliseconds before storage so freshness
//! checks compare a single canonical granularity.

use std::fmt;
use std::time::Duration;

use grava_util::errors::StrategyError;
use serde::{Deserialize, Serialize};

/// Time units accepted by cache-window configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Milliseconds in `amount` of this unit.
    pub fn millis(self, amount: u64) -> u64 {
        let factor: u64 = match self {
            TimeUnit::Milliseconds => 1,
            TimeUnit::Seconds => 1_000,
            TimeUnit::Minutes => 60 * 1_000,
            TimeUnit::Hours => 60 * 60 * 1_000,
            TimeUnit::Days => 24 * 60 * 60 * 1_000,
        };
        amount.saturating_mul(factor)
    }

    /// Parse a free-form unit notation, case-insensitive, singular or plural.
    pub fn parse(unit: &str) -> Result<Self, StrategyError> {
        match unit.trim().to_lowercase().as_str() {
            "ms" | "milli" | "millis" | "millisecond" | "milliseconds" => {
                Ok(TimeUnit::Milliseconds)
            }
            "s" | "sec" | "second" | "seconds" => Ok(TimeUnit::Seconds),
            "m" | "min" | "minute" | "minutes" => Ok(TimeUnit::Minutes),
            "h" | "hour" | "hours" => Ok(TimeUnit::Hours),
            "d" | "day" | "days" => Ok(TimeUnit::Days),
            other => Err(StrategyError::InvalidDuration {
                message: format!("unrecognized time unit '{other}'"),
            }),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeUnit::Milliseconds => "milliseconds",
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
        };
        f.write_str(s)
    }
}

/// A cache window normalized to milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedDuration {
    millis: u64,
}

impl NormalizedDuration {
    /// Normalize `amount` of `unit`. The amount must be positive; zero or
    /// negative windows are rejected rather than treated as "never cache".
    pub fn new(amount: i64, unit: TimeUnit) -> Result<Self, StrategyError> {
        if amount <= 0 {
            return Err(StrategyError::InvalidDuration {
                message: format!("amount must be positive, got {amount}"),
            });
        }
        Ok(Self {
            millis: unit.millis(amount as u64),
        })
    }

    /// Parse a free-form `(amount, unit)` notation pair.
    pub fn parse(amount: i64, unit: &str) -> Result<Self, StrategyError> {
        Self::new(amount, TimeUnit::parse(unit)?)
    }

    /// Construct directly from the canonical granularity. Positivity is
    /// enforced at the notation/configuration boundary, not here.
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    pub fn as_millis(&self) -> u64 {
        self.millis
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.millis)
    }
}

impl fmt::Display for NormalizedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.millis)
    }
}
