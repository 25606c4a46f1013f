//! Candle timeframes and duration math

use crate::error::{PipelineError, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Candle timeframe enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    /// 1-minute candles
    M1,
    /// 5-minute candles
    M5,
    /// 15-minute candles
    M15,
    /// 30-minute candles
    M30,
    /// 1-hour candles
    H1,
    /// 4-hour candles
    H4,
    /// Daily candles
    D1,
}

impl Timeframe {
    /// Get the duration of one candle at this timeframe
    pub fn duration(&self) -> Duration {
        Duration::minutes(self.minutes())
    }

    /// Get the timeframe length in minutes
    pub fn minutes(&self) -> i64 {
        match self {
            Timeframe::M1 => 1,
            Timeframe::M5 => 5,
            Timeframe::M15 => 15,
            Timeframe::M30 => 30,
            Timeframe::H1 => 60,
            Timeframe::H4 => 240,
            Timeframe::D1 => 1440,
        }
    }

    /// Check if this timeframe is coarser (longer candles) than another
    pub fn is_coarser_than(&self, other: Timeframe) -> bool {
        self.minutes() > other.minutes()
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M1 => "1m",
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::M30 => "30m",
            Timeframe::H1 => "1h",
            Timeframe::H4 => "4h",
            Timeframe::D1 => "1d",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "1m" => Ok(Timeframe::M1),
            "5m" => Ok(Timeframe::M5),
            "15m" => Ok(Timeframe::M15),
            "30m" => Ok(Timeframe::M30),
            "1h" | "60m" => Ok(Timeframe::H1),
            "4h" => Ok(Timeframe::H4),
            "1d" | "24h" => Ok(Timeframe::D1),
            _ => Err(PipelineError::InvalidTimeframe(s.to_string())),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Timeframe {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        Timeframe::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        assert_eq!(Timeframe::M15.duration(), Duration::minutes(15));
        assert_eq!(Timeframe::H1.duration(), Duration::hours(1));
        assert_eq!(Timeframe::D1.duration(), Duration::days(1));
    }

    #[test]
    fn test_is_coarser_than() {
        assert!(Timeframe::H1.is_coarser_than(Timeframe::M15));
        assert!(Timeframe::D1.is_coarser_than(Timeframe::H4));
        assert!(!Timeframe::M15.is_coarser_than(Timeframe::H1));
        assert!(!Timeframe::H1.is_coarser_than(Timeframe::H1));
    }

    #[test]
    fn test_parse() {
        assert_eq!(Timeframe::parse("15m").unwrap(), Timeframe::M15);
        assert_eq!(Timeframe::parse("1h").unwrap(), Timeframe::H1);
        assert_eq!(Timeframe::parse("1D").unwrap(), Timeframe::D1);
        assert!(Timeframe::parse("7m").is_err());
    }

    #[test]
    fn test_roundtrip_display() {
        for tf in [
            Timeframe::M1,
            Timeframe::M5,
            Timeframe::M15,
            Timeframe::M30,
            Timeframe::H1,
            Timeframe::H4,
            Timeframe::D1,
        ] {
            assert_eq!(Timeframe::parse(tf.as_str()).unwrap(), tf);
        }
    }
}
