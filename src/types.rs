//! Core types and aliases

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp type used throughout the library
pub type Timestamp = DateTime<Utc>;

/// Pair identifier, e.g. "BTC/USDT"
pub type Pair = String;

/// Price type
pub type Price = f64;

/// Quantity/volume type
pub type Quantity = f64;

/// OHLCV bar data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: Timestamp,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Quantity,
}

impl Bar {
    /// Create a new bar
    pub fn new(
        timestamp: Timestamp,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Quantity,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Get typical price (HLC/3)
    pub fn typical_price(&self) -> Price {
        (self.high + self.low + self.close) / 3.0
    }

    /// Get price range (high - low)
    pub fn range(&self) -> Price {
        self.high - self.low
    }

    /// Check OHLC relationships: high is the top, low is the bottom
    pub fn is_valid(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.volume >= 0.0
    }
}
