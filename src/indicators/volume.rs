//! Volume indicators: On-Balance Volume

use crate::types::Bar;

/// On-Balance Volume
///
/// Cumulative sum of signed volume: volume is added when the close rises,
/// subtracted when it falls, and ignored on an unchanged close. Defined from
/// index 0 with an initial value of 0.
#[derive(Debug, Clone, Default)]
pub struct OnBalanceVolume {
    prev_close: Option<f64>,
    total: f64,
}

impl OnBalanceVolume {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bars required before the first defined output
    pub fn lookback() -> usize {
        0
    }

    /// Update with a new bar
    pub fn update(&mut self, bar: Bar) -> f64 {
        if let Some(prev) = self.prev_close {
            if bar.close > prev {
                self.total += bar.volume;
            } else if bar.close < prev {
                self.total -= bar.volume;
            }
        }
        self.prev_close = Some(bar.close);
        self.total
    }

    /// Compute the OBV column for a bar slice
    pub fn compute(bars: &[Bar]) -> Vec<Option<f64>> {
        let mut obv = Self::new();
        bars.iter().map(|&bar| Some(obv.update(bar))).collect()
    }
}
