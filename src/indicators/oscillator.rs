//! Momentum oscillators: Wilder RSI, Stochastic-Fast, MACD

use crate::indicators::average::{ExponentialMovingAverage, SimpleMovingAverage};
use crate::types::Bar;
use std::collections::VecDeque;

/// Relative Strength Index with Wilder smoothing
///
/// The first average gain/loss is the simple mean of the first `period`
/// changes; subsequent averages use `(prev * (period - 1) + current) / period`.
/// `RSI = 100 - 100 / (1 + RS)` with `RS = avg_gain / avg_loss`; a zero
/// average loss yields RSI 100. The first `period` entries are undefined.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    prev_value: Option<f64>,
    seed_gain: f64,
    seed_loss: f64,
    changes_seen: usize,
    averages: Option<(f64, f64)>,
}

impl Rsi {
    /// Create new RSI with given period
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "period must be greater than 0");
        Self {
            period,
            prev_value: None,
            seed_gain: 0.0,
            seed_loss: 0.0,
            changes_seen: 0,
            averages: None,
        }
    }

    /// Bars required before the first defined output
    pub fn lookback(period: usize) -> usize {
        period
    }

    /// Update with a new value and compute RSI
    pub fn update(&mut self, value: f64) -> Option<f64> {
        let prev = match self.prev_value.replace(value) {
            Some(prev) => prev,
            None => return None,
        };

        let change = value - prev;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        let (avg_gain, avg_loss) = match self.averages {
            Some((prev_gain, prev_loss)) => {
                // Wilder smoothing
                let n = self.period as f64;
                (
                    (prev_gain * (n - 1.0) + gain) / n,
                    (prev_loss * (n - 1.0) + loss) / n,
                )
            }
            None => {
                self.seed_gain += gain;
                self.seed_loss += loss;
                self.changes_seen += 1;
                if self.changes_seen < self.period {
                    return None;
                }
                let n = self.period as f64;
                (self.seed_gain / n, self.seed_loss / n)
            }
        };
        self.averages = Some((avg_gain, avg_loss));

        if avg_loss == 0.0 {
            return Some(100.0);
        }
        let rs = avg_gain / avg_loss;
        Some(100.0 - 100.0 / (1.0 + rs))
    }

    /// Compute RSI for a slice of values
    pub fn compute(period: usize, values: &[f64]) -> Vec<Option<f64>> {
        let mut rsi = Self::new(period);
        values.iter().map(|&v| rsi.update(v)).collect()
    }
}

/// Stochastic-Fast oscillator (%K and its smoothing %D)
///
/// `%K = 100 * (close - lowest_low) / (highest_high - lowest_low)` over the
/// trailing `period` bars, 50 when the range is zero. `%D` is the simple
/// moving average of `%K` over `smoothing` bars.
#[derive(Debug, Clone)]
pub struct StochasticFast {
    period: usize,
    highs: VecDeque<f64>,
    lows: VecDeque<f64>,
    smoother: SimpleMovingAverage,
}

impl StochasticFast {
    /// Default %D smoothing length
    pub const DEFAULT_SMOOTHING: usize = 3;

    /// Create new Stochastic-Fast with lookback `period` and %D `smoothing`
    pub fn new(period: usize, smoothing: usize) -> Self {
        assert!(period > 0 && smoothing > 0, "periods must be greater than 0");
        Self {
            period,
            highs: VecDeque::with_capacity(period),
            lows: VecDeque::with_capacity(period),
            smoother: SimpleMovingAverage::new(smoothing),
        }
    }

    /// Bars required before the first defined %K
    pub fn lookback_k(period: usize) -> usize {
        period - 1
    }

    /// Bars required before the first defined %D
    pub fn lookback_d(period: usize, smoothing: usize) -> usize {
        period + smoothing - 2
    }

    /// Update with a new bar's high/low/close, returns (%K, %D)
    pub fn update(&mut self, high: f64, low: f64, close: f64) -> (Option<f64>, Option<f64>) {
        self.highs.push_back(high);
        self.lows.push_back(low);
        if self.highs.len() > self.period {
            self.highs.pop_front();
            self.lows.pop_front();
        }

        if self.highs.len() < self.period {
            return (None, None);
        }

        let highest = self.highs.iter().copied().fold(f64::MIN, f64::max);
        let lowest = self.lows.iter().copied().fold(f64::MAX, f64::min);
        let range = highest - lowest;
        let k = if range == 0.0 {
            50.0
        } else {
            100.0 * (close - lowest) / range
        };
        let d = self.smoother.update(k);
        (Some(k), d)
    }

    /// Compute (%K, %D) columns for a bar slice
    pub fn compute(
        period: usize,
        smoothing: usize,
        bars: &[Bar],
    ) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
        let mut stoch = Self::new(period, smoothing);
        let mut fastk = Vec::with_capacity(bars.len());
        let mut fastd = Vec::with_capacity(bars.len());
        for bar in bars {
            let (k, d) = stoch.update(bar.high, bar.low, bar.close);
            fastk.push(k);
            fastd.push(d);
        }
        (fastk, fastd)
    }
}

/// Moving Average Convergence Divergence
///
/// `macd = EMA(close, fast) - EMA(close, slow)`, `signal = EMA(macd, signal)`.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_ema: ExponentialMovingAverage,
    slow_ema: ExponentialMovingAverage,
    signal_ema: ExponentialMovingAverage,
}

impl Macd {
    /// Create MACD with custom parameters
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            fast_ema: ExponentialMovingAverage::new(fast),
            slow_ema: ExponentialMovingAverage::new(slow),
            signal_ema: ExponentialMovingAverage::new(signal),
        }
    }

    /// Bars required before the first defined MACD line
    pub fn lookback_macd(slow: usize) -> usize {
        slow - 1
    }

    /// Bars required before the first defined signal line
    pub fn lookback_signal(slow: usize, signal: usize) -> usize {
        slow + signal - 2
    }

    /// Update with a new value, returns (MACD line, signal line)
    pub fn update(&mut self, value: f64) -> (Option<f64>, Option<f64>) {
        let fast = self.fast_ema.update(value);
        let slow = self.slow_ema.update(value);
        let macd = match (fast, slow) {
            (Some(fast), Some(slow)) => fast - slow,
            _ => return (None, None),
        };
        let signal = self.signal_ema.update(macd);
        (Some(macd), signal)
    }

    /// Compute (macd, signal) columns for a slice of values
    pub fn compute(
        fast: usize,
        slow: usize,
        signal: usize,
        values: &[f64],
    ) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
        let mut macd = Self::new(fast, slow, signal);
        let mut line = Vec::with_capacity(values.len());
        let mut sig = Vec::with_capacity(values.len());
        for &v in values {
            let (m, s) = macd.update(v);
            line.push(m);
            sig.push(s);
        }
        (line, sig)
    }
}

impl Default for Macd {
    /// Standard (12, 26, 9) parameters
    fn default() -> Self {
        Self::new(12, 26, 9)
    }
}
