//! Moving averages: SMA, seeded EMA, TEMA

use std::collections::VecDeque;

/// Simple Moving Average (SMA)
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    window: usize,
    values: VecDeque<f64>,
}

impl SimpleMovingAverage {
    /// Create new SMA with given window size
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "window must be greater than 0");
        Self {
            window,
            values: VecDeque::with_capacity(window),
        }
    }

    /// Bars required before the first defined output
    pub fn lookback(window: usize) -> usize {
        window - 1
    }

    /// Add a value and compute the current SMA
    pub fn update(&mut self, value: f64) -> Option<f64> {
        self.values.push_back(value);

        if self.values.len() > self.window {
            self.values.pop_front();
        }

        if self.values.len() == self.window {
            Some(self.values.iter().sum::<f64>() / self.window as f64)
        } else {
            None
        }
    }

    /// Compute SMA for a slice of values
    pub fn compute(window: usize, values: &[f64]) -> Vec<Option<f64>> {
        let mut sma = Self::new(window);
        values.iter().map(|&v| sma.update(v)).collect()
    }

    /// Compute SMA over a series with an undefined prefix
    ///
    /// The window starts counting at the input's first defined entry, so
    /// the output's undefined prefix is the input's plus `window - 1`.
    pub fn compute_opt(window: usize, values: &[Option<f64>]) -> Vec<Option<f64>> {
        let mut sma = Self::new(window);
        values
            .iter()
            .map(|v| v.and_then(|v| sma.update(v)))
            .collect()
    }
}

/// Exponential Moving Average, seeded with the simple mean of the first
/// `period` values
///
/// `EMA_t = value_t * alpha + EMA_{t-1} * (1 - alpha)`, `alpha = 2/(period+1)`.
/// The first `period - 1` entries are undefined.
#[derive(Debug, Clone)]
pub struct ExponentialMovingAverage {
    period: usize,
    alpha: f64,
    seed_sum: f64,
    seed_count: usize,
    current: Option<f64>,
}

impl ExponentialMovingAverage {
    /// Create new EMA with given period
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "period must be greater than 0");
        Self {
            period,
            alpha: 2.0 / (period as f64 + 1.0),
            seed_sum: 0.0,
            seed_count: 0,
            current: None,
        }
    }

    /// Bars required before the first defined output
    pub fn lookback(period: usize) -> usize {
        period - 1
    }

    /// Update with a new value
    pub fn update(&mut self, value: f64) -> Option<f64> {
        match self.current {
            Some(prev) => {
                let ema = value * self.alpha + prev * (1.0 - self.alpha);
                self.current = Some(ema);
                Some(ema)
            }
            None => {
                self.seed_sum += value;
                self.seed_count += 1;
                if self.seed_count == self.period {
                    let seed = self.seed_sum / self.period as f64;
                    self.current = Some(seed);
                    Some(seed)
                } else {
                    None
                }
            }
        }
    }

    /// Get current EMA value
    pub fn current(&self) -> Option<f64> {
        self.current
    }

    /// Compute EMA for a slice of values
    pub fn compute(period: usize, values: &[f64]) -> Vec<Option<f64>> {
        let mut ema = Self::new(period);
        values.iter().map(|&v| ema.update(v)).collect()
    }

    /// Compute EMA over a series with an undefined prefix
    pub fn compute_opt(period: usize, values: &[Option<f64>]) -> Vec<Option<f64>> {
        let mut ema = Self::new(period);
        values
            .iter()
            .map(|v| v.and_then(|v| ema.update(v)))
            .collect()
    }
}

/// Triple Exponential Moving Average (TEMA)
///
/// `3*EMA1 - 3*EMA2 + EMA3` where EMA2 smooths EMA1 and EMA3 smooths EMA2.
/// First defined after `3 * (period - 1)` bars.
#[derive(Debug, Clone)]
pub struct Tema {
    ema1: ExponentialMovingAverage,
    ema2: ExponentialMovingAverage,
    ema3: ExponentialMovingAverage,
}

impl Tema {
    /// Create new TEMA with given period
    pub fn new(period: usize) -> Self {
        Self {
            ema1: ExponentialMovingAverage::new(period),
            ema2: ExponentialMovingAverage::new(period),
            ema3: ExponentialMovingAverage::new(period),
        }
    }

    /// Bars required before the first defined output
    pub fn lookback(period: usize) -> usize {
        3 * (period - 1)
    }

    /// Update with a new value
    pub fn update(&mut self, value: f64) -> Option<f64> {
        let e1 = self.ema1.update(value)?;
        let e2 = self.ema2.update(e1)?;
        let e3 = self.ema3.update(e2)?;
        Some(3.0 * e1 - 3.0 * e2 + e3)
    }

    /// Compute TEMA for a slice of values
    pub fn compute(period: usize, values: &[f64]) -> Vec<Option<f64>> {
        let mut tema = Self::new(period);
        values.iter().map(|&v| tema.update(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sma() {
        let mut sma = SimpleMovingAverage::new(3);

        assert_eq!(sma.update(1.0), None);
        assert_eq!(sma.update(2.0), None);
        assert_eq!(sma.update(3.0), Some(2.0));
        assert_eq!(sma.update(4.0), Some(3.0));
    }

    #[test]
    fn test_sma_opt_skips_undefined_prefix() {
        let input = vec![None, None, Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        let out = SimpleMovingAverage::compute_opt(3, &input);
        assert_eq!(out[..4], [None, None, None, None]);
        assert_eq!(out[4], Some(2.0));
        assert_eq!(out[5], Some(3.0));
    }

    #[test]
    fn test_ema_seed_is_simple_mean() {
        let out = ExponentialMovingAverage::compute(3, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_eq!(out[2], Some(2.0)); // (1+2+3)/3

        // alpha = 2/4 = 0.5 -> 4*0.5 + 2*0.5 = 3
        assert_relative_eq!(out[3].unwrap(), 3.0);
    }

    #[test]
    fn test_ema_lookback_exact() {
        let values: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let out = ExponentialMovingAverage::compute(21, &values);
        assert!(out[..20].iter().all(|v| v.is_none()));
        assert!(out[20..].iter().all(|v| v.is_some()));
    }

    #[test]
    fn test_ema_of_constant_is_constant() {
        let out = ExponentialMovingAverage::compute(5, &[42.0; 20]);
        for v in &out[4..] {
            assert_relative_eq!(v.unwrap(), 42.0);
        }
    }

    #[test]
    fn test_tema_lookback_and_constant_convergence() {
        let out = Tema::compute(5, &[42.0; 30]);
        let lookback = Tema::lookback(5);
        assert_eq!(lookback, 12);
        assert!(out[..lookback].iter().all(|v| v.is_none()));
        for v in &out[lookback..] {
            assert_relative_eq!(v.unwrap(), 42.0);
        }
    }

    #[test]
    fn test_tema_tracks_trend_tighter_than_ema() {
        // On a linear ramp TEMA compensates the EMA lag, so it should sit
        // closer to the raw value than a plain EMA.
        let values: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let tema = Tema::compute(10, &values);
        let ema = ExponentialMovingAverage::compute(10, &values);

        let last = values.len() - 1;
        let tema_err = (values[last] - tema[last].unwrap()).abs();
        let ema_err = (values[last] - ema[last].unwrap()).abs();
        assert!(tema_err < ema_err);
    }
}
