//! Candle series storage and rolling-window access
//!
//! A [`CandleSeries`] is the ordered, time-indexed OHLCV table for one
//! (pair, timeframe). Bars are validated on append: strictly increasing
//! timestamps, spacing an exact multiple of the timeframe duration, and
//! non-negative volume. The indicator pipeline only reads the series.

use crate::error::{PipelineError, Result};
use crate::timeframe::Timeframe;
use crate::types::{Bar, Pair, Timestamp};

/// Ordered OHLCV bar series for one (pair, timeframe)
#[derive(Debug, Clone)]
pub struct CandleSeries {
    pair: Pair,
    timeframe: Timeframe,
    bars: Vec<Bar>,
}

impl CandleSeries {
    /// Create a new empty series
    pub fn new(pair: impl Into<Pair>, timeframe: Timeframe) -> Self {
        Self {
            pair: pair.into(),
            timeframe,
            bars: Vec::new(),
        }
    }

    /// Build a series from bars, validating each append
    pub fn from_bars(
        pair: impl Into<Pair>,
        timeframe: Timeframe,
        bars: impl IntoIterator<Item = Bar>,
    ) -> Result<Self> {
        let mut series = Self::new(pair, timeframe);
        for bar in bars {
            series.append(bar)?;
        }
        Ok(series)
    }

    /// Append a bar to the series
    ///
    /// Fails with [`PipelineError::OutOfOrderBar`] if the timestamp is not
    /// strictly after the last stored bar, and with
    /// [`PipelineError::IrregularSpacing`] if the gap is not a positive
    /// integer multiple of the timeframe duration.
    pub fn append(&mut self, bar: Bar) -> Result<()> {
        if bar.volume < 0.0 {
            return Err(PipelineError::NegativeVolume {
                pair: self.pair.clone(),
                timestamp: bar.timestamp.to_rfc3339(),
            });
        }

        if let Some(last) = self.bars.last() {
            if bar.timestamp <= last.timestamp {
                return Err(PipelineError::OutOfOrderBar {
                    pair: self.pair.clone(),
                    timestamp: bar.timestamp.to_rfc3339(),
                });
            }
            let gap = bar.timestamp - last.timestamp;
            let step = self.timeframe.duration();
            let step_secs = step.num_seconds();
            if gap.num_seconds() % step_secs != 0 {
                return Err(PipelineError::IrregularSpacing {
                    pair: self.pair.clone(),
                    timestamp: bar.timestamp.to_rfc3339(),
                });
            }
        }

        self.bars.push(bar);
        Ok(())
    }

    pub fn pair(&self) -> &str {
        &self.pair
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Timestamp of the last stored bar
    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.bars.last().map(|b| b.timestamp)
    }

    /// Trailing window of up to `length` bars ending at `end_index` (inclusive)
    ///
    /// Returns fewer bars when there is insufficient history. Callers must
    /// treat short windows as producing undefined results, never as
    /// zero-filled ones.
    pub fn window(&self, end_index: usize, length: usize) -> &[Bar] {
        let end = (end_index + 1).min(self.bars.len());
        let start = end.saturating_sub(length);
        &self.bars[start..end]
    }

    /// Per-bar close prices
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Per-bar volumes
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Rolling maximum of `selector(bar)` over trailing `length` bars
    ///
    /// Entries before index `length - 1` are undefined.
    pub fn rolling_max(&self, length: usize, selector: impl Fn(&Bar) -> f64) -> Vec<Option<f64>> {
        self.rolling(length, selector, f64::max)
    }

    /// Rolling minimum of `selector(bar)` over trailing `length` bars
    pub fn rolling_min(&self, length: usize, selector: impl Fn(&Bar) -> f64) -> Vec<Option<f64>> {
        self.rolling(length, selector, f64::min)
    }

    /// Drop the first `n` bars in place
    ///
    /// Slicing the front preserves the ordering and spacing invariants, so
    /// the result is still a valid series. Used for warm-up trimming.
    pub(crate) fn drop_front(&mut self, n: usize) {
        let n = n.min(self.bars.len());
        self.bars.drain(..n);
    }

    fn rolling(
        &self,
        length: usize,
        selector: impl Fn(&Bar) -> f64,
        fold: impl Fn(f64, f64) -> f64 + Copy,
    ) -> Vec<Option<f64>> {
        (0..self.bars.len())
            .map(|i| {
                if length == 0 || i + 1 < length {
                    return None;
                }
                self.window(i, length)
                    .iter()
                    .map(&selector)
                    .reduce(fold)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn bar_at(minutes: i64, close: f64) -> Bar {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes);
        Bar::new(ts, close, close + 1.0, close - 1.0, close, 100.0)
    }

    #[test]
    fn test_append_in_order() {
        let mut series = CandleSeries::new("BTC/USDT", Timeframe::M15);
        series.append(bar_at(0, 100.0)).unwrap();
        series.append(bar_at(15, 101.0)).unwrap();
        series.append(bar_at(30, 102.0)).unwrap();
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn test_append_rejects_out_of_order() {
        let mut series = CandleSeries::new("BTC/USDT", Timeframe::M15);
        series.append(bar_at(15, 100.0)).unwrap();
        let err = series.append(bar_at(0, 99.0)).unwrap_err();
        assert!(matches!(err, PipelineError::OutOfOrderBar { .. }));

        // Duplicate timestamp is also out of order
        let err = series.append(bar_at(15, 100.0)).unwrap_err();
        assert!(matches!(err, PipelineError::OutOfOrderBar { .. }));
    }

    #[test]
    fn test_append_rejects_irregular_spacing() {
        let mut series = CandleSeries::new("BTC/USDT", Timeframe::M15);
        series.append(bar_at(0, 100.0)).unwrap();
        let err = series.append(bar_at(7, 100.5)).unwrap_err();
        assert!(matches!(err, PipelineError::IrregularSpacing { .. }));
    }

    #[test]
    fn test_append_allows_gaps_of_whole_bars() {
        // An exchange outage shows up as missing bars; spacing stays a
        // multiple of the timeframe.
        let mut series = CandleSeries::new("BTC/USDT", Timeframe::M15);
        series.append(bar_at(0, 100.0)).unwrap();
        series.append(bar_at(45, 101.0)).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_append_rejects_negative_volume() {
        let mut series = CandleSeries::new("BTC/USDT", Timeframe::M15);
        let mut bar = bar_at(0, 100.0);
        bar.volume = -1.0;
        let err = series.append(bar).unwrap_err();
        assert!(matches!(err, PipelineError::NegativeVolume { .. }));
    }

    #[test]
    fn test_window() {
        let series = CandleSeries::from_bars(
            "BTC/USDT",
            Timeframe::M15,
            (0..5).map(|i| bar_at(i * 15, 100.0 + i as f64)),
        )
        .unwrap();

        let full = series.window(4, 3);
        assert_eq!(full.len(), 3);
        assert_eq!(full[0].close, 102.0);

        // Short history returns fewer bars, not padding
        let short = series.window(1, 3);
        assert_eq!(short.len(), 2);
    }

    #[test]
    fn test_rolling_extrema() {
        let series = CandleSeries::from_bars(
            "BTC/USDT",
            Timeframe::M15,
            [100.0, 103.0, 101.0, 99.0, 104.0]
                .iter()
                .enumerate()
                .map(|(i, &c)| bar_at(i as i64 * 15, c)),
        )
        .unwrap();

        let max = series.rolling_max(3, |b| b.high);
        assert_eq!(max[0], None);
        assert_eq!(max[1], None);
        assert_eq!(max[2], Some(104.0)); // high = close + 1
        assert_eq!(max[3], Some(104.0));
        assert_eq!(max[4], Some(105.0));

        let min = series.rolling_min(3, |b| b.low);
        assert_eq!(min[2], Some(99.0));
        assert_eq!(min[4], Some(98.0));
    }
}
