//! Candle data providers
//!
//! The pipeline never fetches data itself; it reads through the
//! [`DataProvider`] trait so computation stays deterministic and testable
//! without network or disk access. The in-memory provider backs tests and
//! embedding hosts; [`load_candles_json`] parses the exchange download
//! format for fixtures and offline runs.

use crate::error::{PipelineError, Result};
use crate::series::CandleSeries;
use crate::timeframe::Timeframe;
use crate::types::{Bar, Pair, Timestamp};
use hashbrown::HashMap;

/// Source of candle history and the tradeable-pair whitelist
pub trait DataProvider: Send + Sync {
    /// Fetch at least `min_length` bars of history for `(pair, timeframe)`
    ///
    /// Fails with [`PipelineError::DataUnavailable`] when fewer bars exist.
    fn get_candles(&self, pair: &str, timeframe: Timeframe, min_length: usize)
        -> Result<CandleSeries>;

    /// Currently whitelisted pair identifiers
    fn current_whitelist(&self) -> Vec<Pair>;
}

/// Map-backed provider for tests and embedding hosts
#[derive(Debug, Default)]
pub struct InMemoryDataProvider {
    series: HashMap<(Pair, Timeframe), CandleSeries>,
    whitelist: Vec<Pair>,
}

impl InMemoryDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a series, keyed by its pair and timeframe
    pub fn add_series(&mut self, series: CandleSeries) {
        self.series
            .insert((series.pair().to_string(), series.timeframe()), series);
    }

    /// Replace the whitelist
    pub fn set_whitelist(&mut self, pairs: impl IntoIterator<Item = Pair>) {
        self.whitelist = pairs.into_iter().collect();
    }
}

impl DataProvider for InMemoryDataProvider {
    fn get_candles(
        &self,
        pair: &str,
        timeframe: Timeframe,
        min_length: usize,
    ) -> Result<CandleSeries> {
        let series = self.series.get(&(pair.to_string(), timeframe));
        let available = series.map_or(0, |s| s.len());
        match series {
            Some(series) if available >= min_length => Ok(series.clone()),
            _ => Err(PipelineError::DataUnavailable {
                pair: pair.to_string(),
                timeframe: timeframe.to_string(),
                required: min_length,
                available,
            }),
        }
    }

    fn current_whitelist(&self) -> Vec<Pair> {
        self.whitelist.clone()
    }
}

/// Parse candles from the exchange download format
///
/// Input is a JSON array of `[timestamp_ms, open, high, low, close, volume]`
/// rows, oldest first.
pub fn load_candles_json(pair: &str, timeframe: Timeframe, json: &str) -> Result<CandleSeries> {
    let rows: Vec<(i64, f64, f64, f64, f64, f64)> = serde_json::from_str(json)?;
    let mut series = CandleSeries::new(pair, timeframe);
    for (ms, open, high, low, close, volume) in rows {
        let timestamp: Timestamp = chrono::DateTime::from_timestamp_millis(ms)
            .ok_or(PipelineError::InvalidTimestamp(ms))?;
        series.append(Bar::new(timestamp, open, high, low, close, volume))?;
    }
    Ok(series)
}
