//! Strategy capability interface
//!
//! The host runtime talks to a strategy through this trait instead of a
//! base class: indicator computation is a pure pipeline injected into a
//! thin adapter. Entry/exit decision derivation is host policy, so the
//! default signals are always "no signal" — a host that wants signal logic
//! overrides those methods on its own implementation.

use crate::error::Result;
use crate::frame::AnnotatedSeries;
use crate::pipeline::{IndicatorPipeline, StrategyProfile};
use crate::provider::DataProvider;
use crate::timeframe::Timeframe;
use crate::types::Pair;

/// Trade direction signal derived from a computed frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    EnterLong,
    ExitLong,
}

/// Capabilities the host runtime requires from a strategy
pub trait TradingStrategy: Send + Sync {
    /// Additional (pair, timeframe) combinations to keep cached
    fn informative_pairs(&self, provider: &dyn DataProvider) -> Vec<(Pair, Timeframe)>;

    /// Compute the annotated frame for one pair
    fn compute_indicators(&self, provider: &dyn DataProvider, pair: &str)
        -> Result<AnnotatedSeries>;

    /// Entry signal for the bar at `index`, if any
    fn entry_signal(&self, _frame: &AnnotatedSeries, _index: usize) -> Option<Signal> {
        None
    }

    /// Exit signal for the bar at `index`, if any
    fn exit_signal(&self, _frame: &AnnotatedSeries, _index: usize) -> Option<Signal> {
        None
    }
}

/// Profile-driven strategy adapter
pub struct ProfileStrategy {
    profile: StrategyProfile,
    pipeline: IndicatorPipeline,
}

impl ProfileStrategy {
    /// Build the adapter, validating the profile's pipeline configuration
    pub fn new(profile: StrategyProfile) -> Result<Self> {
        let pipeline = profile.build_pipeline()?;
        Ok(Self { profile, pipeline })
    }

    pub fn profile(&self) -> &StrategyProfile {
        &self.profile
    }

    pub fn pipeline(&self) -> &IndicatorPipeline {
        &self.pipeline
    }
}

impl TradingStrategy for ProfileStrategy {
    fn informative_pairs(&self, provider: &dyn DataProvider) -> Vec<(Pair, Timeframe)> {
        self.pipeline.informative_pairs(provider)
    }

    fn compute_indicators(
        &self,
        provider: &dyn DataProvider,
        pair: &str,
    ) -> Result<AnnotatedSeries> {
        self.pipeline.compute(provider, pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::InMemoryDataProvider;

    #[test]
    fn test_informative_pairs_cross_product() {
        let strategy = ProfileStrategy::new(StrategyProfile::multi_timeframe()).unwrap();
        let mut provider = InMemoryDataProvider::new();
        provider.set_whitelist(["BTC/USDT".to_string(), "PAXG/USDT".to_string()]);

        let pairs = strategy.informative_pairs(&provider);
        assert_eq!(
            pairs,
            vec![
                ("BTC/USDT".to_string(), Timeframe::H1),
                ("PAXG/USDT".to_string(), Timeframe::H1),
            ]
        );
    }

    #[test]
    fn test_single_timeframe_has_no_informative_pairs() {
        let strategy = ProfileStrategy::new(StrategyProfile::single_timeframe()).unwrap();
        let mut provider = InMemoryDataProvider::new();
        provider.set_whitelist(["BTC/USDT".to_string()]);
        assert!(strategy.informative_pairs(&provider).is_empty());
    }

    #[test]
    fn test_default_signals_are_none() {
        let strategy = ProfileStrategy::new(StrategyProfile::single_timeframe()).unwrap();
        let frame = AnnotatedSeries::new(crate::series::CandleSeries::new(
            "BTC/USDT",
            Timeframe::M15,
        ));
        assert_eq!(strategy.entry_signal(&frame, 0), None);
        assert_eq!(strategy.exit_signal(&frame, 0), None);
    }
}
