//! Strategy profiles and their configuration value objects
//!
//! A profile bundles the stage lists and run-control settings of one
//! strategy variant. The two stock profiles replace a pair of near-identical
//! hand-written strategies: the stage list is the only thing that differs,
//! so each variant is data, not code. Configuration that the host runtime
//! consumes (ROI steps, stoploss, order types) rides along as immutable
//! value objects fixed at construction.

use crate::frame::{ColumnId, ColumnKey};
use crate::indicators::IchimokuParams;
use crate::pipeline::engine::{IndicatorPipeline, PipelineConfig};
use crate::pipeline::stage::PipelineStage;
use crate::timeframe::Timeframe;
use serde::{Deserialize, Serialize};

/// Minimum-ROI steps: after `minutes` in a trade, exit at `ratio` profit
///
/// Lookup returns the step with the largest `minutes` not exceeding the
/// elapsed time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiTable {
    steps: Vec<(u32, f64)>,
}

impl RoiTable {
    /// Build a table from (minutes, ratio) steps
    pub fn new(mut steps: Vec<(u32, f64)>) -> Self {
        steps.sort_by_key(|&(minutes, _)| minutes);
        Self { steps }
    }

    /// Minimum ROI required after `minutes_elapsed` in a trade
    pub fn minimal_roi_at(&self, minutes_elapsed: u32) -> Option<f64> {
        self.steps
            .iter()
            .rev()
            .find(|&&(minutes, _)| minutes <= minutes_elapsed)
            .map(|&(_, ratio)| ratio)
    }
}

/// Stoploss settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoplossConfig {
    /// Loss ratio triggering the stop, negative (e.g. -0.10)
    pub ratio: f64,
    pub trailing: bool,
}

/// Order kinds the host runtime places
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Limit,
    Market,
}

/// Order-type mapping for entry, exit, and stoploss orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTypeConfig {
    pub entry: OrderKind,
    pub exit: OrderKind,
    pub stoploss: OrderKind,
    pub stoploss_on_exchange: bool,
}

impl Default for OrderTypeConfig {
    fn default() -> Self {
        Self {
            entry: OrderKind::Limit,
            exit: OrderKind::Limit,
            stoploss: OrderKind::Market,
            stoploss_on_exchange: false,
        }
    }
}

/// One strategy variant: stage lists plus host-facing configuration
#[derive(Debug, Clone)]
pub struct StrategyProfile {
    pub name: String,
    pub base_timeframe: Timeframe,
    pub informative_timeframe: Option<Timeframe>,
    pub informative_stages: Vec<PipelineStage>,
    pub base_stages: Vec<PipelineStage>,
    pub trim_warmup: bool,
    pub startup_candle_count: usize,
    pub roi: RoiTable,
    pub stoploss: StoplossConfig,
    pub order_types: OrderTypeConfig,
}

impl StrategyProfile {
    /// Build the pipeline this profile describes
    pub fn build_pipeline(&self) -> crate::error::Result<IndicatorPipeline> {
        IndicatorPipeline::new(PipelineConfig {
            base_timeframe: self.base_timeframe,
            informative_timeframe: self.informative_timeframe,
            informative_stages: self.informative_stages.clone(),
            base_stages: self.base_stages.clone(),
            trim_warmup: self.trim_warmup,
            startup_candle_count: self.startup_candle_count,
        })
    }

    /// 15m base with 1h informative context
    ///
    /// RSI vs its EMA, Stochastic-Fast, and the full Ichimoku cloud with
    /// cloud and line conditions — computed on both timeframes, with the
    /// 1h columns (conditions included) merged into the 15m frame. Keeps
    /// warm-up rows.
    pub fn multi_timeframe() -> Self {
        let stages = vec![
            PipelineStage::Rsi { period: 14 },
            PipelineStage::EmaOf {
                source: ColumnKey::base(ColumnId::Rsi),
                period: 21,
                output: ColumnId::RsiEma,
            },
            PipelineStage::Compare {
                output: ColumnId::RsiCondition,
                a: ColumnKey::base(ColumnId::Rsi),
                b: ColumnKey::base(ColumnId::RsiEma),
            },
            PipelineStage::StochasticFast {
                period: 21,
                smoothing: 3,
            },
            PipelineStage::Compare {
                output: ColumnId::StochCondition,
                a: ColumnKey::base(ColumnId::FastK),
                b: ColumnKey::base(ColumnId::FastD),
            },
            PipelineStage::Ichimoku {
                params: IchimokuParams::default(),
            },
            PipelineStage::CloudPosition {
                output: ColumnId::CloudCondition,
                senkou_a: ColumnKey::base(ColumnId::SenkouA),
                senkou_b: ColumnKey::base(ColumnId::SenkouB),
            },
            PipelineStage::Compare {
                output: ColumnId::LineCondition,
                a: ColumnKey::base(ColumnId::Tenkan),
                b: ColumnKey::base(ColumnId::Kijun),
            },
        ];

        Self {
            name: "multi_timeframe".to_string(),
            base_timeframe: Timeframe::M15,
            informative_timeframe: Some(Timeframe::H1),
            informative_stages: stages.clone(),
            base_stages: stages,
            trim_warmup: false,
            startup_candle_count: 200,
            roi: RoiTable::new(vec![(60, 0.01), (30, 0.02), (0, 0.04)]),
            stoploss: StoplossConfig {
                ratio: -0.10,
                trailing: false,
            },
            order_types: OrderTypeConfig::default(),
        }
    }

    /// 15m base only, no informative context
    ///
    /// RSI and its EMA, Stochastic-Fast with condition, tenkan/kijun lines,
    /// MACD with condition, and the compound ADX trend condition. Trims
    /// warm-up rows before returning, as this variant always did.
    pub fn single_timeframe() -> Self {
        Self {
            name: "single_timeframe".to_string(),
            base_timeframe: Timeframe::M15,
            informative_timeframe: None,
            informative_stages: Vec::new(),
            base_stages: vec![
                PipelineStage::Rsi { period: 14 },
                PipelineStage::EmaOf {
                    source: ColumnKey::base(ColumnId::Rsi),
                    period: 21,
                    output: ColumnId::RsiEma,
                },
                PipelineStage::StochasticFast {
                    period: 21,
                    smoothing: 3,
                },
                PipelineStage::Compare {
                    output: ColumnId::StochCondition,
                    a: ColumnKey::base(ColumnId::FastK),
                    b: ColumnKey::base(ColumnId::FastD),
                },
                PipelineStage::IchimokuLines {
                    tenkan: 9,
                    kijun: 26,
                },
                PipelineStage::Macd {
                    fast: 12,
                    slow: 26,
                    signal: 9,
                },
                PipelineStage::Compare {
                    output: ColumnId::MacdCondition,
                    a: ColumnKey::base(ColumnId::Macd),
                    b: ColumnKey::base(ColumnId::MacdSignal),
                },
                PipelineStage::DirectionalMovement { period: 14 },
                PipelineStage::AdxTrend {
                    output: ColumnId::AdxCondition,
                    threshold: 25.0,
                    adx: ColumnKey::base(ColumnId::Adx),
                    plus_di: ColumnKey::base(ColumnId::PlusDi),
                    minus_di: ColumnKey::base(ColumnId::MinusDi),
                },
            ],
            trim_warmup: true,
            startup_candle_count: 200,
            roi: RoiTable::new(vec![(60, 0.01), (30, 0.02), (0, 0.04)]),
            stoploss: StoplossConfig {
                ratio: -0.10,
                trailing: false,
            },
            order_types: OrderTypeConfig::default(),
        }
    }
}
