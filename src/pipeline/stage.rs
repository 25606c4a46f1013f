//! Declarative pipeline stages
//!
//! A [`PipelineStage`] names one computation over the frame: an indicator
//! producing one or more columns, or a condition reducing existing columns
//! to a code column. The pipeline is an ordered list of these descriptors,
//! so strategy variants differ only in their stage lists.

use crate::condition::{encode_adx_trend, encode_cloud_position, encode_compare};
use crate::error::Result;
use crate::frame::{AnnotatedSeries, Column, ColumnId, ColumnKey};
use crate::indicators::{
    DirectionalMovement, ExponentialMovingAverage, Ichimoku, IchimokuParams, Macd,
    OnBalanceVolume, ParabolicSar, Rsi, StochasticFast, Tema,
};

/// One declarative stage of the indicator pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineStage {
    /// Wilder RSI of the close -> `rsi`
    Rsi { period: usize },
    /// EMA of an existing numeric column -> `output`
    EmaOf {
        source: ColumnKey,
        period: usize,
        output: ColumnId,
    },
    /// Stochastic-Fast of the bars -> `fastk`, `fastd`
    StochasticFast { period: usize, smoothing: usize },
    /// Tenkan/kijun midpoints only -> `tenkan`, `kijun`
    IchimokuLines { tenkan: usize, kijun: usize },
    /// Full Ichimoku -> `tenkan`, `kijun`, `senkou_a`, `senkou_b`
    Ichimoku { params: IchimokuParams },
    /// MACD of the close -> `macd`, `macdsignal`
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    /// Wilder directional movement -> `adx`, `plus_di`, `minus_di`
    DirectionalMovement { period: usize },
    /// Parabolic SAR -> `sar`
    ParabolicSar {
        acceleration: f64,
        max_acceleration: f64,
    },
    /// TEMA of the close -> `tema`
    Tema { period: usize },
    /// On-Balance Volume -> `obv`
    Obv,
    /// Tri-state comparison of two numeric columns -> `output`
    Compare {
        output: ColumnId,
        a: ColumnKey,
        b: ColumnKey,
    },
    /// Close position relative to the Ichimoku cloud -> `output`
    CloudPosition {
        output: ColumnId,
        senkou_a: ColumnKey,
        senkou_b: ColumnKey,
    },
    /// Compound ADX trend condition -> `output`
    AdxTrend {
        output: ColumnId,
        threshold: f64,
        adx: ColumnKey,
        plus_di: ColumnKey,
        minus_di: ColumnKey,
    },
}

impl PipelineStage {
    /// Columns this stage reads from the frame
    pub fn inputs(&self) -> Vec<ColumnKey> {
        match self {
            PipelineStage::EmaOf { source, .. } => vec![*source],
            PipelineStage::Compare { a, b, .. } => vec![*a, *b],
            PipelineStage::CloudPosition {
                senkou_a, senkou_b, ..
            } => vec![*senkou_a, *senkou_b],
            PipelineStage::AdxTrend {
                adx,
                plus_di,
                minus_di,
                ..
            } => vec![*adx, *plus_di, *minus_di],
            _ => Vec::new(),
        }
    }

    /// Columns this stage writes (always base-scoped in the frame it runs on)
    pub fn outputs(&self) -> Vec<ColumnId> {
        match self {
            PipelineStage::Rsi { .. } => vec![ColumnId::Rsi],
            PipelineStage::EmaOf { output, .. } => vec![*output],
            PipelineStage::StochasticFast { .. } => vec![ColumnId::FastK, ColumnId::FastD],
            PipelineStage::IchimokuLines { .. } => vec![ColumnId::Tenkan, ColumnId::Kijun],
            PipelineStage::Ichimoku { .. } => vec![
                ColumnId::Tenkan,
                ColumnId::Kijun,
                ColumnId::SenkouA,
                ColumnId::SenkouB,
            ],
            PipelineStage::Macd { .. } => vec![ColumnId::Macd, ColumnId::MacdSignal],
            PipelineStage::DirectionalMovement { .. } => {
                vec![ColumnId::Adx, ColumnId::PlusDi, ColumnId::MinusDi]
            }
            PipelineStage::ParabolicSar { .. } => vec![ColumnId::Sar],
            PipelineStage::Tema { .. } => vec![ColumnId::Tema],
            PipelineStage::Obv => vec![ColumnId::Obv],
            PipelineStage::Compare { output, .. }
            | PipelineStage::CloudPosition { output, .. }
            | PipelineStage::AdxTrend { output, .. } => vec![*output],
        }
    }

    /// Bars this stage needs beyond its inputs before its first defined output
    pub fn lookback(&self) -> usize {
        match self {
            PipelineStage::Rsi { period } => Rsi::lookback(*period),
            PipelineStage::EmaOf { period, .. } => ExponentialMovingAverage::lookback(*period),
            PipelineStage::StochasticFast { period, smoothing } => {
                StochasticFast::lookback_d(*period, *smoothing)
            }
            PipelineStage::IchimokuLines { tenkan, kijun } => (*tenkan).max(*kijun) - 1,
            PipelineStage::Ichimoku { params } => Ichimoku::lookback(*params),
            PipelineStage::Macd { slow, signal, .. } => Macd::lookback_signal(*slow, *signal),
            PipelineStage::DirectionalMovement { period } => {
                DirectionalMovement::lookback_adx(*period)
            }
            PipelineStage::ParabolicSar { .. } => ParabolicSar::lookback(),
            PipelineStage::Tema { period } => Tema::lookback(*period),
            PipelineStage::Obv => OnBalanceVolume::lookback(),
            // Conditions add no lookback of their own
            PipelineStage::Compare { .. }
            | PipelineStage::CloudPosition { .. }
            | PipelineStage::AdxTrend { .. } => 0,
        }
    }

    /// Whether this stage produces a condition column
    pub fn is_condition(&self) -> bool {
        matches!(
            self,
            PipelineStage::Compare { .. }
                | PipelineStage::CloudPosition { .. }
                | PipelineStage::AdxTrend { .. }
        )
    }

    /// Run this stage against the frame, inserting its output columns
    pub fn apply(&self, frame: &mut AnnotatedSeries) -> Result<()> {
        match self {
            PipelineStage::Rsi { period } => {
                let closes = frame.series().closes();
                let rsi = Rsi::compute(*period, &closes);
                frame.insert(ColumnKey::base(ColumnId::Rsi), Column::Numeric(rsi));
            }
            PipelineStage::EmaOf {
                source,
                period,
                output,
            } => {
                let input = frame.numeric(*source)?.to_vec();
                let ema = ExponentialMovingAverage::compute_opt(*period, &input);
                frame.insert(ColumnKey::base(*output), Column::Numeric(ema));
            }
            PipelineStage::StochasticFast { period, smoothing } => {
                let (fastk, fastd) =
                    StochasticFast::compute(*period, *smoothing, frame.series().bars());
                frame.insert(ColumnKey::base(ColumnId::FastK), Column::Numeric(fastk));
                frame.insert(ColumnKey::base(ColumnId::FastD), Column::Numeric(fastd));
            }
            PipelineStage::IchimokuLines { tenkan, kijun } => {
                let params = IchimokuParams {
                    tenkan: *tenkan,
                    kijun: *kijun,
                    ..IchimokuParams::default()
                };
                let lines = Ichimoku::compute(params, frame.series().bars());
                frame.insert(ColumnKey::base(ColumnId::Tenkan), Column::Numeric(lines.tenkan));
                frame.insert(ColumnKey::base(ColumnId::Kijun), Column::Numeric(lines.kijun));
            }
            PipelineStage::Ichimoku { params } => {
                let lines = Ichimoku::compute(*params, frame.series().bars());
                frame.insert(ColumnKey::base(ColumnId::Tenkan), Column::Numeric(lines.tenkan));
                frame.insert(ColumnKey::base(ColumnId::Kijun), Column::Numeric(lines.kijun));
                frame.insert(
                    ColumnKey::base(ColumnId::SenkouA),
                    Column::Numeric(lines.senkou_a),
                );
                frame.insert(
                    ColumnKey::base(ColumnId::SenkouB),
                    Column::Numeric(lines.senkou_b),
                );
            }
            PipelineStage::Macd { fast, slow, signal } => {
                let closes = frame.series().closes();
                let (line, sig) = Macd::compute(*fast, *slow, *signal, &closes);
                frame.insert(ColumnKey::base(ColumnId::Macd), Column::Numeric(line));
                frame.insert(ColumnKey::base(ColumnId::MacdSignal), Column::Numeric(sig));
            }
            PipelineStage::DirectionalMovement { period } => {
                let (adx, plus, minus) =
                    DirectionalMovement::compute(*period, frame.series().bars());
                frame.insert(ColumnKey::base(ColumnId::Adx), Column::Numeric(adx));
                frame.insert(ColumnKey::base(ColumnId::PlusDi), Column::Numeric(plus));
                frame.insert(ColumnKey::base(ColumnId::MinusDi), Column::Numeric(minus));
            }
            PipelineStage::ParabolicSar {
                acceleration,
                max_acceleration,
            } => {
                let sar = crate::indicators::ParabolicSar::new(*acceleration, *max_acceleration)
                    .compute(frame.series().bars());
                frame.insert(ColumnKey::base(ColumnId::Sar), Column::Numeric(sar));
            }
            PipelineStage::Tema { period } => {
                let closes = frame.series().closes();
                let tema = Tema::compute(*period, &closes);
                frame.insert(ColumnKey::base(ColumnId::Tema), Column::Numeric(tema));
            }
            PipelineStage::Obv => {
                let obv = OnBalanceVolume::compute(frame.series().bars());
                frame.insert(ColumnKey::base(ColumnId::Obv), Column::Numeric(obv));
            }
            PipelineStage::Compare { output, a, b } => {
                let a = frame.numeric(*a)?.to_vec();
                let b = frame.numeric(*b)?;
                let codes = encode_compare(&a, b);
                frame.insert(ColumnKey::base(*output), Column::Condition(codes));
            }
            PipelineStage::CloudPosition {
                output,
                senkou_a,
                senkou_b,
            } => {
                let closes = frame.series().closes();
                let a = frame.numeric(*senkou_a)?.to_vec();
                let b = frame.numeric(*senkou_b)?;
                let codes = encode_cloud_position(&closes, &a, b);
                frame.insert(ColumnKey::base(*output), Column::Condition(codes));
            }
            PipelineStage::AdxTrend {
                output,
                threshold,
                adx,
                plus_di,
                minus_di,
            } => {
                let adx = frame.numeric(*adx)?.to_vec();
                let plus = frame.numeric(*plus_di)?.to_vec();
                let minus = frame.numeric(*minus_di)?;
                let codes = encode_adx_trend(&adx, &plus, minus, *threshold);
                frame.insert(ColumnKey::base(*output), Column::Condition(codes));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::CandleSeries;
    use crate::timeframe::Timeframe;
    use crate::types::Bar;
    use chrono::{Duration, TimeZone, Utc};

    fn frame(n: usize) -> AnnotatedSeries {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        AnnotatedSeries::new(
            CandleSeries::from_bars(
                "BTC/USDT",
                Timeframe::M15,
                (0..n).map(|i| {
                    let c = 100.0 + ((i * 7) % 13) as f64;
                    Bar::new(
                        start + Duration::minutes(15 * i as i64),
                        c,
                        c + 1.0,
                        c - 1.0,
                        c,
                        50.0,
                    )
                }),
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_stage_outputs_land_in_frame() {
        let mut f = frame(60);
        PipelineStage::Rsi { period: 14 }.apply(&mut f).unwrap();
        PipelineStage::EmaOf {
            source: ColumnKey::base(ColumnId::Rsi),
            period: 21,
            output: ColumnId::RsiEma,
        }
        .apply(&mut f)
        .unwrap();
        PipelineStage::Compare {
            output: ColumnId::RsiCondition,
            a: ColumnKey::base(ColumnId::Rsi),
            b: ColumnKey::base(ColumnId::RsiEma),
        }
        .apply(&mut f)
        .unwrap();

        assert!(f.contains(ColumnKey::base(ColumnId::Rsi)));
        assert!(f.contains(ColumnKey::base(ColumnId::RsiEma)));
        let codes = f.condition(ColumnKey::base(ColumnId::RsiCondition)).unwrap();
        assert_eq!(codes.len(), 60);

        // rsi_ema needs 14 + 20 bars; conditions stay undefined before that
        assert!(!codes[33].is_defined());
        assert!(codes[34].is_defined());
    }

    #[test]
    fn test_condition_stage_fails_fast_on_missing_input() {
        let mut f = frame(30);
        let err = PipelineStage::Compare {
            output: ColumnId::MacdCondition,
            a: ColumnKey::base(ColumnId::Macd),
            b: ColumnKey::base(ColumnId::MacdSignal),
        }
        .apply(&mut f)
        .unwrap_err();
        assert!(matches!(err, crate::error::PipelineError::UnknownColumn(_)));
    }

    #[test]
    fn test_lookbacks() {
        assert_eq!(PipelineStage::Rsi { period: 14 }.lookback(), 14);
        assert_eq!(
            PipelineStage::Macd {
                fast: 12,
                slow: 26,
                signal: 9
            }
            .lookback(),
            33
        );
        assert_eq!(
            PipelineStage::Ichimoku {
                params: IchimokuParams::default()
            }
            .lookback(),
            77
        );
        assert_eq!(
            PipelineStage::DirectionalMovement { period: 14 }.lookback(),
            27
        );
    }
}
