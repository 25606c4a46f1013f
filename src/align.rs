//! Informative-timeframe alignment
//!
//! Merges columns computed on a coarser "informative" series into a finer
//! base series. For a base bar at time `t` the merged value comes from the
//! newest informative bar whose close time (`timestamp + duration`) is at
//! or before `t`, so the value was fully known when the base bar opened —
//! no look-ahead. Values forward-fill between informative boundaries; base
//! bars before the first eligible informative bar stay undefined.

use crate::condition::ConditionCode;
use crate::error::{PipelineError, Result};
use crate::frame::{AnnotatedSeries, Column, ColumnKey, Scope};
use crate::timeframe::Timeframe;

/// Merges informative-timeframe columns into a base-timeframe frame
#[derive(Debug, Clone, Copy)]
pub struct TimeframeAligner {
    base: Timeframe,
    informative: Timeframe,
}

impl TimeframeAligner {
    /// Create an aligner; the informative timeframe must be strictly coarser
    pub fn new(base: Timeframe, informative: Timeframe) -> Result<Self> {
        if !informative.is_coarser_than(base) {
            return Err(PipelineError::MisalignedTimeframes {
                base: base.to_string(),
                informative: informative.to_string(),
            });
        }
        Ok(Self { base, informative })
    }

    pub fn base(&self) -> Timeframe {
        self.base
    }

    pub fn informative(&self) -> Timeframe {
        self.informative
    }

    /// Merge every column of `informative` into `base_frame`
    ///
    /// Merged columns keep their id but carry informative scope, so they
    /// render with the informative timeframe suffix and never collide with
    /// base columns of the same id.
    pub fn merge(&self, base_frame: &mut AnnotatedSeries, informative: &AnnotatedSeries) -> Result<()> {
        let mapping = self.source_indices(base_frame, informative);

        let keys: Vec<ColumnKey> = informative.keys().collect();
        for key in keys {
            let merged = match informative.column(key)? {
                Column::Numeric(values) => Column::Numeric(
                    mapping
                        .iter()
                        .map(|src| src.and_then(|j| values[j]))
                        .collect(),
                ),
                Column::Condition(codes) => Column::Condition(
                    mapping
                        .iter()
                        .map(|src| match src {
                            Some(j) => codes[*j],
                            None => ConditionCode::Undefined,
                        })
                        .collect(),
                ),
            };
            base_frame.insert(
                ColumnKey {
                    id: key.id,
                    scope: Scope::Informative,
                },
                merged,
            );
        }

        base_frame.set_informative_timeframe(self.informative);
        Ok(())
    }

    /// For each base bar, the index of the newest informative bar whose
    /// close time is at or before the base bar's timestamp
    fn source_indices(
        &self,
        base_frame: &AnnotatedSeries,
        informative: &AnnotatedSeries,
    ) -> Vec<Option<usize>> {
        let duration = self.informative.duration();
        let inf_bars = informative.series().bars();
        let mut src: Option<usize> = None;
        let mut next = 0usize;

        base_frame
            .series()
            .bars()
            .iter()
            .map(|base_bar| {
                while next < inf_bars.len() && inf_bars[next].timestamp + duration <= base_bar.timestamp {
                    src = Some(next);
                    next += 1;
                }
                src
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ColumnId;
    use crate::series::CandleSeries;
    use crate::types::Bar;
    use chrono::{Duration, TimeZone, Utc};

    fn series(timeframe: Timeframe, count: usize, close: impl Fn(usize) -> f64) -> CandleSeries {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        CandleSeries::from_bars(
            "BTC/USDT",
            timeframe,
            (0..count).map(|i| {
                let c = close(i);
                Bar::new(
                    start + timeframe.duration() * i as i32,
                    c,
                    c + 1.0,
                    c - 1.0,
                    c,
                    100.0,
                )
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_non_coarser_informative() {
        let err = TimeframeAligner::new(Timeframe::H1, Timeframe::M15).unwrap_err();
        assert!(matches!(err, PipelineError::MisalignedTimeframes { .. }));

        let err = TimeframeAligner::new(Timeframe::M15, Timeframe::M15).unwrap_err();
        assert!(matches!(err, PipelineError::MisalignedTimeframes { .. }));
    }

    #[test]
    fn test_merge_uses_previous_closed_informative_bar() {
        // 16 base bars (15m) spanning four hours, 4 informative bars (1h).
        // The hour bar opened at hour h closes at h+1, so base bars inside
        // hour h must read the value of hour h-1.
        let mut base_frame = AnnotatedSeries::new(series(Timeframe::M15, 16, |_| 100.0));
        let mut inf_frame = AnnotatedSeries::new(series(Timeframe::H1, 4, |_| 100.0));
        inf_frame.insert(
            ColumnKey::base(ColumnId::Rsi),
            Column::Numeric(vec![Some(10.0), Some(20.0), Some(30.0), Some(40.0)]),
        );

        let aligner = TimeframeAligner::new(Timeframe::M15, Timeframe::H1).unwrap();
        aligner.merge(&mut base_frame, &inf_frame).unwrap();

        let merged = base_frame
            .numeric(ColumnKey::informative(ColumnId::Rsi))
            .unwrap();

        // Hour 0 (base indices 0..4): hour-0 bar still open, nothing closed
        assert_eq!(&merged[0..4], &[None, None, None, None]);
        // Hour 1 (indices 4..8): hour-0 value, forward-filled
        assert_eq!(&merged[4..8], &[Some(10.0); 4]);
        // Hour 2: hour-1 value
        assert_eq!(&merged[8..12], &[Some(20.0); 4]);
        // Hour 3: hour-2 value; hour-3 closes only after the last base bar
        assert_eq!(&merged[12..16], &[Some(30.0); 4]);
    }

    #[test]
    fn test_merge_conditions_keep_undefined() {
        let mut base_frame = AnnotatedSeries::new(series(Timeframe::M15, 8, |_| 100.0));
        let mut inf_frame = AnnotatedSeries::new(series(Timeframe::H1, 2, |_| 100.0));
        inf_frame.insert(
            ColumnKey::base(ColumnId::RsiCondition),
            Column::Condition(vec![ConditionCode::Undefined, ConditionCode::Bullish]),
        );

        let aligner = TimeframeAligner::new(Timeframe::M15, Timeframe::H1).unwrap();
        aligner.merge(&mut base_frame, &inf_frame).unwrap();

        let merged = base_frame
            .condition(ColumnKey::informative(ColumnId::RsiCondition))
            .unwrap();
        // No informative bar closed yet: undefined, not neutral
        assert_eq!(merged[0], ConditionCode::Undefined);
        // Hour-0 bar closed but its own value was undefined
        assert_eq!(merged[4], ConditionCode::Undefined);
    }

    #[test]
    fn test_merge_names_carry_timeframe_suffix() {
        let mut base_frame = AnnotatedSeries::new(series(Timeframe::M15, 4, |_| 100.0));
        let mut inf_frame = AnnotatedSeries::new(series(Timeframe::H1, 1, |_| 100.0));
        inf_frame.insert(
            ColumnKey::base(ColumnId::Rsi),
            Column::Numeric(vec![Some(50.0)]),
        );

        let aligner = TimeframeAligner::new(Timeframe::M15, Timeframe::H1).unwrap();
        aligner.merge(&mut base_frame, &inf_frame).unwrap();

        assert_eq!(base_frame.column_names(), vec!["rsi_1h"]);
    }
}
