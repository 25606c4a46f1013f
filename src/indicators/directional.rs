//! Wilder directional movement (ADX, +DI, -DI) and Parabolic SAR

use crate::types::Bar;

/// One bar's directional movement output
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectionalOutput {
    pub plus_di: Option<f64>,
    pub minus_di: Option<f64>,
    pub adx: Option<f64>,
}

/// Average Directional Index with Wilder smoothing
///
/// True range and directional movement are Wilder-smoothed over `period`;
/// `DX = 100 * |+DI - -DI| / (+DI + -DI)` and ADX is the Wilder-smoothed DX.
/// +DI/-DI are first defined after `period` bars, ADX after `2 * period - 1`.
#[derive(Debug, Clone)]
pub struct DirectionalMovement {
    period: usize,
    prev_bar: Option<Bar>,
    // Wilder running sums of TR / +DM / -DM
    smoothed: Option<(f64, f64, f64)>,
    seed_tr: f64,
    seed_plus: f64,
    seed_minus: f64,
    bars_seen: usize,
    adx: Option<f64>,
    seed_dx: f64,
    dx_seen: usize,
}

impl DirectionalMovement {
    /// Create new directional movement state with given period (typically 14)
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "period must be greater than 0");
        Self {
            period,
            prev_bar: None,
            smoothed: None,
            seed_tr: 0.0,
            seed_plus: 0.0,
            seed_minus: 0.0,
            bars_seen: 0,
            adx: None,
            seed_dx: 0.0,
            dx_seen: 0,
        }
    }

    /// Bars required before the first defined +DI/-DI
    pub fn lookback_di(period: usize) -> usize {
        period
    }

    /// Bars required before the first defined ADX
    pub fn lookback_adx(period: usize) -> usize {
        2 * period - 1
    }

    /// Update with a new bar
    pub fn update(&mut self, bar: Bar) -> DirectionalOutput {
        let prev = match self.prev_bar.replace(bar) {
            Some(prev) => prev,
            None => return DirectionalOutput::default(),
        };

        let up_move = bar.high - prev.high;
        let down_move = prev.low - bar.low;
        let plus_dm = if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        };
        let minus_dm = if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        };
        let tr = (bar.high - bar.low)
            .max((bar.high - prev.close).abs())
            .max((bar.low - prev.close).abs());

        let (s_tr, s_plus, s_minus) = match self.smoothed {
            Some((s_tr, s_plus, s_minus)) => {
                let n = self.period as f64;
                (
                    s_tr - s_tr / n + tr,
                    s_plus - s_plus / n + plus_dm,
                    s_minus - s_minus / n + minus_dm,
                )
            }
            None => {
                self.seed_tr += tr;
                self.seed_plus += plus_dm;
                self.seed_minus += minus_dm;
                self.bars_seen += 1;
                if self.bars_seen < self.period {
                    return DirectionalOutput::default();
                }
                (self.seed_tr, self.seed_plus, self.seed_minus)
            }
        };
        self.smoothed = Some((s_tr, s_plus, s_minus));

        let (plus_di, minus_di) = if s_tr == 0.0 {
            (0.0, 0.0)
        } else {
            (100.0 * s_plus / s_tr, 100.0 * s_minus / s_tr)
        };

        let di_sum = plus_di + minus_di;
        let dx = if di_sum == 0.0 {
            0.0
        } else {
            100.0 * (plus_di - minus_di).abs() / di_sum
        };

        let adx = match self.adx {
            Some(prev_adx) => {
                let n = self.period as f64;
                let adx = (prev_adx * (n - 1.0) + dx) / n;
                self.adx = Some(adx);
                Some(adx)
            }
            None => {
                self.seed_dx += dx;
                self.dx_seen += 1;
                if self.dx_seen == self.period {
                    let adx = self.seed_dx / self.period as f64;
                    self.adx = Some(adx);
                    Some(adx)
                } else {
                    None
                }
            }
        };

        DirectionalOutput {
            plus_di: Some(plus_di),
            minus_di: Some(minus_di),
            adx,
        }
    }

    /// Compute (adx, plus_di, minus_di) columns for a bar slice
    #[allow(clippy::type_complexity)]
    pub fn compute(
        period: usize,
        bars: &[Bar],
    ) -> (Vec<Option<f64>>, Vec<Option<f64>>, Vec<Option<f64>>) {
        let mut dm = Self::new(period);
        let mut adx = Vec::with_capacity(bars.len());
        let mut plus = Vec::with_capacity(bars.len());
        let mut minus = Vec::with_capacity(bars.len());
        for &bar in bars {
            let out = dm.update(bar);
            adx.push(out.adx);
            plus.push(out.plus_di);
            minus.push(out.minus_di);
        }
        (adx, plus, minus)
    }
}

/// Parabolic SAR
///
/// The stop extends from the prior extreme point toward price; the
/// acceleration factor grows by `acceleration` on each new extreme, capped
/// at `max_acceleration`, and the trend flips when price crosses the stop.
/// Defined from index 1.
#[derive(Debug, Clone, Copy)]
pub struct ParabolicSar {
    pub acceleration: f64,
    pub max_acceleration: f64,
}

impl ParabolicSar {
    /// Create with custom step and cap
    pub fn new(acceleration: f64, max_acceleration: f64) -> Self {
        Self {
            acceleration,
            max_acceleration,
        }
    }

    /// Bars required before the first defined output
    pub fn lookback() -> usize {
        1
    }

    /// Compute the SAR column for a bar slice
    pub fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let n = bars.len();
        let mut out = vec![None; n];
        if n < 2 {
            return out;
        }

        let mut rising = bars[1].close >= bars[0].close;
        let mut af = self.acceleration;
        let mut ep = if rising { bars[1].high } else { bars[1].low };
        let mut sar = if rising {
            bars[0].low.min(bars[1].low)
        } else {
            bars[0].high.max(bars[1].high)
        };
        out[1] = Some(sar);

        for i in 2..n {
            let bar = bars[i];
            let mut next = sar + af * (ep - sar);

            if rising {
                // The stop may never move into the prior two bars' range
                next = next.min(bars[i - 1].low).min(bars[i - 2].low);
                if bar.low < next {
                    rising = false;
                    next = ep;
                    ep = bar.low;
                    af = self.acceleration;
                } else if bar.high > ep {
                    ep = bar.high;
                    af = (af + self.acceleration).min(self.max_acceleration);
                }
            } else {
                next = next.max(bars[i - 1].high).max(bars[i - 2].high);
                if bar.high > next {
                    rising = true;
                    next = ep;
                    ep = bar.high;
                    af = self.acceleration;
                } else if bar.low < ep {
                    ep = bar.low;
                    af = (af + self.acceleration).min(self.max_acceleration);
                }
            }

            sar = next;
            out[i] = Some(sar);
        }

        out
    }
}

impl Default for ParabolicSar {
    /// Standard (0.02, 0.2) parameters
    fn default() -> Self {
        Self::new(0.02, 0.2)
    }
}
