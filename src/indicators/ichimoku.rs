//! Ichimoku Cloud lines
//!
//! Tenkan and kijun are rolling midpoints of the high/low range; the senkou
//! spans are midpoints displaced forward, so the value consumed at index
//! `t` was computed from bars up to `t - displacement`.

use crate::types::Bar;

/// Ichimoku line parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IchimokuParams {
    pub tenkan: usize,
    pub kijun: usize,
    pub senkou: usize,
    pub displacement: usize,
}

impl Default for IchimokuParams {
    /// Standard (9, 26, 52, 26) parameters
    fn default() -> Self {
        Self {
            tenkan: 9,
            kijun: 26,
            senkou: 52,
            displacement: 26,
        }
    }
}

/// Computed Ichimoku line columns
#[derive(Debug, Clone)]
pub struct Ichimoku {
    pub tenkan: Vec<Option<f64>>,
    pub kijun: Vec<Option<f64>>,
    pub senkou_a: Vec<Option<f64>>,
    pub senkou_b: Vec<Option<f64>>,
}

impl Ichimoku {
    /// Bars required before the first defined senkou span B, the slowest line
    pub fn lookback(params: IchimokuParams) -> usize {
        params.senkou - 1 + params.displacement
    }

    /// Compute all four line columns for a bar slice
    pub fn compute(params: IchimokuParams, bars: &[Bar]) -> Self {
        let tenkan = midpoint(bars, params.tenkan);
        let kijun = midpoint(bars, params.kijun);

        // Senkou A is the tenkan/kijun midpoint shifted forward
        let senkou_a_raw: Vec<Option<f64>> = tenkan
            .iter()
            .zip(kijun.iter())
            .map(|(&t, &k)| match (t, k) {
                (Some(t), Some(k)) => Some((t + k) / 2.0),
                _ => None,
            })
            .collect();
        let senkou_b_raw = midpoint(bars, params.senkou);

        Self {
            tenkan,
            kijun,
            senkou_a: shift_forward(&senkou_a_raw, params.displacement),
            senkou_b: shift_forward(&senkou_b_raw, params.displacement),
        }
    }
}

/// Rolling `(highest_high + lowest_low) / 2` over trailing `length` bars
fn midpoint(bars: &[Bar], length: usize) -> Vec<Option<f64>> {
    (0..bars.len())
        .map(|i| {
            if i + 1 < length {
                return None;
            }
            let window = &bars[i + 1 - length..=i];
            let highest = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
            let lowest = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
            Some((highest + lowest) / 2.0)
        })
        .collect()
}

/// Shift a column forward by `displacement` indices, keeping the length
fn shift_forward(values: &[Option<f64>], displacement: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            i.checked_sub(displacement)
                .and_then(|src| values[src])
        })
        .collect()
}
