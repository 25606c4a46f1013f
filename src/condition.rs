//! Tri-state directional condition codes
//!
//! A condition reduces a pair of aligned numeric series (or a series and a
//! constant) into one directional code per bar. `Undefined` means "not yet
//! computable" and is kept distinct from `Neutral` ("values equal") at every
//! step; the two never conflate.

use serde::{Deserialize, Serialize};

/// Directional condition code for one bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionCode {
    /// First operand above second
    Bullish,
    /// First operand below second
    Bearish,
    /// Operands equal (both defined)
    Neutral,
    /// Not yet computable (inside some input's warm-up window)
    Undefined,
}

impl ConditionCode {
    /// Numeric rendering: 1 / -1 / 0. `Undefined` has none.
    pub fn as_value(&self) -> Option<f64> {
        match self {
            ConditionCode::Bullish => Some(1.0),
            ConditionCode::Bearish => Some(-1.0),
            ConditionCode::Neutral => Some(0.0),
            ConditionCode::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        !matches!(self, ConditionCode::Undefined)
    }

    /// Compare two optional values into a code
    pub fn compare(a: Option<f64>, b: Option<f64>) -> Self {
        match (a, b) {
            (Some(a), Some(b)) => {
                if a > b {
                    ConditionCode::Bullish
                } else if a < b {
                    ConditionCode::Bearish
                } else {
                    ConditionCode::Neutral
                }
            }
            _ => ConditionCode::Undefined,
        }
    }
}

/// Encode column-vs-column comparison per index
pub fn encode_compare(a: &[Option<f64>], b: &[Option<f64>]) -> Vec<ConditionCode> {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(&a, &b)| ConditionCode::compare(a, b))
        .collect()
}

/// Encode column-vs-constant comparison per index
pub fn encode_vs_constant(a: &[Option<f64>], constant: f64) -> Vec<ConditionCode> {
    a.iter()
        .map(|&a| ConditionCode::compare(a, Some(constant)))
        .collect()
}

/// Encode price position relative to the Ichimoku cloud
///
/// Bullish above the cloud top (max of the spans), bearish below the cloud
/// bottom, neutral inside. Undefined while either span is undefined.
pub fn encode_cloud_position(
    close: &[f64],
    senkou_a: &[Option<f64>],
    senkou_b: &[Option<f64>],
) -> Vec<ConditionCode> {
    debug_assert_eq!(close.len(), senkou_a.len());
    debug_assert_eq!(close.len(), senkou_b.len());
    close
        .iter()
        .zip(senkou_a.iter().zip(senkou_b.iter()))
        .map(|(&close, (&a, &b))| match (a, b) {
            (Some(a), Some(b)) => {
                let top = a.max(b);
                let bottom = a.min(b);
                if close > top {
                    ConditionCode::Bullish
                } else if close < bottom {
                    ConditionCode::Bearish
                } else {
                    ConditionCode::Neutral
                }
            }
            _ => ConditionCode::Undefined,
        })
        .collect()
}

/// Encode the compound ADX trend condition
///
/// Bullish when `adx > threshold` and `plus_di > minus_di`, bearish when
/// `adx > threshold` and `plus_di < minus_di`, neutral otherwise. All three
/// inputs must be defined for the result to be defined.
pub fn encode_adx_trend(
    adx: &[Option<f64>],
    plus_di: &[Option<f64>],
    minus_di: &[Option<f64>],
    threshold: f64,
) -> Vec<ConditionCode> {
    debug_assert_eq!(adx.len(), plus_di.len());
    debug_assert_eq!(adx.len(), minus_di.len());
    adx.iter()
        .zip(plus_di.iter().zip(minus_di.iter()))
        .map(|(&adx, (&plus, &minus))| match (adx, plus, minus) {
            (Some(adx), Some(plus), Some(minus)) => {
                if adx > threshold && plus > minus {
                    ConditionCode::Bullish
                } else if adx > threshold && plus < minus {
                    ConditionCode::Bearish
                } else {
                    ConditionCode::Neutral
                }
            }
            _ => ConditionCode::Undefined,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_directions() {
        assert_eq!(
            ConditionCode::compare(Some(2.0), Some(1.0)),
            ConditionCode::Bullish
        );
        assert_eq!(
            ConditionCode::compare(Some(1.0), Some(2.0)),
            ConditionCode::Bearish
        );
        assert_eq!(
            ConditionCode::compare(Some(1.0), Some(1.0)),
            ConditionCode::Neutral
        );
    }

    #[test]
    fn test_undefined_never_collapses_to_neutral() {
        assert_eq!(
            ConditionCode::compare(None, Some(1.0)),
            ConditionCode::Undefined
        );
        assert_eq!(
            ConditionCode::compare(Some(1.0), None),
            ConditionCode::Undefined
        );
        assert_eq!(ConditionCode::compare(None, None), ConditionCode::Undefined);
        assert_ne!(ConditionCode::Undefined, ConditionCode::Neutral);
        assert_eq!(ConditionCode::Undefined.as_value(), None);
    }

    #[test]
    fn test_encode_compare() {
        let a = vec![None, Some(2.0), Some(1.0), Some(1.0)];
        let b = vec![Some(1.0), Some(1.0), Some(2.0), Some(1.0)];
        let codes = encode_compare(&a, &b);
        assert_eq!(
            codes,
            vec![
                ConditionCode::Undefined,
                ConditionCode::Bullish,
                ConditionCode::Bearish,
                ConditionCode::Neutral,
            ]
        );
    }

    #[test]
    fn test_encode_cloud_position() {
        let close = vec![10.0, 10.0, 10.0, 10.0];
        let a = vec![None, Some(8.0), Some(11.0), Some(9.0)];
        let b = vec![None, Some(9.0), Some(12.0), Some(11.0)];
        let codes = encode_cloud_position(&close, &a, &b);
        assert_eq!(codes[0], ConditionCode::Undefined);
        assert_eq!(codes[1], ConditionCode::Bullish); // above both spans
        assert_eq!(codes[2], ConditionCode::Bearish); // below both spans
        assert_eq!(codes[3], ConditionCode::Neutral); // inside the cloud
    }

    #[test]
    fn test_encode_adx_trend() {
        let adx = vec![Some(30.0), Some(30.0), Some(20.0), None];
        let plus = vec![Some(25.0), Some(10.0), Some(25.0), Some(25.0)];
        let minus = vec![Some(10.0), Some(25.0), Some(10.0), Some(10.0)];
        let codes = encode_adx_trend(&adx, &plus, &minus, 25.0);
        assert_eq!(codes[0], ConditionCode::Bullish);
        assert_eq!(codes[1], ConditionCode::Bearish);
        assert_eq!(codes[2], ConditionCode::Neutral); // weak trend, not undefined
        assert_eq!(codes[3], ConditionCode::Undefined);
    }

    #[test]
    fn test_encode_vs_constant() {
        let a = vec![None, Some(30.0), Some(20.0), Some(25.0)];
        let codes = encode_vs_constant(&a, 25.0);
        assert_eq!(codes[0], ConditionCode::Undefined);
        assert_eq!(codes[1], ConditionCode::Bullish);
        assert_eq!(codes[2], ConditionCode::Bearish);
        assert_eq!(codes[3], ConditionCode::Neutral);
    }
}
