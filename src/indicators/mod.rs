//! Technical-analysis indicator library
//!
//! All functions are pure and deterministic: the same input series and
//! parameters always produce the same output series. Outputs are
//! index-aligned with the input; entries inside an indicator's lookback
//! window are `None`. Each indicator exposes its lookback so the pipeline
//! can aggregate a series-wide warm-up length.

pub mod average;
pub mod directional;
pub mod ichimoku;
pub mod oscillator;
pub mod volume;

pub use average::{ExponentialMovingAverage, SimpleMovingAverage, Tema};
pub use directional::{DirectionalMovement, DirectionalOutput, ParabolicSar};
pub use ichimoku::{Ichimoku, IchimokuParams};
pub use oscillator::{Macd, Rsi, StochasticFast};
pub use volume::OnBalanceVolume;
