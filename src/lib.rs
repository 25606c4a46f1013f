//! # candlepipe
//!
//! A multi-timeframe technical-analysis pipeline for OHLCV candle data.
//!
//! Candles flow through an ordered list of declarative stages: indicators
//! are computed per timeframe, a coarser "informative" series is merged
//! into the base series without look-ahead, and indicator pairs reduce to
//! tri-state directional condition codes for a host trading runtime.
//!
//! ## Example
//!
//! ```rust,no_run
//! use candlepipe::prelude::*;
//!
//! let profile = StrategyProfile::multi_timeframe();
//! let pipeline = profile.build_pipeline()?;
//!
//! let mut provider = InMemoryDataProvider::new();
//! provider.set_whitelist(["BTC/USDT".to_string()]);
//! // ... add candle series for each pair and timeframe ...
//!
//! let frame = pipeline.compute(&provider, "BTC/USDT")?;
//! for name in frame.column_names() {
//!     println!("{name}");
//! }
//! # Ok::<(), candlepipe::error::PipelineError>(())
//! ```

pub mod align;
pub mod condition;
pub mod error;
pub mod frame;
pub mod indicators;
pub mod pipeline;
pub mod provider;
pub mod series;
pub mod strategy;
pub mod timeframe;
pub mod types;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::align::TimeframeAligner;
    pub use crate::condition::ConditionCode;
    pub use crate::error::{PipelineError, Result};
    pub use crate::frame::{AnnotatedSeries, Column, ColumnId, ColumnKey, Scope};
    pub use crate::pipeline::{
        IndicatorPipeline, PipelineConfig, PipelineStage, StrategyProfile,
    };
    pub use crate::provider::{DataProvider, InMemoryDataProvider};
    pub use crate::series::CandleSeries;
    pub use crate::strategy::{ProfileStrategy, Signal, TradingStrategy};
    pub use crate::timeframe::Timeframe;
    pub use crate::types::*;
}
