//! Error types for candlepipe

use thiserror::Error;

/// Main error type for candlepipe
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Out-of-order bar for {pair}: {timestamp} is not after the last stored bar")]
    OutOfOrderBar { pair: String, timestamp: String },

    #[error("Irregular spacing for {pair}: gap before {timestamp} is not a multiple of the timeframe duration")]
    IrregularSpacing { pair: String, timestamp: String },

    #[error("Negative volume for {pair} at {timestamp}")]
    NegativeVolume { pair: String, timestamp: String },

    #[error("Data unavailable for {pair} @ {timeframe}: required {required} bars, {available} available")]
    DataUnavailable {
        pair: String,
        timeframe: String,
        required: usize,
        available: usize,
    },

    #[error("Misaligned timeframes: informative {informative} is not coarser than base {base}")]
    MisalignedTimeframes { base: String, informative: String },

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Pipeline configured with an informative timeframe but no informative series was provided")]
    MissingInformative,

    #[error("Empty candle series for {0}")]
    EmptySeries(String),

    #[error("Invalid timeframe: {0}")]
    InvalidTimeframe(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(i64),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Result type alias for candlepipe operations
pub type Result<T> = std::result::Result<T, PipelineError>;
