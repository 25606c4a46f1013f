//! Indicator pipeline: declarative stages, execution engine, strategy profiles

pub mod engine;
pub mod profile;
pub mod stage;

pub use engine::{IndicatorPipeline, PipelineConfig};
pub use profile::{OrderKind, OrderTypeConfig, RoiTable, StoplossConfig, StrategyProfile};
pub use stage::PipelineStage;
