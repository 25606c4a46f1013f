//! Indicator pipeline execution
//!
//! Orchestrates stage execution in dependency order: informative stages on
//! the informative series, the timeframe merge, base stages, and condition
//! stages over the resulting columns. The pipeline core is pure and does no
//! I/O; candle retrieval goes through the caller-supplied [`DataProvider`].

use crate::align::TimeframeAligner;
use crate::error::{PipelineError, Result};
use crate::frame::{AnnotatedSeries, ColumnKey};
use crate::pipeline::stage::PipelineStage;
use crate::provider::DataProvider;
use crate::series::CandleSeries;
use crate::timeframe::Timeframe;
use crate::types::Pair;
use rayon::prelude::*;

/// Pipeline configuration
///
/// Immutable after construction; validated by [`IndicatorPipeline::new`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub base_timeframe: Timeframe,
    /// Coarser context timeframe, if any
    pub informative_timeframe: Option<Timeframe>,
    /// Stages run on the informative series before the merge
    pub informative_stages: Vec<PipelineStage>,
    /// Stages run on the base series after the merge
    pub base_stages: Vec<PipelineStage>,
    /// Drop all rows before the warm-up index from the returned frame
    pub trim_warmup: bool,
    /// Minimum bars to request from the data provider
    pub startup_candle_count: usize,
}

/// Multi-timeframe indicator and condition pipeline
#[derive(Debug, Clone)]
pub struct IndicatorPipeline {
    config: PipelineConfig,
    aligner: Option<TimeframeAligner>,
}

impl IndicatorPipeline {
    /// Validate a configuration and build the pipeline
    ///
    /// Rejects an informative timeframe that is not strictly coarser than
    /// the base ([`PipelineError::MisalignedTimeframes`]) and any stage
    /// whose inputs no earlier stage produces
    /// ([`PipelineError::UnknownColumn`]). Both are configuration-time
    /// failures; `run` never re-checks them.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let aligner = match config.informative_timeframe {
            Some(informative) => Some(TimeframeAligner::new(config.base_timeframe, informative)?),
            None => {
                if !config.informative_stages.is_empty() {
                    return Err(PipelineError::MissingInformative);
                }
                None
            }
        };

        Self::validate_stage_inputs(&config.informative_stages, &[])?;

        // Base stages may also read columns merged from the informative frame
        let merged: Vec<ColumnKey> = config
            .informative_stages
            .iter()
            .flat_map(|s| s.outputs())
            .map(ColumnKey::informative)
            .collect();
        Self::validate_stage_inputs(&config.base_stages, &merged)?;

        Ok(Self { config, aligner })
    }

    fn validate_stage_inputs(stages: &[PipelineStage], seeded: &[ColumnKey]) -> Result<()> {
        let mut available: Vec<ColumnKey> = seeded.to_vec();
        for stage in stages {
            for input in stage.inputs() {
                if !available.contains(&input) {
                    return Err(PipelineError::UnknownColumn(input.to_string()));
                }
            }
            available.extend(stage.outputs().into_iter().map(ColumnKey::base));
        }
        Ok(())
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Maximum lookback across all active base stages
    ///
    /// Chained stages (an EMA over another stage's column) accumulate, so
    /// the warm-up observed on real data can exceed this; it is the lower
    /// bound used for history sizing together with `startup_candle_count`.
    pub fn required_lookback(&self) -> usize {
        self.config
            .base_stages
            .iter()
            .map(|s| s.lookback())
            .max()
            .unwrap_or(0)
    }

    fn informative_lookback(&self) -> usize {
        self.config
            .informative_stages
            .iter()
            .map(|s| s.lookback())
            .max()
            .unwrap_or(0)
    }

    /// Minimum bars to request for the base series
    pub fn min_candles(&self) -> usize {
        self.config
            .startup_candle_count
            .max(self.required_lookback() + 1)
    }

    /// Cross product of the provider's whitelist with the informative timeframe
    ///
    /// Empty when no informative timeframe is configured.
    pub fn informative_pairs(&self, provider: &dyn DataProvider) -> Vec<(Pair, Timeframe)> {
        match self.config.informative_timeframe {
            Some(informative) => provider
                .current_whitelist()
                .into_iter()
                .map(|pair| (pair, informative))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Run the pure pipeline core over already-fetched candles
    pub fn run(
        &self,
        base: CandleSeries,
        informative: Option<&CandleSeries>,
    ) -> Result<AnnotatedSeries> {
        if base.is_empty() {
            return Err(PipelineError::EmptySeries(base.pair().to_string()));
        }

        let pair = base.pair().to_string();
        let mut frame = AnnotatedSeries::new(base);

        if let Some(aligner) = &self.aligner {
            let informative = informative.ok_or(PipelineError::MissingInformative)?;
            if informative.timeframe() != aligner.informative() {
                return Err(PipelineError::MisalignedTimeframes {
                    base: self.config.base_timeframe.to_string(),
                    informative: informative.timeframe().to_string(),
                });
            }

            let mut informative_frame = AnnotatedSeries::new(informative.clone());
            for stage in &self.config.informative_stages {
                stage.apply(&mut informative_frame)?;
            }
            aligner.merge(&mut frame, &informative_frame)?;
        }

        for stage in &self.config.base_stages {
            stage.apply(&mut frame)?;
        }

        let warmup = self.warmup_len(&frame);
        frame.set_warmup_len(warmup);
        log::debug!(
            "pipeline for {}: {} rows, {} columns, warm-up {}",
            pair,
            frame.len(),
            frame.column_names().len(),
            warmup,
        );

        if self.config.trim_warmup {
            frame.drop_front(warmup);
        }

        Ok(frame)
    }

    /// First index at which every configured condition column is defined
    ///
    /// Equals the frame length when some condition column never becomes
    /// defined (insufficient history).
    fn warmup_len(&self, frame: &AnnotatedSeries) -> usize {
        frame
            .keys()
            .filter(|key| key.id.is_condition())
            .map(|key| {
                frame
                    .column(key)
                    .ok()
                    .and_then(|c| c.first_defined())
                    .unwrap_or(frame.len())
            })
            .max()
            .unwrap_or(0)
    }

    /// Fetch candles for `pair` through the provider and run the pipeline
    pub fn compute(&self, provider: &dyn DataProvider, pair: &str) -> Result<AnnotatedSeries> {
        let base = provider.get_candles(pair, self.config.base_timeframe, self.min_candles())?;
        let informative = match self.config.informative_timeframe {
            Some(informative_tf) => Some(provider.get_candles(
                pair,
                informative_tf,
                self.informative_lookback() + 1,
            )?),
            None => None,
        };
        self.run(base, informative.as_ref())
    }

    /// Compute every whitelisted pair, in parallel
    ///
    /// Pairs whose data is unavailable are skipped with a warning rather
    /// than failing the whole sweep; the host retries them next cycle.
    pub fn compute_whitelist(&self, provider: &dyn DataProvider) -> Vec<(Pair, AnnotatedSeries)> {
        let pairs = provider.current_whitelist();
        log::info!("computing pipeline for {} whitelisted pairs", pairs.len());
        pairs
            .into_par_iter()
            .filter_map(|pair| match self.compute(provider, &pair) {
                Ok(frame) => Some((pair, frame)),
                Err(err) => {
                    log::warn!("skipping {pair}: {err}");
                    None
                }
            })
            .collect()
    }
}
