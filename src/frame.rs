//! Typed indicator columns attached to a candle series
//!
//! Columns are keyed by a [`ColumnId`] enumeration instead of free-form
//! strings, so a stage referencing a column nothing produced fails fast
//! with [`PipelineError::UnknownColumn`] rather than silently yielding
//! nothing. Keys carry a [`Scope`] because informative-timeframe columns
//! are merged into the base frame alongside base columns of the same id.

use crate::condition::ConditionCode;
use crate::error::{PipelineError, Result};
use crate::series::CandleSeries;
use crate::timeframe::Timeframe;
use hashbrown::HashMap;
use std::fmt;

/// Indicator and condition column identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnId {
    Rsi,
    RsiEma,
    FastK,
    FastD,
    Tenkan,
    Kijun,
    SenkouA,
    SenkouB,
    Macd,
    MacdSignal,
    Adx,
    PlusDi,
    MinusDi,
    Sar,
    Tema,
    Obv,
    ObvEma,
    RsiCondition,
    StochCondition,
    CloudCondition,
    LineCondition,
    MacdCondition,
    AdxCondition,
}

impl ColumnId {
    /// Deterministic column name
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnId::Rsi => "rsi",
            ColumnId::RsiEma => "rsi_ema",
            ColumnId::FastK => "fastk",
            ColumnId::FastD => "fastd",
            ColumnId::Tenkan => "tenkan",
            ColumnId::Kijun => "kijun",
            ColumnId::SenkouA => "senkou_a",
            ColumnId::SenkouB => "senkou_b",
            ColumnId::Macd => "macd",
            ColumnId::MacdSignal => "macdsignal",
            ColumnId::Adx => "adx",
            ColumnId::PlusDi => "plus_di",
            ColumnId::MinusDi => "minus_di",
            ColumnId::Sar => "sar",
            ColumnId::Tema => "tema",
            ColumnId::Obv => "obv",
            ColumnId::ObvEma => "obv_ema",
            ColumnId::RsiCondition => "rsi_condition",
            ColumnId::StochCondition => "stoch_condition",
            ColumnId::CloudCondition => "cloud_condition",
            ColumnId::LineCondition => "line_condition",
            ColumnId::MacdCondition => "macd_condition",
            ColumnId::AdxCondition => "adx_condition",
        }
    }

    /// Whether this id names a condition column
    pub fn is_condition(&self) -> bool {
        matches!(
            self,
            ColumnId::RsiCondition
                | ColumnId::StochCondition
                | ColumnId::CloudCondition
                | ColumnId::LineCondition
                | ColumnId::MacdCondition
                | ColumnId::AdxCondition
        )
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which timeframe a column was computed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Computed on the base timeframe
    Base,
    /// Computed on the informative timeframe and merged into the base frame
    Informative,
}

/// Scoped column key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnKey {
    pub id: ColumnId,
    pub scope: Scope,
}

impl ColumnKey {
    pub fn base(id: ColumnId) -> Self {
        Self {
            id,
            scope: Scope::Base,
        }
    }

    pub fn informative(id: ColumnId) -> Self {
        Self {
            id,
            scope: Scope::Informative,
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            Scope::Base => write!(f, "{}", self.id),
            Scope::Informative => write!(f, "{} (informative)", self.id),
        }
    }
}

/// One index-aligned column of indicator or condition values
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<Option<f64>>),
    Condition(Vec<ConditionCode>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Condition(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the entry at `index` is defined
    pub fn is_defined(&self, index: usize) -> bool {
        match self {
            Column::Numeric(v) => v.get(index).copied().flatten().is_some(),
            Column::Condition(v) => v.get(index).is_some_and(|c| c.is_defined()),
        }
    }

    /// Index of the first defined entry, if any
    pub fn first_defined(&self) -> Option<usize> {
        (0..self.len()).find(|&i| self.is_defined(i))
    }

    /// Numeric rendering of the entry at `index` (condition codes map to
    /// 1 / -1 / 0, undefined entries to `None`)
    pub fn value_at(&self, index: usize) -> Option<f64> {
        match self {
            Column::Numeric(v) => v.get(index).copied().flatten(),
            Column::Condition(v) => v.get(index).and_then(|c| c.as_value()),
        }
    }

    fn drop_front(&mut self, n: usize) {
        match self {
            Column::Numeric(v) => {
                v.drain(..n.min(v.len()));
            }
            Column::Condition(v) => {
                v.drain(..n.min(v.len()));
            }
        }
    }
}

/// A candle series plus its computed indicator and condition columns
///
/// Invariant: every column has exactly the series length.
#[derive(Debug, Clone)]
pub struct AnnotatedSeries {
    series: CandleSeries,
    columns: HashMap<ColumnKey, Column>,
    /// Insertion order, for deterministic iteration and naming
    order: Vec<ColumnKey>,
    /// Informative timeframe, when informative columns were merged in
    informative_timeframe: Option<Timeframe>,
    /// Warm-up length recorded by the pipeline, relative to the untrimmed
    /// series
    warmup_len: Option<usize>,
}

impl AnnotatedSeries {
    pub fn new(series: CandleSeries) -> Self {
        Self {
            series,
            columns: HashMap::new(),
            order: Vec::new(),
            informative_timeframe: None,
            warmup_len: None,
        }
    }

    pub fn series(&self) -> &CandleSeries {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub(crate) fn set_informative_timeframe(&mut self, timeframe: Timeframe) {
        self.informative_timeframe = Some(timeframe);
    }

    pub fn informative_timeframe(&self) -> Option<Timeframe> {
        self.informative_timeframe
    }

    pub(crate) fn set_warmup_len(&mut self, warmup: usize) {
        self.warmup_len = Some(warmup);
    }

    /// First index at which all condition columns were simultaneously
    /// defined, as recorded by the pipeline (indices refer to the series
    /// before any warm-up trimming)
    pub fn warmup_len(&self) -> Option<usize> {
        self.warmup_len
    }

    /// Insert a column, replacing any previous column under the same key
    ///
    /// Panics if the column length does not match the series length; stages
    /// always produce full-length columns, so a mismatch is a bug in the
    /// caller, not a data condition.
    pub fn insert(&mut self, key: ColumnKey, column: Column) {
        assert_eq!(
            column.len(),
            self.series.len(),
            "column {key} length does not match series length"
        );
        if self.columns.insert(key, column).is_none() {
            self.order.push(key);
        }
    }

    pub fn contains(&self, key: ColumnKey) -> bool {
        self.columns.contains_key(&key)
    }

    /// Column keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = ColumnKey> + '_ {
        self.order.iter().copied()
    }

    pub fn column(&self, key: ColumnKey) -> Result<&Column> {
        self.columns
            .get(&key)
            .ok_or_else(|| PipelineError::UnknownColumn(self.column_name(key)))
    }

    /// Numeric column access; fails fast on unknown or non-numeric columns
    pub fn numeric(&self, key: ColumnKey) -> Result<&[Option<f64>]> {
        match self.column(key)? {
            Column::Numeric(v) => Ok(v),
            Column::Condition(_) => Err(PipelineError::UnknownColumn(self.column_name(key))),
        }
    }

    /// Condition column access; fails fast on unknown or numeric columns
    pub fn condition(&self, key: ColumnKey) -> Result<&[ConditionCode]> {
        match self.column(key)? {
            Column::Condition(v) => Ok(v),
            Column::Numeric(_) => Err(PipelineError::UnknownColumn(self.column_name(key))),
        }
    }

    /// Deterministic external name for a column
    ///
    /// Informative-scoped columns carry the informative timeframe suffix,
    /// e.g. `rsi_1h`.
    pub fn column_name(&self, key: ColumnKey) -> String {
        match (key.scope, self.informative_timeframe) {
            (Scope::Informative, Some(tf)) => format!("{}_{}", key.id.as_str(), tf.as_str()),
            _ => key.id.as_str().to_string(),
        }
    }

    /// All column names in insertion order
    pub fn column_names(&self) -> Vec<String> {
        self.order.iter().map(|&k| self.column_name(k)).collect()
    }

    /// Drop the first `n` rows from the series and every column
    pub(crate) fn drop_front(&mut self, n: usize) {
        self.series.drop_front(n);
        for column in self.columns.values_mut() {
            column.drop_front(n);
        }
    }
}
