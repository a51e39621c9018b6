use serde::Serialize;
use serde_json::Value;

use seriate_core::{Aggregator, Interpolator, Kind, Reduce, Reducer, Sample};
use seriate_types::{FieldSelector, SeriesConfig, SeriesError, TsFormat, ValueFormat};

/// Record input collected by a builder; errors are deferred to `build()`.
#[derive(Debug)]
enum Records {
    Values(Vec<Value>),
    Invalid(SeriesError),
}

impl Default for Records {
    fn default() -> Self {
        Self::Values(Vec::new())
    }
}

impl Records {
    fn from_serialize<I, T>(records: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Serialize,
    {
        let mut out = Vec::new();
        for r in records {
            match serde_json::to_value(r) {
                Ok(v) => out.push(v),
                Err(e) => {
                    return Self::Invalid(SeriesError::invalid_input(format!(
                        "record is not serializable: {e}"
                    )));
                }
            }
        }
        Self::Values(out)
    }

    fn from_value(v: Value) -> Self {
        match v {
            Value::Array(items) => Self::Values(items),
            other => Self::Invalid(SeriesError::invalid_input(format!(
                "records must be a sequence, got {other}"
            ))),
        }
    }

    fn into_values(self) -> Result<Vec<Value>, SeriesError> {
        match self {
            Self::Values(v) => Ok(v),
            Self::Invalid(e) => Err(e),
        }
    }
}

/// Builder for an [`Interpolator`].
///
/// Typical usage chains record input and normalization configuration:
///
/// ```
/// use seriate::{InterpolatorBuilder, Kind};
/// use serde_json::json;
///
/// let mut ip = InterpolatorBuilder::new()
///     .records_value(json!([
///         {"timestamp": "2018-12-31 18:30:00", "value": 89},
///         {"timestamp": "2018-12-31 18:31:00", "value": 80},
///     ]))
///     .kind(Kind::Nearest)
///     .build()?;
/// assert_eq!(ip.query("2018-12-31 18:30:10")?, 89.0);
/// # Ok::<(), seriate::SeriesError>(())
/// ```
#[derive(Debug, Default)]
pub struct InterpolatorBuilder {
    records: Records,
    cfg: SeriesConfig,
    kind: Kind,
}

impl InterpolatorBuilder {
    /// Start with defaults: no records, conventional field keys, lenient
    /// timestamp parsing, linear interpolation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply records as any serializable collection.
    ///
    /// Each record is serialized to a JSON value; objects resolve key
    /// selectors, arrays resolve index selectors.
    #[must_use]
    pub fn records<I, T>(mut self, records: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Serialize,
    {
        self.records = Records::from_serialize(records);
        self
    }

    /// Supply records as a pre-built JSON value.
    ///
    /// Anything but an array makes `build()` fail with
    /// [`SeriesError::InvalidInput`].
    #[must_use]
    pub fn records_value(mut self, v: Value) -> Self {
        self.records = Records::from_value(v);
        self
    }

    /// Read the raw timestamp from this object key.
    #[must_use]
    pub fn ts_attr(mut self, key: impl Into<String>) -> Self {
        self.cfg.ts_attr = FieldSelector::Key(key.into());
        self
    }

    /// Read the raw timestamp from this array position.
    #[must_use]
    pub fn ts_index(mut self, idx: usize) -> Self {
        self.cfg.ts_attr = FieldSelector::Index(idx);
        self
    }

    /// Read the raw timestamp with a custom extraction closure.
    #[must_use]
    pub fn ts_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, SeriesError> + Send + Sync + 'static,
    {
        self.cfg.ts_attr = FieldSelector::with(f);
        self
    }

    /// Read the raw value from this object key.
    #[must_use]
    pub fn value_attr(mut self, key: impl Into<String>) -> Self {
        self.cfg.value_attr = FieldSelector::Key(key.into());
        self
    }

    /// Read the raw value from this array position.
    #[must_use]
    pub fn value_index(mut self, idx: usize) -> Self {
        self.cfg.value_attr = FieldSelector::Index(idx);
        self
    }

    /// Read the raw value with a custom extraction closure.
    #[must_use]
    pub fn value_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, SeriesError> + Send + Sync + 'static,
    {
        self.cfg.value_attr = FieldSelector::with(f);
        self
    }

    /// Set the timestamp format: an exact pattern string or a prebuilt
    /// [`TsFormat`].
    #[must_use]
    pub fn ts_format(mut self, fmt: impl Into<TsFormat>) -> Self {
        self.cfg.ts_format = fmt.into();
        self
    }

    /// Format raw timestamps with a custom closure returning epoch seconds.
    #[must_use]
    pub fn ts_format_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<f64, SeriesError> + Send + Sync + 'static,
    {
        self.cfg.ts_format = TsFormat::with(f);
        self
    }

    /// Format raw values with a custom closure; its output is used
    /// verbatim.
    #[must_use]
    pub fn value_format_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<f64, SeriesError> + Send + Sync + 'static,
    {
        self.cfg.value_format = ValueFormat::with(f);
        self
    }

    /// Select the interpolation kind (default: linear).
    #[must_use]
    pub const fn kind(mut self, kind: Kind) -> Self {
        self.kind = kind;
        self
    }

    /// Normalize the records and fit the initial curve.
    ///
    /// # Errors
    /// Surfaces deferred record-input errors, then any normalization
    /// failure; one bad record fails the whole construction.
    pub fn build(self) -> Result<Interpolator, SeriesError> {
        let records = self.records.into_values()?;
        Interpolator::from_records(&records, self.cfg, self.kind)
    }
}

/// Builder for an [`Aggregator`].
///
/// ```
/// use seriate::{AggregatorBuilder, Reduce};
/// use serde_json::json;
///
/// let agg = AggregatorBuilder::new()
///     .records_value(json!([
///         {"timestamp": 0, "value": 89},
///         {"timestamp": 30, "value": 82},
///     ]))
///     .reduce(Reduce::Mean)
///     .build()?;
/// assert_eq!(agg.query(0, 60)?, 85.5);
/// # Ok::<(), seriate::SeriesError>(())
/// ```
#[derive(Debug, Default)]
pub struct AggregatorBuilder {
    records: Records,
    cfg: SeriesConfig,
    reducer: Option<Reducer>,
}

impl AggregatorBuilder {
    /// Start with defaults: no records, conventional field keys, lenient
    /// timestamp parsing. A reduction must be supplied before `build()`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply records as any serializable collection.
    #[must_use]
    pub fn records<I, T>(mut self, records: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Serialize,
    {
        self.records = Records::from_serialize(records);
        self
    }

    /// Supply records as a pre-built JSON value; anything but an array
    /// makes `build()` fail with [`SeriesError::InvalidInput`].
    #[must_use]
    pub fn records_value(mut self, v: Value) -> Self {
        self.records = Records::from_value(v);
        self
    }

    /// Read the raw timestamp from this object key.
    #[must_use]
    pub fn ts_attr(mut self, key: impl Into<String>) -> Self {
        self.cfg.ts_attr = FieldSelector::Key(key.into());
        self
    }

    /// Read the raw timestamp from this array position.
    #[must_use]
    pub fn ts_index(mut self, idx: usize) -> Self {
        self.cfg.ts_attr = FieldSelector::Index(idx);
        self
    }

    /// Read the raw timestamp with a custom extraction closure.
    #[must_use]
    pub fn ts_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, SeriesError> + Send + Sync + 'static,
    {
        self.cfg.ts_attr = FieldSelector::with(f);
        self
    }

    /// Read the raw value from this object key.
    #[must_use]
    pub fn value_attr(mut self, key: impl Into<String>) -> Self {
        self.cfg.value_attr = FieldSelector::Key(key.into());
        self
    }

    /// Read the raw value from this array position.
    #[must_use]
    pub fn value_index(mut self, idx: usize) -> Self {
        self.cfg.value_attr = FieldSelector::Index(idx);
        self
    }

    /// Read the raw value with a custom extraction closure.
    #[must_use]
    pub fn value_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, SeriesError> + Send + Sync + 'static,
    {
        self.cfg.value_attr = FieldSelector::with(f);
        self
    }

    /// Set the timestamp format: an exact pattern string or a prebuilt
    /// [`TsFormat`].
    #[must_use]
    pub fn ts_format(mut self, fmt: impl Into<TsFormat>) -> Self {
        self.cfg.ts_format = fmt.into();
        self
    }

    /// Format raw timestamps with a custom closure returning epoch seconds.
    #[must_use]
    pub fn ts_format_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<f64, SeriesError> + Send + Sync + 'static,
    {
        self.cfg.ts_format = TsFormat::with(f);
        self
    }

    /// Format raw values with a custom closure; its output is used
    /// verbatim.
    #[must_use]
    pub fn value_format_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<f64, SeriesError> + Send + Sync + 'static,
    {
        self.cfg.value_format = ValueFormat::with(f);
        self
    }

    /// Use a built-in reduction.
    #[must_use]
    pub fn reduce(mut self, r: Reduce) -> Self {
        self.reducer = Some(Reducer::Builtin(r));
        self
    }

    /// Use a custom reduction over each window's samples.
    #[must_use]
    pub fn reduce_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&[Sample]) -> f64 + Send + Sync + 'static,
    {
        self.reducer = Some(Reducer::custom(f));
        self
    }

    /// Normalize the records and assemble the aggregator.
    ///
    /// # Errors
    /// Surfaces deferred record-input errors, requires a reduction, then
    /// any normalization failure; one bad record fails the whole
    /// construction.
    pub fn build(self) -> Result<Aggregator, SeriesError> {
        let records = self.records.into_values()?;
        let reducer = self
            .reducer
            .ok_or_else(|| SeriesError::invalid_arg("aggregator requires a reduction"))?;
        Aggregator::from_records(&records, self.cfg, reducer)
    }
}
