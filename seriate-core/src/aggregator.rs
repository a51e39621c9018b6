use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use seriate_types::{SeriesConfig, SeriesError, StepSpec, TimeSpec, TsFormat};

use crate::generate::{WindowValues, Windows};
use crate::normalize::Normalizer;
use crate::sample::Sample;
use crate::series::SampleSeries;

/// Built-in window reductions.
///
/// Empty windows reduce to `0.0` for `Sum` and `Count` and to NaN for the
/// rest, where no meaningful value exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Reduce {
    /// Sum of values.
    Sum,
    /// Arithmetic mean of values.
    Mean,
    /// Minimum value.
    Min,
    /// Maximum value.
    Max,
    /// Number of samples.
    Count,
    /// Value of the earliest sample.
    First,
    /// Value of the latest sample.
    Last,
    /// Sample standard deviation.
    StdDev,
}

impl Reduce {
    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Mean => "mean",
            Self::Min => "min",
            Self::Max => "max",
            Self::Count => "count",
            Self::First => "first",
            Self::Last => "last",
            Self::StdDev => "stddev",
        }
    }

    /// Apply the reduction to one window of samples.
    #[must_use]
    pub fn apply(&self, window: &[Sample]) -> f64 {
        match self {
            Self::Sum => window.iter().map(|s| s.value).sum(),
            Self::Count => window.len() as f64,
            Self::Mean => {
                if window.is_empty() {
                    f64::NAN
                } else {
                    window.iter().map(|s| s.value).sum::<f64>() / window.len() as f64
                }
            }
            Self::Min => window
                .iter()
                .map(|s| s.value)
                .min_by(f64::total_cmp)
                .unwrap_or(f64::NAN),
            Self::Max => window
                .iter()
                .map(|s| s.value)
                .max_by(f64::total_cmp)
                .unwrap_or(f64::NAN),
            Self::First => window.first().map_or(f64::NAN, |s| s.value),
            Self::Last => window.last().map_or(f64::NAN, |s| s.value),
            Self::StdDev => {
                if window.len() < 2 {
                    return f64::NAN;
                }
                // Welford's online algorithm.
                let mut mean = 0.0;
                let mut m2 = 0.0;
                for (i, s) in window.iter().enumerate() {
                    let delta = s.value - mean;
                    mean += delta / (i + 1) as f64;
                    m2 += delta * (s.value - mean);
                }
                (m2 / (window.len() - 1) as f64).sqrt()
            }
        }
    }
}

impl fmt::Display for Reduce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Reduce {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sum" => Ok(Self::Sum),
            "mean" | "avg" => Ok(Self::Mean),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            "count" => Ok(Self::Count),
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            "stddev" => Ok(Self::StdDev),
            other => Err(SeriesError::invalid_arg(format!(
                "unknown reduction: {other:?}"
            ))),
        }
    }
}

/// Shared closure type for custom reductions.
type ReduceFn = dyn Fn(&[Sample]) -> f64 + Send + Sync;

/// The reduction applied to each window: a built-in or a custom closure
/// over the window's `(timestamp, value)` samples.
#[derive(Clone)]
pub enum Reducer {
    /// One of the built-in reductions.
    Builtin(Reduce),
    /// A custom reduction, used as-is.
    Custom(Arc<ReduceFn>),
}

impl Reducer {
    /// Reducer backed by a custom closure.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[Sample]) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Apply the reduction to one window of samples.
    #[must_use]
    pub fn apply(&self, window: &[Sample]) -> f64 {
        match self {
            Self::Builtin(r) => r.apply(window),
            Self::Custom(f) => f(window),
        }
    }
}

impl From<Reduce> for Reducer {
    fn from(r: Reduce) -> Self {
        Self::Builtin(r)
    }
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(r) => f.debug_tuple("Builtin").field(r).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Windowed-reduction view over a normalized sample series.
///
/// Holds no derived state: every query locates its window bounds by binary
/// search and re-reduces the samples in between.
///
/// ```
/// use seriate_core::{Aggregator, Reduce, SeriesConfig};
/// use serde_json::json;
///
/// let records = vec![
///     json!({"timestamp": 0, "value": 89}),
///     json!({"timestamp": 30, "value": 82}),
///     json!({"timestamp": 60, "value": 80}),
/// ];
/// let agg = Aggregator::from_records(&records, SeriesConfig::default(), Reduce::Sum)?;
/// assert_eq!(agg.query(0, 60)?, 171.0);
/// # Ok::<(), seriate_core::SeriesError>(())
/// ```
#[derive(Debug)]
pub struct Aggregator {
    series: SampleSeries,
    norm: Normalizer,
    reducer: Reducer,
}

impl Aggregator {
    /// Normalize `records` into a series and store the reduction.
    ///
    /// # Errors
    /// Fails on the first record that cannot be normalized; no partial
    /// series is constructed.
    pub fn from_records(
        records: &[Value],
        cfg: SeriesConfig,
        reducer: impl Into<Reducer>,
    ) -> Result<Self, SeriesError> {
        let norm = Normalizer::new(cfg);
        let series = SampleSeries::from_samples(norm.normalize_all(records)?);
        Ok(Self {
            series,
            norm,
            reducer: reducer.into(),
        })
    }

    /// Wrap samples that are already normalized.
    #[must_use]
    pub fn from_samples(samples: Vec<Sample>, reducer: impl Into<Reducer>) -> Self {
        Self {
            series: SampleSeries::from_samples(samples),
            norm: Normalizer::new(SeriesConfig::default()),
            reducer: reducer.into(),
        }
    }

    /// The underlying ordered series.
    #[must_use]
    pub const fn series(&self) -> &SampleSeries {
        &self.series
    }

    /// Mutable access to the underlying series.
    pub const fn series_mut(&mut self) -> &mut SampleSeries {
        &mut self.series
    }

    /// The stored reduction.
    #[must_use]
    pub const fn reducer(&self) -> &Reducer {
        &self.reducer
    }

    /// Reduce the samples with timestamps in `[start, stop)`.
    ///
    /// # Errors
    /// Normalization of the bounds can fail; the reduction itself cannot.
    pub fn query(
        &self,
        start: impl Into<TimeSpec>,
        stop: impl Into<TimeSpec>,
    ) -> Result<f64, SeriesError> {
        self.query_fmt(start, stop, None)
    }

    /// [`query`](Self::query) with a per-call timestamp-format override.
    ///
    /// # Errors
    /// Normalization of the bounds can fail; the reduction itself cannot.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "seriate::aggregator::query",
            skip(self, start, stop, fmt),
            fields(samples = self.series.len()),
        )
    )]
    pub fn query_fmt(
        &self,
        start: impl Into<TimeSpec>,
        stop: impl Into<TimeSpec>,
        fmt: Option<&TsFormat>,
    ) -> Result<f64, SeriesError> {
        let s = self.norm.tidy_ts(&start.into(), fmt)?;
        let e = self.norm.tidy_ts(&stop.into(), fmt)?;
        Ok(self.reducer.apply(self.series.range(s..e)))
    }

    /// Lazy sequence of `(window start, reduced value)` pairs: windows of
    /// length `duration` starting at `start`, advancing by `step`, until
    /// `end` (exclusive).
    ///
    /// # Errors
    /// Fails when a bound, the duration, or the step cannot be normalized,
    /// or when the step is not positive.
    pub fn windows(
        &self,
        start: impl Into<TimeSpec>,
        end: impl Into<TimeSpec>,
        duration: impl Into<StepSpec>,
        step: impl Into<StepSpec>,
    ) -> Result<Windows<'_>, SeriesError> {
        self.windows_fmt(start, end, duration, step, None)
    }

    /// [`windows`](Self::windows) with a per-call timestamp-format override
    /// for the bounds.
    ///
    /// # Errors
    /// Same contract as [`windows`](Self::windows).
    pub fn windows_fmt(
        &self,
        start: impl Into<TimeSpec>,
        end: impl Into<TimeSpec>,
        duration: impl Into<StepSpec>,
        step: impl Into<StepSpec>,
        fmt: Option<&TsFormat>,
    ) -> Result<Windows<'_>, SeriesError> {
        let s = self.norm.tidy_ts(&start.into(), fmt)?;
        let e = self.norm.tidy_ts(&end.into(), fmt)?;
        let dur = Normalizer::tidy_step(&duration.into())?;
        let step = Normalizer::tidy_step(&step.into())?;
        if step <= 0.0 {
            return Err(SeriesError::invalid_arg(format!(
                "step must be positive, got {step}"
            )));
        }
        Ok(Windows::new(&self.series, &self.reducer, s, e, dur, step))
    }

    /// Value-only twin of [`windows`](Self::windows).
    ///
    /// # Errors
    /// Same contract as [`windows`](Self::windows).
    pub fn window_values(
        &self,
        start: impl Into<TimeSpec>,
        end: impl Into<TimeSpec>,
        duration: impl Into<StepSpec>,
        step: impl Into<StepSpec>,
    ) -> Result<WindowValues<'_>, SeriesError> {
        self.windows_fmt(start, end, duration, step, None)
            .map(WindowValues)
    }
}
