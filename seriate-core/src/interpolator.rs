use serde_json::Value;

use seriate_types::{SeriesConfig, SeriesError, StepSpec, TimeSpec, TsFormat};

use crate::generate::{Points, Values};
use crate::interpolate::{Curve, Kind};
use crate::normalize::Normalizer;
use crate::sample::Sample;
use crate::series::SampleSeries;

/// Cache state of the fitted curve.
///
/// `Fresh` remembers the series version the curve was built from; any later
/// mutation makes the comparison fail and forces a rebuild on next use.
#[derive(Debug)]
enum DerivedState {
    Stale,
    Fresh { version: u64, curve: Curve },
}

/// Continuous view over a normalized sample series.
///
/// Construction normalizes every record eagerly and fits the curve
/// immediately. The curve is refitted lazily after the series mutates or
/// the kind changes. Queries take `&mut self` for exactly that reason,
/// which also rules out mutating the series while a generated sequence is
/// being consumed.
///
/// ```
/// use seriate_core::{Interpolator, Kind, SeriesConfig};
/// use serde_json::json;
///
/// let records = vec![
///     json!({"timestamp": "2018-12-31 18:30:00", "value": 89}),
///     json!({"timestamp": "2018-12-31 18:31:00", "value": 80}),
///     json!({"timestamp": "2018-12-31 18:32:00", "value": 85}),
/// ];
/// let mut ip = Interpolator::from_records(&records, SeriesConfig::default(), Kind::Linear)?;
/// assert_eq!(ip.query("2018-12-31 18:30:30")?, 84.5);
/// # Ok::<(), seriate_core::SeriesError>(())
/// ```
#[derive(Debug)]
pub struct Interpolator {
    series: SampleSeries,
    norm: Normalizer,
    kind: Kind,
    state: DerivedState,
}

impl Interpolator {
    /// Normalize `records` into a series and fit the initial curve.
    ///
    /// # Errors
    /// Fails on the first record that cannot be normalized; no partial
    /// series is constructed.
    pub fn from_records(
        records: &[Value],
        cfg: SeriesConfig,
        kind: Kind,
    ) -> Result<Self, SeriesError> {
        let norm = Normalizer::new(cfg);
        let series = SampleSeries::from_samples(norm.normalize_all(records)?);
        let mut ip = Self {
            series,
            norm,
            kind,
            state: DerivedState::Stale,
        };
        ip.ensure_fresh();
        Ok(ip)
    }

    /// Wrap samples that are already normalized.
    #[must_use]
    pub fn from_samples(samples: Vec<Sample>, kind: Kind) -> Self {
        let mut ip = Self {
            series: SampleSeries::from_samples(samples),
            norm: Normalizer::new(SeriesConfig::default()),
            kind,
            state: DerivedState::Stale,
        };
        ip.ensure_fresh();
        ip
    }

    /// Current interpolation kind.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// Switch the interpolation kind.
    ///
    /// A no-op when unchanged; otherwise the curve is marked stale and
    /// refitted on next use.
    pub fn set_kind(&mut self, kind: Kind) {
        if self.kind != kind {
            self.kind = kind;
            self.state = DerivedState::Stale;
        }
    }

    /// The underlying ordered series.
    #[must_use]
    pub const fn series(&self) -> &SampleSeries {
        &self.series
    }

    /// Mutable access to the underlying series.
    ///
    /// Mutations bump the series version; the curve notices on next use.
    pub const fn series_mut(&mut self) -> &mut SampleSeries {
        &mut self.series
    }

    /// Evaluate the curve at an ad-hoc timestamp.
    ///
    /// An empty series evaluates to `0.0` for any input. Out-of-range
    /// queries extrapolate and never fail.
    ///
    /// # Errors
    /// Normalization of `ts` can fail; evaluation itself cannot.
    pub fn query(&mut self, ts: impl Into<TimeSpec>) -> Result<f64, SeriesError> {
        self.query_fmt(ts, None)
    }

    /// [`query`](Self::query) with a per-call timestamp-format override.
    ///
    /// # Errors
    /// Normalization of `ts` can fail; evaluation itself cannot.
    pub fn query_fmt(
        &mut self,
        ts: impl Into<TimeSpec>,
        fmt: Option<&TsFormat>,
    ) -> Result<f64, SeriesError> {
        let at = self.norm.tidy_ts(&ts.into(), fmt)?;
        Ok(self.ensure_fresh().eval(at))
    }

    /// Lazy sequence of `(timestamp, value)` pairs from `start` to `end`
    /// (exclusive) with interval `step`.
    ///
    /// # Errors
    /// Fails when any bound or the step cannot be normalized, or when the
    /// step is not positive.
    pub fn generate(
        &mut self,
        start: impl Into<TimeSpec>,
        end: impl Into<TimeSpec>,
        step: impl Into<StepSpec>,
    ) -> Result<Points<'_>, SeriesError> {
        self.generate_fmt(start, end, step, None)
    }

    /// [`generate`](Self::generate) with a per-call timestamp-format
    /// override for the bounds.
    ///
    /// # Errors
    /// Same contract as [`generate`](Self::generate).
    pub fn generate_fmt(
        &mut self,
        start: impl Into<TimeSpec>,
        end: impl Into<TimeSpec>,
        step: impl Into<StepSpec>,
        fmt: Option<&TsFormat>,
    ) -> Result<Points<'_>, SeriesError> {
        let (start, end, step) = self.range_params(&start.into(), &end.into(), &step.into(), fmt)?;
        Ok(Points::new(self.ensure_fresh(), start, end, step))
    }

    /// Value-only twin of [`generate`](Self::generate).
    ///
    /// # Errors
    /// Same contract as [`generate`](Self::generate).
    pub fn generate_values(
        &mut self,
        start: impl Into<TimeSpec>,
        end: impl Into<TimeSpec>,
        step: impl Into<StepSpec>,
    ) -> Result<Values<'_>, SeriesError> {
        self.generate_fmt(start, end, step, None).map(Values)
    }

    fn range_params(
        &self,
        start: &TimeSpec,
        end: &TimeSpec,
        step: &StepSpec,
        fmt: Option<&TsFormat>,
    ) -> Result<(f64, f64, f64), SeriesError> {
        let s = self.norm.tidy_ts(start, fmt)?;
        let e = self.norm.tidy_ts(end, fmt)?;
        let d = Normalizer::tidy_step(step)?;
        if d <= 0.0 {
            return Err(SeriesError::invalid_arg(format!(
                "step must be positive, got {d}"
            )));
        }
        Ok((s, e, d))
    }

    /// Refit the curve if the series version moved or the kind changed.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "seriate::interpolator::ensure_fresh",
            skip(self),
            fields(samples = self.series.len(), kind = %self.kind),
        )
    )]
    fn ensure_fresh(&mut self) -> &Curve {
        let version = self.series.version();
        let fresh = matches!(
            &self.state,
            DerivedState::Fresh { version: v, .. } if *v == version
        );
        if !fresh {
            self.state = DerivedState::Fresh {
                version,
                curve: Curve::fit(self.series.as_slice(), self.kind),
            };
        }
        match &self.state {
            DerivedState::Fresh { curve, .. } => curve,
            DerivedState::Stale => unreachable!("state refreshed above"),
        }
    }
}
