use chrono::NaiveDateTime;

use crate::aggregator::Reducer;
use crate::interpolate::Curve;
use crate::normalize::epoch_to_naive;
use crate::series::SampleSeries;

/// Lazy sequence of `(timestamp, interpolated value)` pairs over a stepped
/// half-open range.
///
/// Produced by [`Interpolator::generate`](crate::Interpolator::generate).
/// Single-pass; a fresh call produces a fresh iterator.
#[derive(Debug)]
pub struct Points<'a> {
    curve: &'a Curve,
    cursor: f64,
    end: f64,
    step: f64,
}

impl<'a> Points<'a> {
    pub(crate) const fn new(curve: &'a Curve, start: f64, end: f64, step: f64) -> Self {
        Self {
            curve,
            cursor: start,
            end,
            step,
        }
    }
}

impl Iterator for Points<'_> {
    type Item = (NaiveDateTime, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.end {
            return None;
        }
        let at = self.cursor;
        self.cursor += self.step;
        Some((epoch_to_naive(at), self.curve.eval(at)))
    }
}

/// Value-only twin of [`Points`].
#[derive(Debug)]
pub struct Values<'a>(pub(crate) Points<'a>);

impl Iterator for Values<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }
}

/// Lazy sequence of `(window start, reduced value)` pairs over fixed-size,
/// fixed-step windows.
///
/// Produced by [`Aggregator::windows`](crate::Aggregator::windows). Each
/// window `[i, i + duration)` is re-scanned from the series on demand;
/// nothing is cached between windows. Overlap and gaps between consecutive
/// windows follow from the step/duration relationship and are not
/// validated.
#[derive(Debug)]
pub struct Windows<'a> {
    series: &'a SampleSeries,
    reducer: &'a Reducer,
    cursor: f64,
    end: f64,
    duration: f64,
    step: f64,
}

impl<'a> Windows<'a> {
    pub(crate) const fn new(
        series: &'a SampleSeries,
        reducer: &'a Reducer,
        start: f64,
        end: f64,
        duration: f64,
        step: f64,
    ) -> Self {
        Self {
            series,
            reducer,
            cursor: start,
            end,
            duration,
            step,
        }
    }
}

impl Iterator for Windows<'_> {
    type Item = (NaiveDateTime, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.end {
            return None;
        }
        let at = self.cursor;
        self.cursor += self.step;
        let window = self.series.range(at..at + self.duration);
        Some((epoch_to_naive(at), self.reducer.apply(window)))
    }
}

/// Value-only twin of [`Windows`].
#[derive(Debug)]
pub struct WindowValues<'a>(pub(crate) Windows<'a>);

impl Iterator for WindowValues<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }
}
