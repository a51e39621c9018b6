//! seriate-core
//!
//! Normalization of heterogeneous time-stamped records into an ordered
//! sample series, plus the two derived views over it:
//!
//! - `series`: the ordered sample container with key-range slicing and
//!   version-based change tracking.
//! - `normalize`: record field extraction and timestamp/value coercion.
//! - `interpolate`: the one-dimensional interpolation curve and its kinds.
//! - `interpolator`: point queries and ranged generation over a lazily
//!   rebuilt curve.
//! - `aggregator`: windowed reductions over fixed-size, fixed-step windows.
//!
//! Everything here is single-threaded and synchronous; the only laziness is
//! in the generation iterators, which compute each point on demand.
#![warn(missing_docs)]

/// Windowed reduction over the sample series.
pub mod aggregator;
/// Lazy iterators over stepped half-open timestamp ranges.
pub mod generate;
/// The interpolation curve and its named kinds.
pub mod interpolate;
/// Point queries and ranged generation over an interpolation curve.
pub mod interpolator;
/// Record normalization: field extraction and canonical coercion.
pub mod normalize;
/// The timestamp/value pair.
pub mod sample;
/// The ordered sample container.
pub mod series;

pub use aggregator::{Aggregator, Reduce, Reducer};
pub use generate::{Points, Values, WindowValues, Windows};
pub use interpolate::{Curve, Kind};
pub use interpolator::Interpolator;
pub use normalize::Normalizer;
pub use sample::Sample;
pub use series::SampleSeries;

pub use seriate_types::{
    FieldSelector, SeriesConfig, SeriesError, StepSpec, TimeSpec, TsFormat, ValueFormat,
};
