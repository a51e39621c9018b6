//! seriate turns heterogeneous time-stamped records into an ordered series
//! and derives two views over it.
//!
//! Overview
//! - Normalizes arbitrary record shapes (objects, positional arrays, or
//!   anything a custom closure can read) into `(epoch seconds, value)`
//!   samples, eagerly and all-or-nothing.
//! - `Interpolator`: a continuous function over the samples with selectable
//!   kind (linear, nearest, previous, next) and extrapolation outside the
//!   sample range.
//! - `Aggregator`: windowed reductions (built-in or custom) over
//!   fixed-size, fixed-step windows, recomputed from the sorted series on
//!   every call.
//!
//! Key behaviors and trade-offs
//! - Field selection is resolved once at configuration time into a closed
//!   selector set (key, index, closure); records never get type-sniffed at
//!   query time.
//! - Timestamp parsing: lenient by default over the common calendar
//!   formats, exact via strptime-style patterns, or fully custom. All
//!   timestamps reduce to naive epoch seconds; there are no timezone-aware
//!   semantics.
//! - The interpolation curve is derived state: rebuilt lazily after series
//!   mutation or a kind change, never eagerly on mutation.
//! - Generation is lazy and half-open: points are computed as the iterator
//!   is consumed, and `end` is excluded.
//!
//! Examples
//!
//! Interpolating between samples:
//! ```
//! use seriate::{InterpolatorBuilder, Kind};
//! use serde_json::json;
//!
//! let mut ip = InterpolatorBuilder::new()
//!     .records_value(json!([
//!         {"timestamp": "2018-12-31 18:30:00", "value": 89},
//!         {"timestamp": "2018-12-31 18:31:00", "value": 80},
//!         {"timestamp": "2018-12-31 18:32:00", "value": 85},
//!     ]))
//!     .build()?;
//! assert_eq!(ip.query("2018-12-31 18:30:30")?, 84.5);
//!
//! let minute: Vec<f64> = ip
//!     .generate_values("2018-12-31 18:30:00", "2018-12-31 18:31:00", "15 sec")?
//!     .collect();
//! assert_eq!(minute.len(), 4);
//! # Ok::<(), seriate::SeriesError>(())
//! ```
//!
//! Summing over minute windows:
//! ```
//! use seriate::{AggregatorBuilder, Reduce};
//! use serde_json::json;
//!
//! let agg = AggregatorBuilder::new()
//!     .records_value(json!([
//!         {"timestamp": 0, "value": 89},
//!         {"timestamp": 30, "value": 82},
//!         {"timestamp": 60, "value": 80},
//!     ]))
//!     .reduce(Reduce::Sum)
//!     .build()?;
//! let sums: Vec<f64> = agg.window_values(0, 120, 60, 60)?.collect();
//! assert_eq!(sums, vec![171.0, 80.0]);
//! # Ok::<(), seriate::SeriesError>(())
//! ```
#![warn(missing_docs)]

mod builder;

pub use builder::{AggregatorBuilder, InterpolatorBuilder};

pub use seriate_core::{
    Aggregator, Curve, Interpolator, Kind, Normalizer, Points, Reduce, Reducer, Sample,
    SampleSeries, Values, WindowValues, Windows,
};
pub use seriate_types::{
    FieldSelector, SeriesConfig, SeriesError, StepSpec, TimeSpec, TsFormat, ValueFormat,
};
