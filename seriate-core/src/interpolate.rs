use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use seriate_types::SeriesError;

use crate::Sample;

/// Named interpolation kinds for the continuous curve between samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Kind {
    /// Straight segments between neighbors, extended linearly outside the
    /// sample range.
    #[default]
    Linear,
    /// Value of the closest sample; exact midpoints resolve to the earlier
    /// sample.
    Nearest,
    /// Value of the latest sample at or before the query point.
    Previous,
    /// Value of the earliest sample at or after the query point.
    Next,
}

impl Kind {
    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Nearest => "nearest",
            Self::Previous => "previous",
            Self::Next => "next",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Self::Linear),
            "nearest" => Ok(Self::Nearest),
            "previous" => Ok(Self::Previous),
            "next" => Ok(Self::Next),
            other => Err(SeriesError::invalid_arg(format!(
                "unknown interpolation kind: {other:?}"
            ))),
        }
    }
}

/// A one-dimensional interpolation function fitted over sorted samples.
///
/// Evaluation never fails: queries outside the sample range extrapolate
/// (linearly for [`Kind::Linear`], clamped to the boundary sample for the
/// step kinds), a single-sample curve is constant, and the empty curve
/// evaluates to `0.0` everywhere.
#[derive(Debug, Clone)]
pub struct Curve {
    xs: Vec<f64>,
    ys: Vec<f64>,
    kind: Kind,
}

impl Curve {
    /// Fit a curve over samples already sorted by timestamp.
    #[must_use]
    pub fn fit(samples: &[Sample], kind: Kind) -> Self {
        Self {
            xs: samples.iter().map(|s| s.ts).collect(),
            ys: samples.iter().map(|s| s.value).collect(),
            kind,
        }
    }

    /// The kind this curve was fitted with.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// Number of knots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Whether the curve has no knots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Evaluate the curve at `x`.
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();
        match n {
            0 => return 0.0,
            1 => return self.ys[0],
            _ => {}
        }
        // First knot with xs[i] >= x; 0 and n mean x is out of range.
        let i = self.xs.partition_point(|&v| v.total_cmp(&x).is_lt());
        match self.kind {
            Kind::Linear => {
                let (lo, hi) = if i == 0 {
                    (0, 1)
                } else if i == n {
                    (n - 2, n - 1)
                } else {
                    (i - 1, i)
                };
                let (x0, x1) = (self.xs[lo], self.xs[hi]);
                let (y0, y1) = (self.ys[lo], self.ys[hi]);
                if x1 == x0 {
                    // Duplicate timestamps: zero-width segment, later wins.
                    return y1;
                }
                y0 + (x - x0) / (x1 - x0) * (y1 - y0)
            }
            Kind::Nearest => {
                if i == 0 {
                    self.ys[0]
                } else if i == n {
                    self.ys[n - 1]
                } else if x - self.xs[i - 1] <= self.xs[i] - x {
                    self.ys[i - 1]
                } else {
                    self.ys[i]
                }
            }
            Kind::Previous => {
                if i == n {
                    self.ys[n - 1]
                } else if self.xs[i] == x {
                    self.ys[i]
                } else if i == 0 {
                    self.ys[0]
                } else {
                    self.ys[i - 1]
                }
            }
            Kind::Next => {
                if i == n {
                    self.ys[n - 1]
                } else {
                    self.ys[i]
                }
            }
        }
    }
}
