use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A single normalized observation: epoch seconds paired with a value.
///
/// Samples are immutable once constructed. Ordering within a series is by
/// timestamp only; values play no part in it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Seconds since the Unix epoch.
    pub ts: f64,
    /// The observed value.
    pub value: f64,
}

impl Sample {
    /// Create a sample from epoch seconds and a value.
    #[must_use]
    pub const fn new(ts: f64, value: f64) -> Self {
        Self { ts, value }
    }

    /// Total order on timestamps, treating NaN as greater than any number.
    #[must_use]
    pub fn cmp_ts(&self, other: &Self) -> Ordering {
        self.ts.total_cmp(&other.ts)
    }
}

impl From<(f64, f64)> for Sample {
    fn from((ts, value): (f64, f64)) -> Self {
        Self { ts, value }
    }
}
