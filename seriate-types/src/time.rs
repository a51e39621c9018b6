use std::time::Duration;

use chrono::NaiveDateTime;

/// An ad-hoc timestamp input to a point query or range generation call.
///
/// Already-canonical inputs pass through unchanged; text runs through the
/// configured (or per-call override) timestamp format.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeSpec {
    /// Canonical epoch seconds, used verbatim.
    Epoch(f64),
    /// A calendar timestamp; decomposed to integral epoch seconds
    /// (sub-second precision is dropped).
    DateTime(NaiveDateTime),
    /// A raw timestamp string, run through the timestamp formatter.
    Text(String),
}

impl From<f64> for TimeSpec {
    fn from(ts: f64) -> Self {
        Self::Epoch(ts)
    }
}

impl From<i64> for TimeSpec {
    fn from(ts: i64) -> Self {
        Self::Epoch(ts as f64)
    }
}

impl From<NaiveDateTime> for TimeSpec {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl From<&str> for TimeSpec {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for TimeSpec {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// An ad-hoc step or window-duration input to a range generation call.
#[derive(Debug, Clone, PartialEq)]
pub enum StepSpec {
    /// A span in seconds, used verbatim.
    Seconds(f64),
    /// A duration; its total seconds are used.
    Duration(Duration),
    /// A human-readable duration string, e.g. `"2 minutes"`.
    Text(String),
}

impl From<f64> for StepSpec {
    fn from(secs: f64) -> Self {
        Self::Seconds(secs)
    }
}

impl From<i64> for StepSpec {
    fn from(secs: i64) -> Self {
        Self::Seconds(secs as f64)
    }
}

impl From<Duration> for StepSpec {
    fn from(d: Duration) -> Self {
        Self::Duration(d)
    }
}

impl From<&str> for StepSpec {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for StepSpec {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}
