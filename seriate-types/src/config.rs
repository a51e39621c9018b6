//! Configuration bundle shared by every series flavor.

use crate::{FieldSelector, TsFormat, ValueFormat};

/// Per-series normalization configuration, fixed at construction.
///
/// Describes how to pull a timestamp and a value out of each record and how
/// to reduce both to canonical numeric form. Defaults read the conventional
/// `"timestamp"` and `"value"` keys of object records with lenient
/// timestamp parsing and plain numeric coercion.
#[derive(Debug, Clone)]
pub struct SeriesConfig {
    /// Where the raw timestamp lives in each record.
    pub ts_attr: FieldSelector,
    /// How raw timestamps become epoch seconds.
    pub ts_format: TsFormat,
    /// Where the raw value lives in each record.
    pub value_attr: FieldSelector,
    /// How raw values become canonical floats.
    pub value_format: ValueFormat,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            ts_attr: FieldSelector::key("timestamp"),
            ts_format: TsFormat::Auto,
            value_attr: FieldSelector::key("value"),
            value_format: ValueFormat::Auto,
        }
    }
}

impl SeriesConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the timestamp selector.
    #[must_use]
    pub fn ts_attr(mut self, sel: impl Into<FieldSelector>) -> Self {
        self.ts_attr = sel.into();
        self
    }

    /// Replace the timestamp format.
    #[must_use]
    pub fn ts_format(mut self, fmt: impl Into<TsFormat>) -> Self {
        self.ts_format = fmt.into();
        self
    }

    /// Replace the value selector.
    #[must_use]
    pub fn value_attr(mut self, sel: impl Into<FieldSelector>) -> Self {
        self.value_attr = sel.into();
        self
    }

    /// Replace the value format.
    #[must_use]
    pub fn value_format(mut self, fmt: ValueFormat) -> Self {
        self.value_format = fmt;
        self
    }
}
