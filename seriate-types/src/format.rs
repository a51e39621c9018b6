use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::SeriesError;

/// Shared closure type for custom numeric formatting.
type FormatFn = dyn Fn(&Value) -> Result<f64, SeriesError> + Send + Sync;

/// How to turn a raw extracted timestamp into canonical epoch seconds.
///
/// Parsing behavior lives in `seriate-core`; this type only describes which
/// strategy applies. `Auto` accepts numbers verbatim and runs strings
/// through a lenient parser covering the common calendar formats.
#[derive(Clone, Default)]
pub enum TsFormat {
    /// Lenient parse of human-readable date/time strings; numbers pass
    /// through as epoch seconds.
    #[default]
    Auto,
    /// strptime-style exact pattern; a non-matching raw string fails with
    /// [`SeriesError::Format`].
    Pattern(String),
    /// Custom formatter closure, used as-is. Must return epoch seconds.
    With(Arc<FormatFn>),
}

impl TsFormat {
    /// Exact-pattern formatter.
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::Pattern(pattern.into())
    }

    /// Formatter backed by a custom closure, used as-is.
    pub fn with<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<f64, SeriesError> + Send + Sync + 'static,
    {
        Self::With(Arc::new(f))
    }
}

impl fmt::Debug for TsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("Auto"),
            Self::Pattern(p) => f.debug_tuple("Pattern").field(p).finish(),
            Self::With(_) => f.write_str("With(..)"),
        }
    }
}

impl From<&str> for TsFormat {
    fn from(pattern: &str) -> Self {
        Self::Pattern(pattern.to_string())
    }
}

impl From<String> for TsFormat {
    fn from(pattern: String) -> Self {
        Self::Pattern(pattern)
    }
}

/// How to turn a raw extracted value into a canonical `f64`.
#[derive(Clone, Default)]
pub enum ValueFormat {
    /// Numeric coercion: numbers pass through, numeric strings parse.
    #[default]
    Auto,
    /// Custom formatter closure; whatever it returns is used verbatim.
    With(Arc<FormatFn>),
}

impl ValueFormat {
    /// Formatter backed by a custom closure, used as-is.
    pub fn with<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<f64, SeriesError> + Send + Sync + 'static,
    {
        Self::With(Arc::new(f))
    }
}

impl fmt::Debug for ValueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("Auto"),
            Self::With(_) => f.write_str("With(..)"),
        }
    }
}
