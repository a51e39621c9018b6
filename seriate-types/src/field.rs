use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::SeriesError;

/// Shared closure type for custom field extraction.
type ExtractFn = dyn Fn(&Value) -> Result<Value, SeriesError> + Send + Sync;

/// How to pull one raw field (timestamp or value) out of a record.
///
/// The variant is resolved once at configuration time; extraction itself
/// never sniffs record shapes at runtime. Records are `serde_json::Value`:
/// objects model mappings, arrays model positional tuples, and anything
/// else is reachable through the `With` closure variant.
#[derive(Clone)]
pub enum FieldSelector {
    /// Look the field up by key in an object record.
    Key(String),
    /// Look the field up by position in an array record.
    Index(usize),
    /// Apply an arbitrary extraction function to the record.
    With(Arc<ExtractFn>),
}

impl FieldSelector {
    /// Selector for an object key.
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    /// Selector for an array position.
    #[must_use]
    pub const fn index(idx: usize) -> Self {
        Self::Index(idx)
    }

    /// Selector backed by a custom extraction closure, used as-is.
    pub fn with<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, SeriesError> + Send + Sync + 'static,
    {
        Self::With(Arc::new(f))
    }

    /// Extract the raw field from `record`.
    ///
    /// # Errors
    /// Returns `SeriesError::MissingField` when a `Key` selector is applied
    /// to a non-object record or the key is absent, and when an `Index`
    /// selector is applied to a non-array record or the index is out of
    /// bounds. Errors from `With` closures propagate unmodified.
    pub fn extract(&self, record: &Value) -> Result<Value, SeriesError> {
        match self {
            Self::Key(k) => record
                .get(k.as_str())
                .cloned()
                .ok_or_else(|| SeriesError::missing_field(k.clone())),
            Self::Index(i) => record
                .get(*i)
                .cloned()
                .ok_or_else(|| SeriesError::missing_field(format!("[{i}]"))),
            Self::With(f) => f(record),
        }
    }
}

impl fmt::Debug for FieldSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => f.debug_tuple("Key").field(k).finish(),
            Self::Index(i) => f.debug_tuple("Index").field(i).finish(),
            Self::With(_) => f.write_str("With(..)"),
        }
    }
}

impl From<&str> for FieldSelector {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for FieldSelector {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for FieldSelector {
    fn from(idx: usize) -> Self {
        Self::Index(idx)
    }
}
