use thiserror::Error;

/// Unified error type for the seriate workspace.
///
/// This wraps construction-input rejections, exact-pattern timestamp
/// mismatches, field-extraction failures, and value-coercion issues.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SeriesError {
    /// The record input handed to a constructor is not a sequence of records.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A raw timestamp string did not match the configured exact pattern.
    #[error("timestamp {input:?} does not match pattern {pattern:?}")]
    Format {
        /// The strptime-style pattern that was configured.
        pattern: String,
        /// The raw input that failed to match it.
        input: String,
    },

    /// A configured selector could not locate its field in a record.
    #[error("missing field: {field}")]
    MissingField {
        /// Key or index description, e.g. `"timestamp"` or `"[2]"`.
        field: String,
    },

    /// A raw value could not be coerced into canonical numeric form.
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid ad-hoc argument to a query or range generation call.
    #[error("invalid argument: {0}")]
    InvalidArg(String),
}

impl SeriesError {
    /// Helper: build an `InvalidInput` error from any displayable message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Helper: build a `Format` error for a pattern/input pair.
    pub fn format(pattern: impl Into<String>, input: impl Into<String>) -> Self {
        Self::Format {
            pattern: pattern.into(),
            input: input.into(),
        }
    }

    /// Helper: build a `MissingField` error for a key or index description.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Helper: build a `Data` error from any displayable message.
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    /// Helper: build an `InvalidArg` error from any displayable message.
    pub fn invalid_arg(msg: impl Into<String>) -> Self {
        Self::InvalidArg(msg.into())
    }
}
