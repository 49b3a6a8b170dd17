//! Error types for schema comparison.

use thiserror::Error;

/// Result type for comparison operations.
pub type Result<T> = std::result::Result<T, CompareError>;

/// Reasons a comparison could not produce a verdict.
///
/// These are distinct from [`Compatibility::NotCompatible`](crate::Compatibility),
/// which is a successful answer. An error means compatibility could not be
/// determined at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompareError {
    /// A required input was blank.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A requested type, service or method input/output type does not exist.
    #[error("Type '{name}' not found in schema '{schema}'")]
    TypeNotFound { name: String, schema: String },

    /// The parser rejected the schema or one of its imports.
    #[error("Malformed schema '{schema}': {message}")]
    MalformedSchema { schema: String, message: String },
}

impl CompareError {
    pub(crate) fn type_not_found(name: &str, schema: &str) -> Self {
        CompareError::TypeNotFound {
            name: name.to_string(),
            schema: schema.to_string(),
        }
    }

    /// Flattens an `anyhow` context chain into a `MalformedSchema` error.
    pub(crate) fn malformed(schema: &str, err: &anyhow::Error) -> Self {
        CompareError::MalformedSchema {
            schema: schema.to_string(),
            message: format!("{err:#}"),
        }
    }
}
