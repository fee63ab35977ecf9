//! Error types for observing block construction and serialization.

use std::fmt;

/// Result type for observing block operations
pub type ObservingResult<T> = Result<T, ObservingError>;

/// Raised while building a model value, before anything is serialized.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyName(&'static str),

    #[error("Duplicate parameter name: {0}")]
    DuplicateParameter(String),

    #[error("Duplicate script: {0}")]
    DuplicateScript(String),

    #[error("Duplicate constraint: {0}")]
    DuplicateConstraint(String),

    #[error("Invalid {constraint} constraint: {reason}")]
    InvalidConstraint {
        constraint: &'static str,
        reason: String,
    },

    #[error("Unsupported value at {path}: {reason}")]
    UnsupportedValue { path: String, reason: String },

    #[error("Script configuration must be a mapping, found {0}")]
    NotAMapping(String),
}

/// A document or configuration text that could not be turned back into a block.
///
/// `field` is a path into the block document (`scripts[1].configuration`,
/// `constraints[0].max`, ...) or `"."` for the document itself.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatError {
    pub field: String,
    pub script_index: Option<usize>,
    pub message: String,
}

impl FormatError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        let script_index = script_index_of(&field);
        Self {
            field,
            script_index,
            message: message.into(),
        }
    }

    /// Error about the whole document rather than one of its fields.
    pub fn document(message: impl Into<String>) -> Self {
        Self::new(".", message)
    }

    /// Re-anchor an error raised on a nested text under `field`.
    pub fn within(self, field: &str) -> Self {
        let nested = if self.field == "." {
            field.to_string()
        } else {
            format!("{}.{}", field, self.field)
        };
        Self::new(nested, self.message)
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Malformed block at `{}`", self.field)?;
        if let Some(index) = self.script_index {
            write!(f, " (script {})", index)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for FormatError {}

/// Extract `i` from a path that starts with `scripts[i]`.
fn script_index_of(field: &str) -> Option<usize> {
    let rest = field.strip_prefix("scripts[")?;
    let end = rest.find(']')?;
    rest[..end].parse().ok()
}

/// Umbrella error for the public API.
#[derive(Debug, thiserror::Error)]
pub enum ObservingError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Format(#[from] FormatError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to encode block document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
