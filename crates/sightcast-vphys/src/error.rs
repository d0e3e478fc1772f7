//! Error types for collision asset decoding.

use thiserror::Error;

/// Errors that can occur while decoding collision geometry assets.
#[derive(Error, Debug)]
pub enum VphysError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed text at a specific line.
    #[error("syntax error at line {line}: {message}")]
    Syntax {
        /// Line number (1-indexed).
        line: usize,
        /// Error message.
        message: String,
    },

    /// A field the extraction depends on is absent.
    #[error("missing field: {0}")]
    MissingField(String),

    /// A field holds a different kind of value than expected.
    #[error("field {field} is not {expected}")]
    TypeMismatch {
        /// Path of the offending field.
        field: String,
        /// Expected value kind.
        expected: &'static str,
    },

    /// Decoded geometry is inconsistent (bad index, unclosed face loop).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

impl VphysError {
    /// Create a syntax error.
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(field: impl Into<String>, expected: &'static str) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
        }
    }
}

/// Result type for asset decoding.
pub type Result<T> = std::result::Result<T, VphysError>;
