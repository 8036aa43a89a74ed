//! Error handling for the EMG toolkit
//!
//! Every failure in the pipeline is a deterministic data or configuration
//! error, so a single flat enum covers loading, numerics and rendering.

use core::fmt;

/// Result type alias for EMG toolkit operations
pub type EmgResult<T> = Result<T, EmgError>;

/// Error type for all EMG toolkit operations
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EmgError {
    /// Malformed record in a signal log
    ParseError {
        /// Log the record came from (file path or other label)
        source: String,
        /// 1-based line number
        line: usize,
        /// What was wrong with the record
        reason: String,
    },

    /// Not enough samples for the requested operation
    InsufficientData {
        /// Operation that was attempted
        operation: &'static str,
        /// Minimum number of samples needed
        required: usize,
        /// Number of samples available
        available: usize,
    },

    /// Out-of-range parameter or configuration value
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Description of the violation
        reason: String,
    },

    /// Division by a zero reference value
    DivisionError {
        /// Description of the division
        reason: &'static str,
    },

    /// File system failure while reading a log or writing output
    IoError {
        /// Path involved
        path: String,
        /// Underlying error message
        reason: String,
    },
}

impl EmgError {
    /// Build an `IoError` from a path and a `std::io::Error`
    pub fn io(path: impl AsRef<std::path::Path>, err: &std::io::Error) -> Self {
        EmgError::IoError {
            path: path.as_ref().display().to_string(),
            reason: err.to_string(),
        }
    }
}

impl fmt::Display for EmgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmgError::ParseError { source, line, reason } => {
                write!(f, "Parse error in {} at line {}: {}", source, line, reason)
            }
            EmgError::InsufficientData {
                operation,
                required,
                available,
            } => {
                write!(
                    f,
                    "Insufficient data for {}: need at least {} samples, got {}",
                    operation, required, available
                )
            }
            EmgError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter {}: {}", name, reason)
            }
            EmgError::DivisionError { reason } => {
                write!(f, "Division error: {}", reason)
            }
            EmgError::IoError { path, reason } => {
                write!(f, "I/O error on {}: {}", path, reason)
            }
        }
    }
}

impl std::error::Error for EmgError {}

/// Convenience macro for creating parameter errors
#[macro_export]
macro_rules! parameter_error {
    ($name:literal, $($arg:tt)+) => {
        $crate::error::EmgError::InvalidParameter {
            name: $name,
            reason: format!($($arg)+),
        }
    };
}
