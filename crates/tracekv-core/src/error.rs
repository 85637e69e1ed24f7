//! Error types for tracekv operations
//!
//! All tracekv errors are represented by the TraceError enum, which carries
//! enough context to tell which key or operation was involved.

use std::error::Error;
use std::fmt;

/// tracekv error types with detailed context
#[derive(Debug, Clone)]
pub enum TraceError {
    /// The store cannot be reached or the backend failed
    Unavailable {
        /// Human-readable description from the underlying client
        message: String,
    },

    /// An operation was applied to a key holding the wrong kind of value
    WrongType {
        /// The key that was accessed
        key: String,
        /// The kind of value the operation expects ("scalar" or "list")
        expected: &'static str,
        /// The kind of value actually stored at the key
        actual: &'static str,
    },

    /// Increment was applied to a value that is not an integer
    NotACounter {
        /// The counter key
        key: String,
        /// The stored value, rendered as text
        raw: String,
    },

    /// Stored bytes could not be coerced to the requested type
    Decode {
        /// The key whose value failed to coerce
        key: String,
        /// The coercion target ("text", "integer", "float", ...)
        target: &'static str,
        /// Why the coercion failed
        reason: String,
    },

    /// A wrapped operation was invoked with the wrong number of arguments
    Arity {
        /// Identity of the wrapped operation
        identity: String,
        /// Number of positional arguments it takes
        expected: usize,
        /// Number of positional arguments it received
        actual: usize,
    },

    /// Configuration failed validation
    Config {
        /// Which parameter was rejected and why
        reason: String,
    },
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::Unavailable { message } => {
                write!(f, "store unavailable: {}", message)
            }

            TraceError::WrongType { key, expected, actual } => {
                write!(f, "wrong value type at {}: expected {}, found {}", key, expected, actual)
            }

            TraceError::NotACounter { key, raw } => {
                write!(f, "value at {} is not an integer counter: {:?}", key, raw)
            }

            TraceError::Decode { key, target, reason } => {
                write!(f, "cannot coerce value at {} to {}: {}", key, target, reason)
            }

            TraceError::Arity { identity, expected, actual } => {
                write!(f, "{} takes {} argument(s), got {}", identity, expected, actual)
            }

            TraceError::Config { reason } => {
                write!(f, "invalid configuration: {}", reason)
            }
        }
    }
}

impl Error for TraceError {}

/// Result type alias for tracekv operations
pub type TraceResult<T> = Result<T, TraceError>;
