//! Error types for GPU-AV command instrumentation
//!
//! Capture, restore and address resolution never fail. These errors only
//! come out of command-buffer tracking and lock acquisition.

use std::fmt;

/// Result type for instrumentation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Instrumentation errors
#[derive(Debug, Clone)]
pub enum Error {
    /// A recorded binding does not fit the layout it was recorded against
    InvalidBinding(String),

    /// The tracked command-buffer state lock was poisoned by a panicking thread
    LockPoisoned(String),

    /// The pipeline bind point has no slot in the binding table
    UnsupportedBindPoint(String),

    /// Backend-specific error (driver dispatch, extension loading)
    BackendError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidBinding(msg) => write!(f, "Invalid binding: {}", msg),
            Error::LockPoisoned(msg) => write!(f, "Lock poisoned: {}", msg),
            Error::UnsupportedBindPoint(msg) => write!(f, "Unsupported bind point: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
