//! Error types for level loading and tuning
//!
//! Only setup can fail. Once a level is running, numerical degeneracy is
//! absorbed locally and gameplay outcomes are reported as events, so nothing
//! in `sim::tick` returns an error.

use std::fmt;

/// Top-level error enum for the simulation crate
#[derive(Debug)]
pub enum SimError {
    /// Level data is unusable (missing anchors, non-finite coordinates, ...)
    InvalidLevel {
        /// Level name if it had one
        level: Option<String>,
        /// What was wrong
        reason: String,
    },

    /// A tuning value is outside the range the solver can handle
    UnsafeTuning {
        /// Field name in the tuning file
        name: &'static str,
        /// The rejected value
        value: f32,
        /// Human-readable description of the safe range
        safe_range: &'static str,
    },

    /// A built-in level index that does not exist (1-based)
    UnknownLevel(usize),

    /// JSON could not be parsed
    Parse(serde_json::Error),

    /// File could not be read or written
    Io(std::io::Error),
}

impl SimError {
    pub(crate) fn invalid_level(level: Option<&str>, reason: impl Into<String>) -> Self {
        SimError::InvalidLevel {
            level: level.map(str::to_owned),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidLevel { level, reason } => match level {
                Some(name) => write!(f, "invalid level '{}': {}", name, reason),
                None => write!(f, "invalid level: {}", reason),
            },
            SimError::UnsafeTuning {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "tuning value '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            SimError::UnknownLevel(n) => write!(f, "no built-in level number {}", n),
            SimError::Parse(e) => write!(f, "failed to parse JSON: {}", e),
            SimError::Io(e) => write!(f, "i/o error: {}", e),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Parse(e) => Some(e),
            SimError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Parse(e)
    }
}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        SimError::Io(e)
    }
}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;
