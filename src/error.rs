//! Error handling for the router.
//!
//! Only two things can fail:
//!
//! - compiling a pattern whose regex text is invalid
//!   ([`RouterError::InvalidPattern`]), reported at registration time;
//! - a handler returning an error while its chain runs
//!   ([`RouterError::Handler`]), reported to whoever triggered the dispatch.
//!
//! A path that matches no route is **not** an error: nothing is dispatched
//! and the caller is not notified.
//!
//! # Examples
//!
//! ```
//! use waypoint_router::{RouterError, compile};
//!
//! let err = compile("/users/(unclosed", false, false).unwrap_err();
//! assert!(err.is_invalid_pattern());
//!
//! let err = RouterError::handler("session expired");
//! assert_eq!(err.to_string(), "Handler failed: session expired");
//! ```

use std::fmt;

/// Errors produced while compiling routes or running handler chains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// The pattern could not be turned into a matcher.
    InvalidPattern {
        /// The pattern as written by the caller.
        pattern: String,
        /// Why the generated matcher was rejected.
        message: String,
    },

    /// A handler aborted its chain.
    Handler { message: String },
}

impl RouterError {
    /// Create a handler error with a human-readable message.
    pub fn handler(message: impl fmt::Display) -> Self {
        Self::Handler {
            message: message.to_string(),
        }
    }

    pub(crate) fn invalid_pattern(pattern: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.to_string(),
        }
    }

    /// Check if this error came from pattern compilation.
    pub fn is_invalid_pattern(&self) -> bool {
        matches!(self, Self::InvalidPattern { .. })
    }

    /// Check if this error was raised by a handler.
    pub fn is_handler(&self) -> bool {
        matches!(self, Self::Handler { .. })
    }
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::InvalidPattern { pattern, message } => {
                write!(f, "Invalid route pattern '{}': {}", pattern, message)
            }
            RouterError::Handler { message } => write!(f, "Handler failed: {}", message),
        }
    }
}

impl std::error::Error for RouterError {}

/// Result alias used throughout the crate.
pub type Result<T, E = RouterError> = std::result::Result<T, E>;

/// What every handler returns.
pub type HandlerResult = Result<()>;
