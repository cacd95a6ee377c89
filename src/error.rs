//! Error types for termpyro.
//!
//! Hand-rolled enums with `Display`/`Error` impls; the only validated
//! precondition in the simulation itself is the fade decrement.

use std::fmt;
use std::io;

/// Top-level error for the simulation and the flows driving it.
#[derive(Debug)]
pub enum PyroError {
    /// A fade was requested with a decrement outside the open interval (0, 1).
    FadeDecrement(f64),
    /// A show script could not be parsed.
    Script(ScriptError),
    /// Terminal output failed.
    Io(io::Error),
    /// The CLI asked for a flow that does not exist.
    UnknownMode(String),
}

impl fmt::Display for PyroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PyroError::FadeDecrement(d) => {
                write!(f, "fade decrement must be between 0 and 1 exclusive, got {}", d)
            }
            PyroError::Script(e) => write!(f, "show script error: {}", e),
            PyroError::Io(e) => write!(f, "terminal output error: {}", e),
            PyroError::UnknownMode(m) => {
                write!(f, "unknown mode {:?}; expected show, learn, or quiz", m)
            }
        }
    }
}

impl std::error::Error for PyroError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PyroError::Script(e) => Some(e),
            PyroError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for PyroError {
    fn from(e: io::Error) -> Self {
        PyroError::Io(e)
    }
}

impl From<ScriptError> for PyroError {
    fn from(e: ScriptError) -> Self {
        PyroError::Script(e)
    }
}

/// Errors raised while parsing a show script.
#[derive(Debug, PartialEq)]
pub enum ScriptError {
    /// The token stream ended while another value was expected.
    UnexpectedEnd { expected: &'static str },
    /// A token could not be parsed as the expected kind of value.
    Malformed {
        expected: &'static str,
        token: String,
        index: usize,
    },
    /// A firework record asked for fewer than one particle.
    ParticleCount { value: i64, index: usize },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::UnexpectedEnd { expected } => {
                write!(f, "script ended early, expected {}", expected)
            }
            ScriptError::Malformed {
                expected,
                token,
                index,
            } => write!(
                f,
                "token #{} ({:?}) is not a valid {}",
                index, token, expected
            ),
            ScriptError::ParticleCount { value, index } => write!(
                f,
                "token #{}: a firework needs at least 1 particle, got {}",
                index, value
            ),
        }
    }
}

impl std::error::Error for ScriptError {}
