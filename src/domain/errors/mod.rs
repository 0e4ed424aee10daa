// Domain errors - Field coercion failures
//
// These never abort an inspection. They are carried inside field diagnostics
// and logged while the affected field falls back to its zero value.

use std::fmt;

/// Why a raw field value could not be decoded into its typed form
#[derive(Debug, Clone, PartialEq)]
pub enum CoercionError {
    /// Raw text is not a base-10 integer in range
    InvalidInt(String),
    /// Raw text is not a floating point number
    InvalidFloat(String),
    /// Raw text matches neither accepted timestamp layout
    InvalidTimestamp(String),
}

impl fmt::Display for CoercionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercionError::InvalidInt(msg) => write!(f, "Invalid integer: {}", msg),
            CoercionError::InvalidFloat(msg) => write!(f, "Invalid float: {}", msg),
            CoercionError::InvalidTimestamp(msg) => write!(f, "Invalid timestamp: {}", msg),
        }
    }
}

impl std::error::Error for CoercionError {}
