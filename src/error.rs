//! Error types for word encoding and calldata building

use std::fmt;

use thiserror::Error;

use crate::frame::CallKind;

/// Low-level encoder failures.
///
/// Raised when a value cannot be represented as an ABI word or when a frame
/// does not match its declared layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("Negative value cannot be encoded as uint256: {0}")]
    Negative(String),

    #[error("Value exceeds 2^256-1: {0}")]
    Overflow(String),

    #[error("Invalid numeric value: {0:?}")]
    InvalidNumber(String),

    #[error("Invalid address length: expected 40 hex chars, got {0}")]
    InvalidAddressLength(usize),

    #[error("Invalid address hex: {0:?}")]
    InvalidAddressHex(String),

    #[error("Address checksum mismatch: {0}")]
    InvalidChecksum(String),

    #[error("Malformed dynamic field: {0}")]
    MalformedField(String),

    #[error("Invalid bech32 address: {0}")]
    InvalidBech32(String),

    #[error("Layout mismatch for {kind}: {reason}")]
    LayoutMismatch { kind: CallKind, reason: String },

    #[error("Malformed calldata: {0}")]
    Decode(String),
}

/// A single violated input constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Parameter name as the caller knows it
    pub field: &'static str,
    pub reason: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Every violated input constraint found while checking one builder call.
///
/// Builders collect all violations before returning, so a caller can fix
/// every field in a single round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} invalid parameter(s): {}", .violations.len(), join_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one violated constraint
    pub fn push(&mut self, field: &'static str, reason: impl Into<String>) {
        self.violations.push(FieldViolation {
            field,
            reason: reason.into(),
        });
    }

    /// True when no constraint was violated
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Names of the failing fields, in the order they were checked
    pub fn fields(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.field).collect()
    }

    /// Check whether a given field was reported
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// `Ok(())` when nothing was reported, otherwise `Err(self)`
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(FieldViolation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Error returned by the calldata builders
#[derive(Debug, Error)]
pub enum CalldataError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("Failed to serialize proposal messages: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CalldataError {
    /// The validation report, if this is a validation failure
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            CalldataError::Validation(e) => Some(e),
            _ => None,
        }
    }
}
