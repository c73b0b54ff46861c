//! # Error Types
//!
//! Structured error types for cost_core. Every failure the engine can hit is
//! encoded here, so callers never see a panic or a silently zero-filled result.
//!
//! The cost calculator itself only ever reports "cannot calculate"; the
//! variant says *why* so the caller can log it. Use
//! [`CalcError::is_cannot_calculate`] when only the yes/no matters.
//!
//! ## Example
//!
//! ```rust
//! use cost_core::errors::{CalcError, CalcResult};
//!
//! fn validate_weight(weight_g: f64) -> CalcResult<()> {
//!     if weight_g < 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "piece_weight_g",
//!             weight_g.to_string(),
//!             "Weight cannot be negative",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for cost_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// The kind of catalog record a calculation input refers to by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceKind {
    Material,
    PrinterProfile,
    SalesProfile,
    ElectricityProfile,
    Accessory,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReferenceKind::Material => "material",
            ReferenceKind::PrinterProfile => "printer profile",
            ReferenceKind::SalesProfile => "sales profile",
            ReferenceKind::ElectricityProfile => "electricity profile",
            ReferenceKind::Accessory => "accessory",
        };
        f.write_str(name)
    }
}

/// Structured error type for calculation and catalog operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (negative, non-finite, out of range)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A referenced catalog record does not exist in the snapshot
    #[error("Cannot calculate: {kind} '{id}' not found")]
    ReferenceNotFound { kind: ReferenceKind, id: String },

    /// A divisor in a derived rate or price is zero, negative or undefined
    #[error("Cannot calculate: degenerate divisor '{field}' = {value} - {reason}")]
    DegenerateDivisor {
        field: String,
        value: String,
        reason: String,
    },

    /// A catalog record cannot be removed while other records still use it
    #[error("{kind} '{id}' is still referenced by {referenced_by}")]
    StillReferenced {
        kind: ReferenceKind,
        id: String,
        referenced_by: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a ReferenceNotFound error
    pub fn not_found(kind: ReferenceKind, id: impl Into<String>) -> Self {
        CalcError::ReferenceNotFound { kind, id: id.into() }
    }

    /// Create a DegenerateDivisor error
    pub fn degenerate_divisor(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::DegenerateDivisor {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// True for every failure the cost calculator reports.
    ///
    /// Callers that only need the user-facing "calculation not possible,
    /// check your inputs" message should branch on this and log the rest.
    pub fn is_cannot_calculate(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. }
                | CalcError::ReferenceNotFound { .. }
                | CalcError::DegenerateDivisor { .. }
        )
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::ReferenceNotFound { .. } => "REFERENCE_NOT_FOUND",
            CalcError::DegenerateDivisor { .. } => "DEGENERATE_DIVISOR",
            CalcError::StillReferenced { .. } => "STILL_REFERENCED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::not_found(ReferenceKind::Accessory, "acc-9");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("ReferenceNotFound"));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CalcError::not_found(ReferenceKind::Material, "m1").error_code(),
            "REFERENCE_NOT_FOUND"
        );
        assert_eq!(
            CalcError::degenerate_divisor("commission", "100", "x").error_code(),
            "DEGENERATE_DIVISOR"
        );
    }

    #[test]
    fn test_cannot_calculate_grouping() {
        assert!(CalcError::not_found(ReferenceKind::SalesProfile, "s").is_cannot_calculate());
        assert!(CalcError::degenerate_divisor("f", "0", "r").is_cannot_calculate());
        assert!(!CalcError::file_error("read", "/tmp/x", "gone").is_cannot_calculate());
    }

    #[test]
    fn test_display_names_kind() {
        let msg = CalcError::not_found(ReferenceKind::ElectricityProfile, "ep1").to_string();
        assert_eq!(msg, "Cannot calculate: electricity profile 'ep1' not found");
    }
}
