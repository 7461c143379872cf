//! Unified error codes
//!
//! This module defines all error codes used by the reorder core, the HTTP
//! client and the settings frontend. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 6xxx: Field ordering errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Permission denied
    PermissionDenied = 1101,

    // ==================== 6xxx: Field ordering ====================
    /// Object metadata not loaded
    ObjectNotFound = 6001,
    /// Field not found in the current field list
    FieldNotFound = 6002,
    /// Drag index outside the visible list
    DragIndexOutOfRange = 6003,
    /// Position value does not fit the storage column
    PositionOverflow = 6004,
    /// Position update rejected by the server
    PositionUpdateFailed = 6005,
    /// Reorder reverted after a failed update
    ReorderRolledBack = 6006,
    /// Field list changed while a reorder was being applied
    FieldListChanged = 6007,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Network error
    NetworkError = 9002,
    /// Request timed out
    TimeoutError = 9003,
    /// Response could not be decoded
    InvalidResponse = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::ValueOutOfRange => "Value out of range",

            Self::NotAuthenticated => "Authentication required",
            Self::TokenInvalid => "Invalid token",
            Self::PermissionDenied => "Permission denied",

            Self::ObjectNotFound => "Object metadata not loaded",
            Self::FieldNotFound => "Field not found",
            Self::DragIndexOutOfRange => "Drag index out of range",
            Self::PositionOverflow => "Field position overflow",
            Self::PositionUpdateFailed => "Failed to update field position",
            Self::ReorderRolledBack => "Field order was reverted",
            Self::FieldListChanged => "Field list changed, please retry",

            Self::InternalError => "Internal server error",
            Self::NetworkError => "Network error",
            Self::TimeoutError => "Request timed out",
            Self::InvalidResponse => "Invalid response",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            1 => Ok(Self::Unknown),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::AlreadyExists),
            5 => Ok(Self::InvalidRequest),
            8 => Ok(Self::ValueOutOfRange),

            1001 => Ok(Self::NotAuthenticated),
            1004 => Ok(Self::TokenInvalid),
            1101 => Ok(Self::PermissionDenied),

            6001 => Ok(Self::ObjectNotFound),
            6002 => Ok(Self::FieldNotFound),
            6003 => Ok(Self::DragIndexOutOfRange),
            6004 => Ok(Self::PositionOverflow),
            6005 => Ok(Self::PositionUpdateFailed),
            6006 => Ok(Self::ReorderRolledBack),
            6007 => Ok(Self::FieldListChanged),

            9001 => Ok(Self::InternalError),
            9002 => Ok(Self::NetworkError),
            9003 => Ok(Self::TimeoutError),
            9004 => Ok(Self::InvalidResponse),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
