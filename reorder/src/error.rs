//! Reorder error types

use shared::error::{AppError, ErrorCode};
use shared::models::{FieldId, ObjectId};
use thiserror::Error;

/// Errors that abort a reorder before any state is touched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    /// No field list has been seeded for the object
    #[error("Object {0} has no field list")]
    UnknownObject(ObjectId),

    /// A drag index does not address an element of the list
    #[error("Index {index} out of range for list of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A visible id is missing from the non-system fields (stale snapshot)
    #[error("Field {0} not found among reorderable fields")]
    IdentifierNotFound(FieldId),

    /// The assigned position does not fit an i32 column
    #[error("Position for index {index} overflows")]
    PositionOverflow { index: usize },

    /// Sparse stride below the minimum
    #[error("Sparse position stride {0} is below the minimum of {min}", min = crate::position::MIN_SPARSE_STRIDE)]
    InvalidStride(u32),

    /// The field list changed between snapshot and optimistic write
    #[error("Field list of {0} changed during reorder")]
    ConcurrentModification(ObjectId),
}

/// Result type for reorder operations
pub type ReorderResult<T> = Result<T, ReorderError>;

/// Failure reported by a persistence or refresh collaborator
#[derive(Debug, Clone, Error)]
pub enum PersistError {
    /// The backend answered with an error
    #[error(transparent)]
    Rejected(#[from] AppError),

    /// The backend could not be reached
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

impl PersistError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Rejected(err) => err.code,
            Self::Unavailable(_) => ErrorCode::NetworkError,
        }
    }
}

impl From<PersistError> for AppError {
    fn from(err: PersistError) -> Self {
        match err {
            PersistError::Rejected(err) => err,
            PersistError::Unavailable(msg) => AppError::with_message(ErrorCode::NetworkError, msg),
        }
    }
}

impl ReorderError {
    /// Get the error code for this error
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnknownObject(_) => ErrorCode::ObjectNotFound,
            Self::IndexOutOfRange { .. } => ErrorCode::DragIndexOutOfRange,
            Self::IdentifierNotFound(_) => ErrorCode::FieldNotFound,
            Self::PositionOverflow { .. } => ErrorCode::PositionOverflow,
            Self::InvalidStride(_) => ErrorCode::ValueOutOfRange,
            Self::ConcurrentModification(_) => ErrorCode::FieldListChanged,
        }
    }
}

impl From<ReorderError> for AppError {
    fn from(err: ReorderError) -> Self {
        let code = err.error_code();
        let message = err.to_string();
        match err {
            ReorderError::UnknownObject(id) | ReorderError::ConcurrentModification(id) => {
                AppError::with_message(code, message).with_detail("object_id", id.as_str())
            }
            ReorderError::IdentifierNotFound(id) => {
                AppError::with_message(code, message).with_detail("field_id", id.as_str())
            }
            ReorderError::IndexOutOfRange { index, len } => AppError::with_message(code, message)
                .with_detail("index", index)
                .with_detail("len", len),
            ReorderError::PositionOverflow { index } => {
                AppError::with_message(code, message).with_detail("index", index)
            }
            ReorderError::InvalidStride(stride) => {
                AppError::with_message(code, message).with_detail("stride", stride)
            }
        }
    }
}
