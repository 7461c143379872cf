//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::ValueOutOfRange
            | Self::DragIndexOutOfRange
            | Self::PositionOverflow => StatusCode::BAD_REQUEST,

            // 401 Unauthorized
            Self::NotAuthenticated | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied => StatusCode::FORBIDDEN,

            // 404 Not Found
            Self::NotFound | Self::ObjectNotFound | Self::FieldNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists | Self::FieldListChanged => StatusCode::CONFLICT,

            // 422 Unprocessable Entity
            Self::PositionUpdateFailed | Self::ReorderRolledBack => {
                StatusCode::UNPROCESSABLE_ENTITY
            }

            // 502/504 upstream failures
            Self::NetworkError => StatusCode::BAD_GATEWAY,
            Self::TimeoutError => StatusCode::GATEWAY_TIMEOUT,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::InvalidResponse => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
