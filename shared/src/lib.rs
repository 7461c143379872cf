//! Shared types for the field reorder workspace
//!
//! Common types used across crates: field metadata models, request
//! payloads, the unified error system and search text helpers.

pub mod error;
pub mod models;
pub mod request;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{FieldId, FieldItem, FieldUpdate, ObjectId, ObjectMetadata};
pub use request::{BatchUpdateResponse, PositionUpdate};
