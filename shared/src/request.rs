//! Request types for the shared crate
//!
//! Payloads exchanged when field positions are written back.

use crate::models::FieldId;
use serde::{Deserialize, Serialize};

/// A single field position write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub id: FieldId,
    pub position: i32,
}

impl PositionUpdate {
    pub fn new(id: impl Into<FieldId>, position: i32) -> Self {
        Self {
            id: id.into(),
            position,
        }
    }
}

/// Response for batch update operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchUpdateResponse {
    /// Number of fields written
    pub updated: usize,
    /// Number of non-system fields in the list
    pub total: usize,
}
