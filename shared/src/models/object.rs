//! Object Metadata Model

use super::field::FieldItem;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parent object identifier, the key of a field list
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Object metadata entity with its fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    pub id: ObjectId,
    pub name_singular: String,
    pub label_singular: String,
    /// Custom objects use a different settings table layout
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default)]
    pub fields: Vec<FieldItem>,
}

/// View metadata attached to an object (refreshed after field changes)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSummary {
    pub id: String,
    pub name: String,
    pub object_id: ObjectId,
}
