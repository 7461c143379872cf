//! Field Metadata Model

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Opaque field identifier, stable across reorders
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for FieldId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Field metadata entity
///
/// One reorderable row of the object settings page. Only `is_system`,
/// `is_active` and `position` drive ordering; the rest is payload carried
/// through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldItem {
    pub id: FieldId,
    pub name: String,
    pub label: String,
    /// Display name of the field type (e.g. "Text", "Relation")
    #[serde(default)]
    pub data_type: String,
    /// System fields are never listed or reordered, but stay in the collection
    #[serde(default)]
    pub is_system: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_custom: bool,
    /// Ascending sort key among non-system fields, `None` sorts last
    #[serde(default)]
    pub position: Option<i32>,
    pub description: Option<String>,
    pub icon: Option<String>,
    /// Type-specific settings (number format, relation type, ...)
    #[serde(default)]
    pub settings: Option<serde_json::Value>,
}

fn default_true() -> bool {
    true
}

impl FieldItem {
    /// Create an active, non-system field with no position
    pub fn new(id: impl Into<FieldId>, label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            id: id.into(),
            name: label.to_lowercase().replace(' ', "_"),
            label,
            data_type: String::new(),
            is_system: false,
            is_active: true,
            is_custom: false,
            position: None,
            description: None,
            icon: None,
            settings: None,
        }
    }

    pub fn with_position(mut self, position: i32) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = data_type.into();
        self
    }

    pub fn system(mut self) -> Self {
        self.is_system = true;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Compare two positions ascending with `None` last
pub fn cmp_position_nulls_last(a: Option<i32>, b: Option<i32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Update field payload
///
/// Every attribute is optional; only the provided ones are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

impl FieldUpdate {
    /// Payload that only moves the field
    pub fn position(position: i32) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }
}
