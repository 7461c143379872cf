//! Visible projection of a field list
//!
//! The settings table shows non-system fields in canonical order, narrowed
//! by a search box and an "inactive" toggle. The projection is read-only:
//! the reconciler consumes the resulting id list and never writes it back.

use crate::sequence::canonical_order;
use serde::{Deserialize, Serialize};
use shared::models::{FieldId, FieldItem, ObjectMetadata};
use shared::util::normalize_search_text;

/// Search and active/inactive filter of the field table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleFilter {
    #[serde(default)]
    pub search_text: String,
    #[serde(default = "default_true")]
    pub show_inactive: bool,
}

fn default_true() -> bool {
    true
}

impl Default for VisibleFilter {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            show_inactive: true,
        }
    }
}

impl VisibleFilter {
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_show_inactive(mut self, show_inactive: bool) -> Self {
        self.show_inactive = show_inactive;
        self
    }

    /// Whether a non-empty search is active
    pub fn is_searching(&self) -> bool {
        !normalize_search_text(&self.search_text).is_empty()
    }

    /// Whether `field` passes the filter (system flag not considered)
    pub fn matches(&self, field: &FieldItem) -> bool {
        self.matches_normalized(field, &normalize_search_text(&self.search_text))
    }

    fn matches_normalized(&self, field: &FieldItem, search: &str) -> bool {
        if !self.show_inactive && !field.is_active {
            return false;
        }
        normalize_search_text(&field.label).contains(search)
            || normalize_search_text(&field.data_type).contains(search)
    }
}

/// Non-system fields in canonical order that pass `filter`
pub fn visible_items<'a>(fields: &'a [FieldItem], filter: &VisibleFilter) -> Vec<&'a FieldItem> {
    let search = normalize_search_text(&filter.search_text);
    canonical_order(fields)
        .into_iter()
        .filter(|field| filter.matches_normalized(field, &search))
        .collect()
}

/// Ids of [`visible_items`], the list drag indices refer to
pub fn visible_ids(fields: &[FieldItem], filter: &VisibleFilter) -> Vec<FieldId> {
    visible_items(fields, filter)
        .into_iter()
        .map(|f| f.id.clone())
        .collect()
}

/// Dragging is offered only without a search and with no reorder in flight
pub fn drag_enabled(filter: &VisibleFilter, pending: bool) -> bool {
    !pending && !filter.is_searching()
}

// =============================================================================
// Table layout
// =============================================================================

/// Column of the field settings table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableColumn {
    pub label: &'static str,
    pub field_name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    AscNullsLast,
    DescNullsLast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialSort {
    pub field_name: &'static str,
    pub direction: SortDirection,
}

const STANDARD_COLUMNS: &[TableColumn] = &[
    TableColumn { label: "Name", field_name: "label" },
    TableColumn { label: "Field type", field_name: "field_type" },
    TableColumn { label: "Data type", field_name: "data_type" },
];

const CUSTOM_COLUMNS: &[TableColumn] = &[
    TableColumn { label: "Name", field_name: "label" },
    TableColumn { label: "Identifier", field_name: "identifier_type" },
    TableColumn { label: "Data type", field_name: "data_type" },
];

/// Layout of the settings table, chosen by whether the object is custom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLayout {
    Standard,
    Custom,
}

impl TableLayout {
    pub fn for_object(object: &ObjectMetadata) -> Self {
        if object.is_custom { Self::Custom } else { Self::Standard }
    }

    pub fn table_id(&self) -> &'static str {
        "settingsObjectDetail"
    }

    pub fn columns(&self) -> &'static [TableColumn] {
        match self {
            Self::Standard => STANDARD_COLUMNS,
            Self::Custom => CUSTOM_COLUMNS,
        }
    }

    /// Both layouts open sorted by position, matching [`canonical_order`]
    pub fn initial_sort(&self) -> InitialSort {
        InitialSort {
            field_name: "position",
            direction: SortDirection::AscNullsLast,
        }
    }
}
