//! Filtered-index mapper
//!
//! Translates a drag over the visible (filtered) list into a single move on
//! the full non-system ordering. Both drag endpoints are resolved to field
//! ids first, so the result does not depend on which fields the filter
//! happens to hide.

use crate::error::{ReorderError, ReorderResult};
use crate::sequence::{canonical_order, move_element};
use serde::{Deserialize, Serialize};
use shared::models::{FieldId, FieldItem};

/// Completed drag gesture over the visible list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragEvent {
    pub source_index: usize,
    /// `None` when the drop happened outside the list
    pub destination_index: Option<usize>,
}

impl DragEvent {
    pub fn new(source_index: usize, destination_index: usize) -> Self {
        Self {
            source_index,
            destination_index: Some(destination_index),
        }
    }

    pub fn cancelled(source_index: usize) -> Self {
        Self {
            source_index,
            destination_index: None,
        }
    }
}

/// Why a drag produced no reorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Dropped outside the list
    NoDestination,
    /// Dropped where it was picked up
    NoOpMove,
}

/// A drag resolved onto the full non-system ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedMove {
    pub moved: FieldId,
    /// Index of the moved field in the full ordering before the move
    pub from: usize,
    /// Index of the moved field in the full ordering after the move
    pub to: usize,
    /// Full non-system ordering after the move
    pub order: Vec<FieldId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResolution {
    Skip(SkipReason),
    Move(MappedMove),
}

/// Map a drag over `visible` onto the non-system fields of `fields`.
///
/// `visible` is the ordered id list the user saw when the drag ended.
/// Hidden fields keep their relative order; the dragged field is placed
/// immediately after the destination field when moving down and immediately
/// before it when moving up.
pub fn map_visible_move(
    fields: &[FieldItem],
    visible: &[FieldId],
    drag: DragEvent,
) -> ReorderResult<MoveResolution> {
    let Some(destination_index) = drag.destination_index else {
        return Ok(MoveResolution::Skip(SkipReason::NoDestination));
    };
    if drag.source_index == destination_index {
        return Ok(MoveResolution::Skip(SkipReason::NoOpMove));
    }

    let source_id = visible_id_at(visible, drag.source_index)?;
    let destination_id = visible_id_at(visible, destination_index)?;

    let mut order: Vec<FieldId> = canonical_order(fields)
        .into_iter()
        .map(|f| f.id.clone())
        .collect();
    let from = index_of(&order, source_id)?;
    let to = index_of(&order, destination_id)?;

    move_element(&mut order, from, to)?;

    Ok(MoveResolution::Move(MappedMove {
        moved: source_id.clone(),
        from,
        to,
        order,
    }))
}

fn visible_id_at(visible: &[FieldId], index: usize) -> ReorderResult<&FieldId> {
    visible.get(index).ok_or(ReorderError::IndexOutOfRange {
        index,
        len: visible.len(),
    })
}

fn index_of(order: &[FieldId], id: &FieldId) -> ReorderResult<usize> {
    order
        .iter()
        .position(|candidate| candidate == id)
        .ok_or_else(|| ReorderError::IdentifierNotFound(id.clone()))
}
