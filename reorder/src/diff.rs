//! Diff-minimized update set

use shared::models::{FieldId, FieldItem};
use shared::request::PositionUpdate;
use std::collections::HashMap;

/// Keep only the assignments whose value differs from the field's current
/// position. An unset position always counts as changed; system fields are
/// never part of the result.
pub fn position_changes(before: &[FieldItem], assigned: &[PositionUpdate]) -> Vec<PositionUpdate> {
    let current: HashMap<&FieldId, Option<i32>> = before
        .iter()
        .filter(|f| !f.is_system)
        .map(|f| (&f.id, f.position))
        .collect();

    assigned
        .iter()
        .filter(|update| match current.get(&update.id) {
            Some(position) => *position != Some(update.position),
            None => false,
        })
        .cloned()
        .collect()
}
