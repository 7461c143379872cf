//! Ordered sequence primitives
//!
//! `move_element` is the only list mutation the reorder path performs;
//! `canonical_order` defines what "the order" of a field list is.

use crate::error::{ReorderError, ReorderResult};
use shared::models::{FieldItem, cmp_position_nulls_last};

/// Move one element of `sequence` from `from` to `to`.
///
/// Removes at `from`, then inserts at `to`; `to` is an index into the
/// sequence after removal, so moving down lands right after the element that
/// previously sat at `to`, moving up lands right before it.
pub fn move_element<T>(sequence: &mut Vec<T>, from: usize, to: usize) -> ReorderResult<()> {
    let len = sequence.len();
    if from >= len {
        return Err(ReorderError::IndexOutOfRange { index: from, len });
    }
    if to >= len {
        return Err(ReorderError::IndexOutOfRange { index: to, len });
    }
    if from == to {
        return Ok(());
    }

    let item = sequence.remove(from);
    sequence.insert(to, item);
    Ok(())
}

/// Non-system fields in canonical order.
///
/// Sorted by `position` ascending with unset positions last. The sort is
/// stable, so equal positions (every field starts at the column default)
/// keep their list order.
pub fn canonical_order(fields: &[FieldItem]) -> Vec<&FieldItem> {
    let mut ordered: Vec<&FieldItem> = fields.iter().filter(|f| !f.is_system).collect();
    ordered.sort_by(|a, b| cmp_position_nulls_last(a.position, b.position));
    ordered
}
