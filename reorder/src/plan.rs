//! Pure reorder planning
//!
//! Combines the mapper, the position assigner and the diff into the new
//! field list plus the writes needed to persist it. Nothing here touches
//! shared state.

use crate::diff::position_changes;
use crate::error::ReorderResult;
use crate::mapper::{DragEvent, MoveResolution, SkipReason, map_visible_move};
use crate::position::{PositionPolicy, assign_positions};
use shared::models::{FieldId, FieldItem};
use shared::request::PositionUpdate;
use std::collections::HashMap;

/// Everything needed to apply and persist one reorder
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderPlan {
    pub moved: FieldId,
    pub from: usize,
    pub to: usize,
    /// New full list: reordered non-system fields, then system fields
    pub fields: Vec<FieldItem>,
    /// Writes for the fields whose position changed
    pub updates: Vec<PositionUpdate>,
}

impl ReorderPlan {
    /// Number of non-system fields in the new list
    pub fn reorderable_count(&self) -> usize {
        self.fields.iter().filter(|f| !f.is_system).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    Skipped(SkipReason),
    Planned(ReorderPlan),
}

/// Plan the reorder of `fields` for a drag over `visible`.
pub fn plan_reorder(
    fields: &[FieldItem],
    visible: &[FieldId],
    drag: DragEvent,
    policy: PositionPolicy,
) -> ReorderResult<PlanOutcome> {
    let mapped = match map_visible_move(fields, visible, drag)? {
        MoveResolution::Skip(reason) => return Ok(PlanOutcome::Skipped(reason)),
        MoveResolution::Move(mapped) => mapped,
    };

    let assigned = assign_positions(&mapped.order, policy)?;
    let updates = position_changes(fields, &assigned);

    let by_id: HashMap<&FieldId, &FieldItem> = fields
        .iter()
        .filter(|f| !f.is_system)
        .map(|f| (&f.id, f))
        .collect();

    let mut next = Vec::with_capacity(fields.len());
    for assignment in &assigned {
        // every id in the order came from `fields`
        if let Some(field) = by_id.get(&assignment.id) {
            let mut field = (*field).clone();
            field.position = Some(assignment.position);
            next.push(field);
        }
    }
    next.extend(fields.iter().filter(|f| f.is_system).cloned());

    Ok(PlanOutcome::Planned(ReorderPlan {
        moved: mapped.moved,
        from: mapped.from,
        to: mapped.to,
        fields: next,
        updates,
    }))
}
