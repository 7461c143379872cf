//! Reorder - field ordering for object settings tables
//!
//! Turns a drag over a filtered field table into a single move on the full
//! field list, assigns positions, persists only what changed and rolls back
//! when persistence fails.
//!
//! # Example
//!
//! ```
//! use reorder::{DragEvent, PlanOutcome, PositionPolicy, plan_reorder};
//! use shared::models::{FieldId, FieldItem};
//!
//! let fields = vec![
//!     FieldItem::new("a", "A").with_position(0),
//!     FieldItem::new("b", "B").with_position(1),
//!     FieldItem::new("c", "C").with_position(2),
//! ];
//! let visible: Vec<FieldId> = fields.iter().map(|f| f.id.clone()).collect();
//!
//! let PlanOutcome::Planned(plan) =
//!     plan_reorder(&fields, &visible, DragEvent::new(0, 2), PositionPolicy::Dense).unwrap()
//! else {
//!     unreachable!()
//! };
//! let order: Vec<&str> = plan.fields.iter().map(|f| f.id.as_str()).collect();
//! assert_eq!(order, ["b", "c", "a"]);
//! assert_eq!(plan.updates.len(), 3);
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod mapper;
pub mod orchestrator;
pub mod plan;
pub mod position;
pub mod sequence;
pub mod store;
pub mod traits;
pub mod visible;

pub use config::ReorderConfig;
pub use diff::position_changes;
pub use error::{PersistError, ReorderError, ReorderResult};
pub use mapper::{DragEvent, MappedMove, MoveResolution, SkipReason, map_visible_move};
pub use orchestrator::{PendingReorder, ReorderOutcome, ReorderStart, Reconciler};
pub use plan::{PlanOutcome, ReorderPlan, plan_reorder};
pub use position::{PositionPolicy, Stride, assign_positions};
pub use sequence::{canonical_order, move_element};
pub use store::{FieldListStore, PendingGuard, Revision};
pub use traits::{FieldPersistence, FieldRefresher, NoopRefresher};
pub use visible::{TableLayout, VisibleFilter, drag_enabled, visible_ids, visible_items};
