//! Optimistic reorder orchestrator
//!
//! A reorder runs in two phases:
//!
//! 1. [`Reconciler::begin_reorder`] is synchronous. It plans the move against
//!    a snapshot of the store and writes the new list before anything awaits.
//! 2. [`PendingReorder::persist`] sends the changed positions to the
//!    persistence collaborator. If any write fails the whole list is rolled
//!    back to the snapshot, unless a newer write has replaced it meanwhile.
//!
//! [`Reconciler::reconcile_reorder`] runs both phases back to back.

use crate::config::ReorderConfig;
use crate::error::{PersistError, ReorderError, ReorderResult};
use crate::mapper::{DragEvent, SkipReason};
use crate::plan::{PlanOutcome, ReorderPlan, plan_reorder};
use crate::store::{FieldListStore, PendingGuard, Revision};
use crate::traits::{FieldPersistence, FieldRefresher};
use crate::visible::VisibleFilter;
use futures::stream::{self, StreamExt};
use shared::error::{AppError, ErrorCode};
use shared::models::{FieldId, FieldItem, ObjectId};
use shared::request::BatchUpdateResponse;

/// Result of a reorder attempt that got past validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// Nothing to do; the store was not touched
    Skipped(SkipReason),
    /// All changed positions were persisted
    Applied {
        moved: FieldId,
        updated: usize,
        total: usize,
    },
    /// At least one write failed and the reorder was undone
    RolledBack {
        moved: FieldId,
        failed: Vec<FieldId>,
        /// False when a newer write had already replaced the list
        restored: bool,
    },
}

impl ReorderOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// Batch summary for an applied reorder
    pub fn batch_response(&self) -> Option<BatchUpdateResponse> {
        match self {
            Self::Applied { updated, total, .. } => Some(BatchUpdateResponse {
                updated: *updated,
                total: *total,
            }),
            _ => None,
        }
    }

    /// Non-blocking notification to show after a rollback
    pub fn notification(&self) -> Option<AppError> {
        match self {
            Self::RolledBack { moved, failed, .. } => Some(
                AppError::new(ErrorCode::ReorderRolledBack)
                    .with_detail("field_id", moved.as_str())
                    .with_detail(
                        "failed",
                        failed.iter().map(|id| id.to_string()).collect::<Vec<_>>(),
                    ),
            ),
            _ => None,
        }
    }
}

/// Applies drag reorders to a [`FieldListStore`] and persists them
pub struct Reconciler<P, R> {
    store: FieldListStore,
    persistence: P,
    refresher: R,
    config: ReorderConfig,
}

impl<P, R> std::fmt::Debug for Reconciler<P, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<P, R> Reconciler<P, R>
where
    P: FieldPersistence,
    R: FieldRefresher,
{
    pub fn new(store: FieldListStore, persistence: P, refresher: R, config: ReorderConfig) -> Self {
        Self {
            store,
            persistence,
            refresher,
            config,
        }
    }

    pub fn store(&self) -> &FieldListStore {
        &self.store
    }

    pub fn config(&self) -> &ReorderConfig {
        &self.config
    }

    /// Whether the table of `object_id` should accept drags right now
    pub fn drag_enabled(&self, object_id: &ObjectId, filter: &VisibleFilter) -> bool {
        crate::visible::drag_enabled(filter, self.store.is_pending(object_id))
    }

    /// Plan the drag and write the new list optimistically.
    ///
    /// Fails without touching the store when the object is unknown, the drag
    /// does not resolve against the current list, or the list changed while
    /// the plan was being computed.
    pub fn begin_reorder(
        &self,
        object_id: &ObjectId,
        visible: &[FieldId],
        drag: DragEvent,
    ) -> ReorderResult<ReorderStart<'_, P, R>> {
        let (snapshot, revision) = self
            .store
            .snapshot(object_id)
            .ok_or_else(|| ReorderError::UnknownObject(object_id.clone()))?;

        let plan = match plan_reorder(&snapshot, visible, drag, self.config.policy)? {
            PlanOutcome::Skipped(reason) => {
                tracing::debug!(object_id = %object_id, reason = ?reason, "Reorder skipped");
                return Ok(ReorderStart::Skipped(reason));
            }
            PlanOutcome::Planned(plan) => plan,
        };

        let (written, guard) = self
            .store
            .begin_pending(object_id, revision, plan.fields.clone())
            .ok_or_else(|| ReorderError::ConcurrentModification(object_id.clone()))?;

        tracing::info!(
            object_id = %object_id,
            field_id = %plan.moved,
            from = plan.from,
            to = plan.to,
            count = plan.updates.len(),
            "Field reorder applied optimistically"
        );

        Ok(ReorderStart::Pending(PendingReorder {
            reconciler: self,
            object_id: object_id.clone(),
            snapshot,
            revision: written,
            plan,
            guard,
        }))
    }

    /// Apply a drag and persist it, rolling back on failure.
    pub async fn reconcile_reorder(
        &self,
        object_id: &ObjectId,
        visible: &[FieldId],
        drag: DragEvent,
    ) -> ReorderResult<ReorderOutcome> {
        match self.begin_reorder(object_id, visible, drag)? {
            ReorderStart::Skipped(reason) => Ok(ReorderOutcome::Skipped(reason)),
            ReorderStart::Pending(pending) => Ok(pending.persist().await),
        }
    }

    async fn refresh(&self, object_id: &ObjectId) {
        if !self.config.refresh_after_persist {
            return;
        }
        if let Err(e) = self.refresher.refresh(object_id).await {
            tracing::warn!(object_id = %object_id, error = %e, "Failed to refresh object after reorder");
        }
    }
}

/// First phase of a reorder
pub enum ReorderStart<'a, P, R> {
    Skipped(SkipReason),
    Pending(PendingReorder<'a, P, R>),
}

impl<P, R> std::fmt::Debug for ReorderStart<'_, P, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skipped(reason) => f.debug_tuple("Skipped").field(reason).finish(),
            Self::Pending(pending) => f.debug_tuple("Pending").field(pending).finish(),
        }
    }
}

/// A reorder written to the store and waiting to be persisted
///
/// The object stays marked as pending until this value is persisted or
/// dropped. Dropping it without persisting keeps the optimistic list.
pub struct PendingReorder<'a, P, R> {
    reconciler: &'a Reconciler<P, R>,
    object_id: ObjectId,
    snapshot: Vec<FieldItem>,
    revision: Revision,
    plan: ReorderPlan,
    guard: PendingGuard,
}

impl<P, R> std::fmt::Debug for PendingReorder<'_, P, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingReorder")
            .field("object_id", &self.object_id)
            .field("revision", &self.revision)
            .field("plan", &self.plan)
            .finish_non_exhaustive()
    }
}

impl<P, R> PendingReorder<'_, P, R>
where
    P: FieldPersistence,
    R: FieldRefresher,
{
    pub fn plan(&self) -> &ReorderPlan {
        &self.plan
    }

    /// Revision of the optimistic write
    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// List as it was before the optimistic write
    pub fn snapshot(&self) -> &[FieldItem] {
        &self.snapshot
    }

    /// Persist every changed position, then refresh or roll back.
    pub async fn persist(self) -> ReorderOutcome {
        let Self {
            reconciler,
            object_id,
            snapshot,
            revision,
            plan,
            guard,
        } = self;
        let persistence = &reconciler.persistence;
        let total = plan.reorderable_count();

        tracing::info!(
            object_id = %object_id,
            count = plan.updates.len(),
            total,
            "Persisting field positions"
        );

        let results: Vec<(FieldId, Result<(), PersistError>)> = stream::iter(plan.updates.iter())
            .map(|update| async move {
                tracing::debug!(id = %update.id, position = update.position, "Updating field position");
                let result = persistence.update_position(&update.id, update.position).await;
                (update.id.clone(), result)
            })
            .buffered(reconciler.config.max_concurrent_updates.max(1))
            .collect()
            .await;

        let mut updated = 0;
        let mut failed = Vec::new();
        for (id, result) in results {
            match result {
                Ok(()) => updated += 1,
                Err(e) => {
                    let code = e.error_code();
                    tracing::error!(
                        id = %id,
                        code = %code,
                        category = code.category().name(),
                        error = %e,
                        "Failed to update field position"
                    );
                    failed.push(id);
                }
            }
        }

        if !failed.is_empty() {
            let restored = reconciler.store.restore_if(&object_id, revision, snapshot);
            drop(guard);
            if restored {
                tracing::warn!(
                    object_id = %object_id,
                    failed = failed.len(),
                    "Field reorder rolled back"
                );
            } else {
                tracing::warn!(
                    object_id = %object_id,
                    failed = failed.len(),
                    "Field list replaced during reorder, rollback skipped"
                );
            }
            return ReorderOutcome::RolledBack {
                moved: plan.moved,
                failed,
                restored,
            };
        }
        drop(guard);

        tracing::info!(
            object_id = %object_id,
            updated,
            total,
            "Field reorder persisted"
        );

        reconciler.refresh(&object_id).await;

        ReorderOutcome::Applied {
            moved: plan.moved,
            updated,
            total,
        }
    }
}
