//! Field list store
//!
//! Owned state container for the field lists of every loaded object, keyed
//! by object id. Each write bumps a store-wide revision; the orchestrator
//! uses it to write optimistically and to roll back only what it wrote.

use parking_lot::RwLock;
use shared::models::{FieldItem, ObjectId, ObjectMetadata};
use std::collections::HashMap;
use std::sync::Arc;

/// Monotonic version of a field list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Revision(u64);

impl Revision {
    pub fn get(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct Entry {
    fields: Vec<FieldItem>,
    revision: Revision,
    pending: usize,
}

#[derive(Debug, Default)]
struct Inner {
    lists: HashMap<ObjectId, Entry>,
    last_revision: u64,
}

impl Inner {
    fn next_revision(&mut self) -> Revision {
        self.last_revision += 1;
        Revision(self.last_revision)
    }
}

/// Shared handle to the field lists; clones point at the same state
#[derive(Clone, Default)]
pub struct FieldListStore {
    inner: Arc<RwLock<Inner>>,
}

impl std::fmt::Debug for FieldListStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("FieldListStore")
            .field("objects", &inner.lists.len())
            .field("last_revision", &inner.last_revision)
            .finish()
    }
}

impl FieldListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the field list of `object_id`
    pub fn seed(&self, object_id: ObjectId, fields: Vec<FieldItem>) -> Revision {
        let mut inner = self.inner.write();
        let revision = inner.next_revision();
        let entry = inner.lists.entry(object_id).or_insert_with(|| Entry {
            fields: Vec::new(),
            revision,
            pending: 0,
        });
        entry.fields = fields;
        entry.revision = revision;
        revision
    }

    /// Seed from an object's metadata
    pub fn seed_object(&self, object: &ObjectMetadata) -> Revision {
        self.seed(object.id.clone(), object.fields.clone())
    }

    /// Current field list of `object_id`
    pub fn get(&self, object_id: &ObjectId) -> Option<Vec<FieldItem>> {
        self.inner.read().lists.get(object_id).map(|e| e.fields.clone())
    }

    /// Current field list together with its revision
    pub fn snapshot(&self, object_id: &ObjectId) -> Option<(Vec<FieldItem>, Revision)> {
        self.inner
            .read()
            .lists
            .get(object_id)
            .map(|e| (e.fields.clone(), e.revision))
    }

    pub fn revision(&self, object_id: &ObjectId) -> Option<Revision> {
        self.inner.read().lists.get(object_id).map(|e| e.revision)
    }

    /// Whether a reorder of `object_id` is waiting for persistence
    pub fn is_pending(&self, object_id: &ObjectId) -> bool {
        self.inner
            .read()
            .lists
            .get(object_id)
            .is_some_and(|e| e.pending > 0)
    }

    pub fn remove(&self, object_id: &ObjectId) -> Option<Vec<FieldItem>> {
        self.inner.write().lists.remove(object_id).map(|e| e.fields)
    }

    /// Replace the list if it is still at `expected`, marking it pending.
    ///
    /// Returns the new revision and a guard that clears the pending mark when
    /// dropped, or `None` when the list moved on or is gone.
    pub fn begin_pending(
        &self,
        object_id: &ObjectId,
        expected: Revision,
        fields: Vec<FieldItem>,
    ) -> Option<(Revision, PendingGuard)> {
        let mut inner = self.inner.write();
        let current = inner.lists.get(object_id).map(|e| e.revision)?;
        if current != expected {
            return None;
        }
        let revision = inner.next_revision();
        let entry = inner.lists.get_mut(object_id)?;
        entry.fields = fields;
        entry.revision = revision;
        entry.pending += 1;
        drop(inner);

        let guard = PendingGuard {
            store: self.clone(),
            object_id: object_id.clone(),
        };
        Some((revision, guard))
    }

    /// Restore `snapshot` if the list is still at `expected`.
    ///
    /// Returns false when a newer write (another reorder or a re-seed) has
    /// replaced the list; that newer state is left untouched.
    pub fn restore_if(&self, object_id: &ObjectId, expected: Revision, snapshot: Vec<FieldItem>) -> bool {
        let mut inner = self.inner.write();
        if inner.lists.get(object_id).map(|e| e.revision) != Some(expected) {
            return false;
        }
        let revision = inner.next_revision();
        let Some(entry) = inner.lists.get_mut(object_id) else {
            return false;
        };
        entry.fields = snapshot;
        entry.revision = revision;
        true
    }

    fn end_pending(&self, object_id: &ObjectId) {
        if let Some(entry) = self.inner.write().lists.get_mut(object_id) {
            entry.pending = entry.pending.saturating_sub(1);
        }
    }
}

/// Clears one pending mark on drop
#[derive(Debug)]
pub struct PendingGuard {
    store: FieldListStore,
    object_id: ObjectId,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.store.end_pending(&self.object_id);
    }
}
