//! Collaborator traits
//!
//! The orchestrator writes positions through [`FieldPersistence`] and asks
//! [`FieldRefresher`] to re-pull server state after a successful reorder.

use async_trait::async_trait;
use crate::error::PersistError;
use shared::models::{FieldId, ObjectId};
use std::sync::Arc;

/// Writes a single field position to the backing store
#[async_trait]
pub trait FieldPersistence: Send + Sync {
    async fn update_position(&self, field_id: &FieldId, position: i32) -> Result<(), PersistError>;
}

/// Re-synchronizes server-derived caches for an object
#[async_trait]
pub trait FieldRefresher: Send + Sync {
    async fn refresh(&self, object_id: &ObjectId) -> Result<(), PersistError>;
}

#[async_trait]
impl<T: FieldPersistence + ?Sized> FieldPersistence for Arc<T> {
    async fn update_position(&self, field_id: &FieldId, position: i32) -> Result<(), PersistError> {
        (**self).update_position(field_id, position).await
    }
}

#[async_trait]
impl<T: FieldRefresher + ?Sized> FieldRefresher for Arc<T> {
    async fn refresh(&self, object_id: &ObjectId) -> Result<(), PersistError> {
        (**self).refresh(object_id).await
    }
}

/// Refresher for callers without server-side caches
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRefresher;

#[async_trait]
impl FieldRefresher for NoopRefresher {
    async fn refresh(&self, _object_id: &ObjectId) -> Result<(), PersistError> {
        Ok(())
    }
}
