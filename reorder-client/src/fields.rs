//! Field metadata API
//!
//! [`FieldApi`] is the network side of a reorder: it persists single field
//! positions, refetches the object and its views after a reorder, and loads
//! object metadata into a [`FieldListStore`].

use crate::{ClientError, ClientResult, HttpClient};
use async_trait::async_trait;
use parking_lot::RwLock;
use reorder::{FieldListStore, FieldPersistence, FieldRefresher, PersistError, Revision};
use shared::error::ApiResponse;
use shared::models::{FieldId, FieldItem, FieldUpdate, ObjectId, ObjectMetadata, ViewSummary};
use std::collections::HashMap;
use std::sync::Arc;

/// Last fetched object and view metadata, keyed by object id
#[derive(Debug, Clone, Default)]
pub struct MetadataCache {
    objects: Arc<RwLock<HashMap<ObjectId, ObjectMetadata>>>,
    views: Arc<RwLock<HashMap<ObjectId, Vec<ViewSummary>>>>,
}

impl MetadataCache {
    pub fn object(&self, id: &ObjectId) -> Option<ObjectMetadata> {
        self.objects.read().get(id).cloned()
    }

    pub fn views(&self, id: &ObjectId) -> Vec<ViewSummary> {
        self.views.read().get(id).cloned().unwrap_or_default()
    }

    pub fn invalidate(&self, id: &ObjectId) {
        self.objects.write().remove(id);
        self.views.write().remove(id);
    }

    fn put_object(&self, object: ObjectMetadata) {
        self.objects.write().insert(object.id.clone(), object);
    }

    fn put_views(&self, id: &ObjectId, views: Vec<ViewSummary>) {
        self.views.write().insert(id.clone(), views);
    }
}

/// Unwrap the data of a successful envelope
fn into_data<T>(resp: ApiResponse<T>, what: &str) -> ClientResult<T> {
    if !resp.is_success() {
        return Err(ClientError::Api(resp.into_error()));
    }
    resp.data
        .ok_or_else(|| ClientError::InvalidResponse(format!("Missing {} data", what)))
}

/// Field and object endpoints of the metadata API
#[derive(Debug, Clone)]
pub struct FieldApi<H> {
    http: H,
    cache: MetadataCache,
}

impl<H: HttpClient> FieldApi<H> {
    pub fn new(http: H) -> Self {
        Self {
            http,
            cache: MetadataCache::default(),
        }
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    /// GET api/objects/{id}
    pub async fn fetch_object(&self, object_id: &ObjectId) -> ClientResult<ObjectMetadata> {
        let resp: ApiResponse<ObjectMetadata> = self
            .http
            .get(&format!("api/objects/{}", object_id))
            .await?;
        let object = into_data(resp, "object")?;
        self.cache.put_object(object.clone());
        Ok(object)
    }

    /// GET api/objects/{id}/views
    pub async fn fetch_views(&self, object_id: &ObjectId) -> ClientResult<Vec<ViewSummary>> {
        let resp: ApiResponse<Vec<ViewSummary>> = self
            .http
            .get(&format!("api/objects/{}/views", object_id))
            .await?;
        let views = into_data(resp, "views")?;
        self.cache.put_views(object_id, views.clone());
        Ok(views)
    }

    /// PUT api/fields/{id}
    pub async fn update_field(&self, field_id: &FieldId, update: &FieldUpdate) -> ClientResult<FieldItem> {
        let resp: ApiResponse<FieldItem> = self
            .http
            .put(&format!("api/fields/{}", field_id), update)
            .await?;
        into_data(resp, "field")
    }

    /// Fetch an object and seed its field list into `store`
    pub async fn load_into(&self, store: &FieldListStore, object_id: &ObjectId) -> ClientResult<Revision> {
        let object = self.fetch_object(object_id).await?;
        tracing::info!(
            object_id = %object_id,
            count = object.fields.len(),
            "Loaded object fields"
        );
        Ok(store.seed_object(&object))
    }
}

#[async_trait]
impl<H: HttpClient> FieldPersistence for FieldApi<H> {
    async fn update_position(&self, field_id: &FieldId, position: i32) -> Result<(), PersistError> {
        self.update_field(field_id, &FieldUpdate::position(position))
            .await
            .map(|_| ())
            .map_err(PersistError::from)
    }
}

#[async_trait]
impl<H: HttpClient> FieldRefresher for FieldApi<H> {
    async fn refresh(&self, object_id: &ObjectId) -> Result<(), PersistError> {
        tokio::try_join!(self.fetch_object(object_id), self.fetch_views(object_id))?;
        tracing::debug!(object_id = %object_id, "Object metadata refreshed");
        Ok(())
    }
}
