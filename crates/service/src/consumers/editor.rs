use std::sync::Arc;

use models::Entity;
use tracing::info;

use super::Render;
use crate::errors::ServiceError;
use crate::storage::SlotStore;
use crate::store::{Committed, EntityStore, LoadOrigin, StoreState};

/// Admin-side consumer: holds one store open for the life of the process and
/// sees its own mutations immediately.
pub struct Editor<E, S: ?Sized = dyn SlotStore> {
    store: EntityStore<E, S>,
}

impl<E, S> Editor<E, S>
where
    E: Entity,
    S: SlotStore + ?Sized,
{
    pub fn new(slots: Arc<S>) -> Self { Self { store: EntityStore::new(slots) } }

    /// Open the underlying store; returns where the collection came from.
    pub async fn mount(&self) -> Option<LoadOrigin> {
        let records = self.store.open().await;
        let origin = match self.store.state().await {
            StoreState::Ready(origin) => Some(origin),
            _ => None,
        };
        info!(slot = E::SLOT, count = records.len(), ?origin, "editor_mounted");
        origin
    }

    pub async fn render(&self) -> Render<E> {
        match self.store.list().await {
            Ok(records) => Render::from_records(records),
            Err(_) => Render::Loading,
        }
    }

    /// Filtered view for the admin search box.
    pub async fn search(&self, query: &str) -> Result<Vec<E>, ServiceError> { self.store.list_matching(query).await }

    pub async fn get(&self, id: &str) -> Result<Option<E>, ServiceError> { self.store.get(id).await }

    pub async fn create(&self, draft: E::Draft) -> Result<Committed<E>, ServiceError> { self.store.create(draft).await }

    pub async fn update(&self, id: &str, patch: E::Patch) -> Result<Committed<E>, ServiceError> {
        self.store.update(id, patch).await
    }

    pub async fn delete(&self, id: &str) -> Result<Committed<E>, ServiceError> { self.store.delete(id).await }

    pub fn store(&self) -> &EntityStore<E, S> { &self.store }
}
