//! The persisted entity store and the types it reports back.

use serde::Serialize;

pub mod entity_store;

pub use entity_store::EntityStore;

/// Where a ready store's collection came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadOrigin {
    /// Decoded from the slot.
    Stored,
    /// Slot was empty; the seed set was written.
    Seeded,
    /// Slot was unreadable or corrupt; the seed set is held in memory only.
    Recovered,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreState {
    Uninitialized,
    Seeding,
    Ready(LoadOrigin),
}

impl StoreState {
    pub fn is_ready(&self) -> bool { matches!(self, StoreState::Ready(_)) }
}

/// Result of a mutation: the collection after it, whether anything changed,
/// and a warning when the collection could not be persisted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Committed<E> {
    #[serde(rename = "items")]
    pub records: Vec<E>,
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl<E> Committed<E> {
    pub fn persisted(&self) -> bool { self.warning.is_none() }
}
