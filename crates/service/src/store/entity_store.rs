use std::sync::Arc;

use models::Entity;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{Committed, LoadOrigin, StoreState};
use crate::codec;
use crate::errors::ServiceError;
use crate::storage::SlotStore;

struct Inner<E> {
    state: StoreState,
    records: Vec<E>,
}

/// One named collection kept in sync with its slot.
///
/// The store starts `Uninitialized`; `open` loads the slot (seeding it when
/// empty) and moves it to `Ready`. Every mutation holds the write lock from
/// the in-memory change through the slot write, then hands back the full
/// collection. A failed slot write never fails the mutation: the in-memory
/// collection stays authoritative and the failure is returned as a warning.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use models::Service;
/// use models::service::NewService;
/// use service::storage::MemorySlots;
/// use service::store::EntityStore;
///
/// let store = EntityStore::<Service, MemorySlots>::new(Arc::new(MemorySlots::new()));
/// let seeded = tokio_test::block_on(store.open());
/// assert_eq!(seeded.len(), 6);
///
/// let draft = NewService { src: "x.png".into(), alt: "Test Service".into() };
/// let committed = tokio_test::block_on(store.create(draft)).unwrap();
/// assert_eq!(committed.records.len(), 7);
/// assert_eq!(committed.records[0].alt, "Test Service");
/// ```
pub struct EntityStore<E, S: ?Sized = dyn SlotStore> {
    slots: Arc<S>,
    inner: RwLock<Inner<E>>,
}

impl<E, S> EntityStore<E, S>
where
    E: Entity,
    S: SlotStore + ?Sized,
{
    pub fn new(slots: Arc<S>) -> Self {
        Self { slots, inner: RwLock::new(Inner { state: StoreState::Uninitialized, records: Vec::new() }) }
    }

    pub fn slot(&self) -> &'static str { E::SLOT }

    pub async fn state(&self) -> StoreState { self.inner.read().await.state }

    pub async fn is_ready(&self) -> bool { self.state().await.is_ready() }

    /// Load the collection from the slot.
    ///
    /// - absent slot: the seed set is written and returned;
    /// - unreadable or undecodable slot: the seed set is returned but only held
    ///   in memory, the slot content is left as it is;
    /// - otherwise the decoded collection is returned unchanged.
    ///
    /// Calling `open` again re-reads the slot.
    #[instrument(skip(self), fields(slot = E::SLOT))]
    pub async fn open(&self) -> Vec<E> {
        let mut inner = self.inner.write().await;
        let (records, origin) = match self.slots.read(E::SLOT).await {
            Ok(Some(raw)) => match codec::decode::<E>(&raw) {
                Ok(records) => (records, LoadOrigin::Stored),
                Err(err) => {
                    warn!(slot = E::SLOT, error = %err, event = "decode_failed", "slot content is corrupt; using defaults in memory");
                    (E::seed(), LoadOrigin::Recovered)
                }
            },
            Ok(None) => {
                inner.state = StoreState::Seeding;
                let seed = E::seed();
                match self.persist(&seed).await {
                    Ok(()) => info!(slot = E::SLOT, count = seed.len(), event = "seeded", "seeded empty slot"),
                    Err(err) => warn!(slot = E::SLOT, error = %err, event = "seed_write_failed", "could not persist seed set"),
                }
                (seed, LoadOrigin::Seeded)
            }
            Err(err) => {
                warn!(slot = E::SLOT, error = %err, event = "read_failed", "slot unreadable; using defaults in memory");
                (E::seed(), LoadOrigin::Recovered)
            }
        };
        debug!(slot = E::SLOT, count = records.len(), ?origin, "store_ready");
        inner.records = records;
        inner.state = StoreState::Ready(origin);
        inner.records.clone()
    }

    pub async fn list(&self) -> Result<Vec<E>, ServiceError> {
        Ok(self.ready_read().await?.records.clone())
    }

    /// Records whose searchable text contains `query`, ignoring case.
    pub async fn list_matching(&self, query: &str) -> Result<Vec<E>, ServiceError> {
        self.list_by(|r| r.matches(query)).await
    }

    pub async fn list_by<F>(&self, predicate: F) -> Result<Vec<E>, ServiceError>
    where
        F: Fn(&E) -> bool,
    {
        let inner = self.ready_read().await?;
        Ok(inner.records.iter().filter(|r| predicate(r)).cloned().collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<E>, ServiceError> {
        let inner = self.ready_read().await?;
        Ok(inner.records.iter().find(|r| r.id() == id).cloned())
    }

    /// Validate the draft, give it a fresh id and put it first.
    pub async fn create(&self, draft: E::Draft) -> Result<Committed<E>, ServiceError> {
        let mut inner = self.ready_write().await?;
        let record = E::from_draft(fresh_id(&inner.records), draft)?;
        debug!(slot = E::SLOT, id = record.id(), "create_{}", E::LABEL);
        inner.records.insert(0, record);
        Ok(self.commit(&inner, true).await)
    }

    /// Patch the record with `id` in place. A missing id leaves the
    /// collection unchanged (`changed == false`); it is still persisted.
    pub async fn update(&self, id: &str, patch: E::Patch) -> Result<Committed<E>, ServiceError> {
        E::validate_patch(&patch)?;
        let mut inner = self.ready_write().await?;
        let changed = match inner.records.iter_mut().find(|r| r.id() == id) {
            Some(record) => {
                record.apply_patch(patch);
                true
            }
            None => false,
        };
        Ok(self.commit(&inner, changed).await)
    }

    /// Remove the record with `id`; a missing id is a no-op.
    pub async fn delete(&self, id: &str) -> Result<Committed<E>, ServiceError> {
        let mut inner = self.ready_write().await?;
        let before = inner.records.len();
        inner.records.retain(|r| r.id() != id);
        let changed = inner.records.len() != before;
        Ok(self.commit(&inner, changed).await)
    }

    async fn ready_read(&self) -> Result<RwLockReadGuard<'_, Inner<E>>, ServiceError> {
        let inner = self.inner.read().await;
        if inner.state.is_ready() { Ok(inner) } else { Err(ServiceError::NotReady) }
    }

    async fn ready_write(&self) -> Result<RwLockWriteGuard<'_, Inner<E>>, ServiceError> {
        let inner = self.inner.write().await;
        if inner.state.is_ready() { Ok(inner) } else { Err(ServiceError::NotReady) }
    }

    async fn persist(&self, records: &[E]) -> Result<(), ServiceError> {
        let raw = codec::encode(records)?;
        self.slots.write(E::SLOT, &raw).await
    }

    async fn commit(&self, inner: &Inner<E>, changed: bool) -> Committed<E> {
        let warning = match self.persist(&inner.records).await {
            Ok(()) => None,
            Err(err) => {
                warn!(slot = E::SLOT, error = %err, event = "persist_failed", "keeping in-memory collection");
                Some(err.to_string())
            }
        };
        debug!(slot = E::SLOT, count = inner.records.len(), changed, "store_committed");
        Committed { records: inner.records.clone(), changed, warning }
    }
}

fn fresh_id<E: Entity>(records: &[E]) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !records.iter().any(|r| r.id() == id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use models::department::{DepartmentPatch, NewDepartment};
    use models::service::{NewService, ServicePatch};
    use models::user::{NewUser, UserPatch};
    use models::{Department, Role, Service, User};

    use super::*;
    use crate::storage::MemorySlots;

    fn store<E: Entity>(slots: &Arc<MemorySlots>) -> EntityStore<E, MemorySlots> {
        EntityStore::new(Arc::clone(slots))
    }

    fn new_service(alt: &str) -> NewService {
        NewService { src: "x.png".into(), alt: alt.into() }
    }

    #[tokio::test]
    async fn open_on_empty_slot_seeds_and_persists() -> anyhow::Result<()> {
        let slots = Arc::new(MemorySlots::new());
        let services = store::<Service>(&slots);
        assert_eq!(services.state().await, StoreState::Uninitialized);

        let opened = services.open().await;
        assert_eq!(opened, Service::seed());
        assert_eq!(services.state().await, StoreState::Ready(LoadOrigin::Seeded));

        let raw = slots.read(Service::SLOT).await?.expect("seed persisted");
        assert_eq!(codec::decode::<Service>(&raw)?, Service::seed());

        // a second open reads what is stored instead of seeding again
        let again = store::<Service>(&slots);
        assert_eq!(again.open().await, Service::seed());
        assert_eq!(again.state().await, StoreState::Ready(LoadOrigin::Stored));
        Ok(())
    }

    #[tokio::test]
    async fn seeding_never_overrides_real_data() -> anyhow::Result<()> {
        let slots = Arc::new(MemorySlots::new());
        slots.write(Department::SLOT, "[]").await?;
        let departments = store::<Department>(&slots);
        assert!(departments.open().await.is_empty());
        assert_eq!(departments.state().await, StoreState::Ready(LoadOrigin::Stored));
        assert_eq!(slots.read(Department::SLOT).await?.as_deref(), Some("[]"));
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_slot_falls_back_in_memory_and_is_left_untouched() -> anyhow::Result<()> {
        let slots = Arc::new(MemorySlots::new());
        slots.write(User::SLOT, "{{ definitely not json").await?;

        let users = store::<User>(&slots);
        assert_eq!(users.open().await, User::seed());
        assert_eq!(users.state().await, StoreState::Ready(LoadOrigin::Recovered));
        assert_eq!(slots.read(User::SLOT).await?.as_deref(), Some("{{ definitely not json"));
        Ok(())
    }

    #[tokio::test]
    async fn operations_before_open_are_rejected() {
        let slots = Arc::new(MemorySlots::new());
        let services = store::<Service>(&slots);
        assert!(matches!(services.list().await, Err(ServiceError::NotReady)));
        assert!(matches!(services.create(new_service("Early")).await, Err(ServiceError::NotReady)));
        assert!(matches!(services.delete("1").await, Err(ServiceError::NotReady)));
        assert!(slots.is_empty().await);
    }

    #[tokio::test]
    async fn create_prepends_with_unique_ids_and_persists() -> anyhow::Result<()> {
        let slots = Arc::new(MemorySlots::new());
        let services = store::<Service>(&slots);
        services.open().await;

        let first = services.create(new_service("First")).await?;
        let second = services.create(new_service("Second")).await?;
        assert!(first.changed && second.persisted());

        let listed = services.list().await?;
        assert_eq!(listed.len(), 8);
        assert_eq!(listed[0].alt, "Second");
        assert_eq!(listed[1].alt, "First");
        let ids: HashSet<&str> = listed.iter().map(|s| s.id()).collect();
        assert_eq!(ids.len(), listed.len());

        let raw = slots.read(Service::SLOT).await?.unwrap_or_default();
        assert_eq!(codec::decode::<Service>(&raw)?, listed);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_create_changes_nothing() -> anyhow::Result<()> {
        let slots = Arc::new(MemorySlots::new());
        let departments = store::<Department>(&slots);
        departments.open().await;
        let before = slots.read(Department::SLOT).await?;

        let draft = NewDepartment { name: "Ops".into(), head: "Kim".into(), members: -4 };
        let err = departments.create(draft).await.unwrap_err();
        assert!(err.is_validation());

        assert_eq!(departments.list().await?, Department::seed());
        assert_eq!(slots.read(Department::SLOT).await?, before);
        Ok(())
    }

    #[tokio::test]
    async fn update_changes_only_patched_fields() -> anyhow::Result<()> {
        let slots = Arc::new(MemorySlots::new());
        let departments = store::<Department>(&slots);
        departments.open().await;

        let patch = DepartmentPatch { head: Some("Grace Hopper".into()), ..Default::default() };
        let committed = departments.update("1", patch).await?;
        assert!(committed.changed);

        let mut expected = Department::seed();
        expected[0].head = "Grace Hopper".into();
        assert_eq!(committed.records, expected);
        assert_eq!(departments.get("1").await?.map(|d| d.members), Some(5));
        Ok(())
    }

    #[tokio::test]
    async fn update_on_missing_id_is_a_persisted_no_op() -> anyhow::Result<()> {
        let slots = Arc::new(MemorySlots::new());
        let users = store::<User>(&slots);
        users.open().await;
        slots.erase(User::SLOT).await?;

        let patch = UserPatch { role: Some("Editor".into()), ..Default::default() };
        let committed = users.update("nope", patch).await?;
        assert!(!committed.changed);
        assert_eq!(committed.records, User::seed());
        // the unchanged collection was still written back
        assert!(slots.read(User::SLOT).await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn invalid_patch_is_rejected() -> anyhow::Result<()> {
        let slots = Arc::new(MemorySlots::new());
        let users = store::<User>(&slots);
        users.open().await;
        let patch = UserPatch { role: Some("Superuser".into()), ..Default::default() };
        assert!(users.update("1", patch).await.unwrap_err().is_validation());
        assert_eq!(users.get("1").await?.map(|u| u.role), Some(Role::Administrator));
        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_or_none() -> anyhow::Result<()> {
        let slots = Arc::new(MemorySlots::new());
        let services = store::<Service>(&slots);
        services.open().await;

        let removed = services.delete("3").await?;
        assert!(removed.changed);
        assert_eq!(removed.records.len(), 5);
        assert!(removed.records.iter().all(|s| s.id != "3"));

        let missing = services.delete("3").await?;
        assert!(!missing.changed);
        assert_eq!(missing.records.len(), 5);
        Ok(())
    }

    #[tokio::test]
    async fn persistence_failure_keeps_memory_authoritative() -> anyhow::Result<()> {
        let slots = Arc::new(MemorySlots::new());
        let services = store::<Service>(&slots);
        services.open().await;
        slots.set_writable(false);

        let committed = services.create(new_service("Offline")).await?;
        assert!(committed.warning.is_some());
        assert_eq!(services.list().await?[0].alt, "Offline");

        // the slot still holds the seed set
        let raw = slots.read(Service::SLOT).await?.unwrap_or_default();
        assert_eq!(codec::decode::<Service>(&raw)?.len(), 6);

        let renamed = services.update("1", ServicePatch { alt: Some("Paving".into()), ..Default::default() }).await?;
        assert!(!renamed.persisted());
        assert_eq!(services.get("1").await?.map(|s| s.alt), Some("Paving".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn seed_write_failure_still_yields_ready_store() -> anyhow::Result<()> {
        let slots = Arc::new(MemorySlots::new());
        slots.set_writable(false);
        let departments = store::<Department>(&slots);
        assert_eq!(departments.open().await.len(), 4);
        assert!(departments.is_ready().await);
        assert_eq!(slots.read(Department::SLOT).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn search_is_case_insensitive_across_text_fields() -> anyhow::Result<()> {
        let slots = Arc::new(MemorySlots::new());
        let users = store::<User>(&slots);
        users.open().await;
        users
            .create(NewUser { name: "Dana".into(), email: "dana@larch.example".into(), role: "Contributor".into(), photo: None })
            .await?;

        let hits = users.list_matching("LARCH").await?;
        assert_eq!(hits.len(), 1);
        assert_eq!(users.list_matching("viewer").await?[0].name, "Charlie Brown");
        assert_eq!(users.list_matching("").await?.len(), 4);
        assert!(users.list_matching("zzz").await?.is_empty());

        let admins = users.list_by(|u| u.role == Role::Administrator).await?;
        assert_eq!(admins.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn slots_are_independent() -> anyhow::Result<()> {
        let slots = Arc::new(MemorySlots::new());
        let services = store::<Service>(&slots);
        let departments = store::<Department>(&slots);
        services.open().await;
        departments.open().await;
        departments.delete("1").await?;
        assert_eq!(services.list().await?.len(), 6);
        assert_eq!(slots.len().await, 2);
        Ok(())
    }
}
