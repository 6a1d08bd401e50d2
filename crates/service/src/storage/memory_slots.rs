use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{check_quota, slot_footprint, validate_slot_name, SlotStore, DEFAULT_QUOTA_BYTES};
use crate::errors::ServiceError;

/// In-memory slot area for tests and ephemeral sites.
///
/// `set_writable(false)` makes every write and erase fail, like a storage
/// area disabled by the browser.
pub struct MemorySlots {
    inner: RwLock<HashMap<String, String>>,
    quota: usize,
    writable: AtomicBool,
}

impl Default for MemorySlots {
    fn default() -> Self { Self::with_quota(DEFAULT_QUOTA_BYTES) }
}

impl MemorySlots {
    pub fn new() -> Self { Self::default() }

    pub fn with_quota(quota: usize) -> Self {
        Self { inner: RwLock::new(HashMap::new()), quota, writable: AtomicBool::new(true) }
    }

    pub fn set_writable(&self, writable: bool) { self.writable.store(writable, Ordering::SeqCst); }

    fn ensure_writable(&self, name: &str) -> Result<(), ServiceError> {
        if self.writable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ServiceError::persistence(name, "storage is disabled"))
        }
    }

    /// Number of slots currently holding a value.
    pub async fn len(&self) -> usize { self.inner.read().await.len() }

    pub async fn is_empty(&self) -> bool { self.inner.read().await.is_empty() }
}

#[async_trait]
impl SlotStore for MemorySlots {
    async fn read(&self, name: &str) -> Result<Option<String>, ServiceError> {
        validate_slot_name(name)?;
        Ok(self.inner.read().await.get(name).cloned())
    }

    async fn write(&self, name: &str, value: &str) -> Result<(), ServiceError> {
        validate_slot_name(name)?;
        self.ensure_writable(name)?;
        let mut map = self.inner.write().await;
        let others: usize = map
            .iter()
            .filter(|(k, _)| k.as_str() != name)
            .map(|(k, v)| slot_footprint(k, v))
            .sum();
        check_quota(others, name, value, self.quota)?;
        map.insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn erase(&self, name: &str) -> Result<(), ServiceError> {
        validate_slot_name(name)?;
        self.ensure_writable(name)?;
        self.inner.write().await.remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_slots_basic_crud() -> Result<(), anyhow::Error> {
        let slots = MemorySlots::new();
        assert!(slots.is_empty().await);

        slots.write("one", "1").await?;
        slots.write("two", "2").await?;
        assert_eq!(slots.len().await, 2);
        assert_eq!(slots.read("one").await?.as_deref(), Some("1"));

        slots.erase("one").await?;
        assert_eq!(slots.read("one").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn disabled_storage_fails_writes_but_still_reads() -> Result<(), anyhow::Error> {
        let slots = MemorySlots::new();
        slots.write("kept", "v1").await?;
        slots.set_writable(false);

        assert!(matches!(slots.write("kept", "v2").await, Err(ServiceError::Persistence(_))));
        assert!(slots.erase("kept").await.is_err());
        assert_eq!(slots.read("kept").await?.as_deref(), Some("v1"));

        slots.set_writable(true);
        slots.write("kept", "v2").await?;
        Ok(())
    }

    #[tokio::test]
    async fn quota_exceeded_keeps_previous_value() -> Result<(), anyhow::Error> {
        let slots = MemorySlots::with_quota(10);
        slots.write("k", "12345").await?;
        assert!(slots.write("k", "1234567890").await.is_err());
        assert_eq!(slots.read("k").await?.as_deref(), Some("12345"));
        Ok(())
    }
}
