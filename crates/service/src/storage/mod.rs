//! Slot storage: named, string-valued, durable locations shared by every
//! consumer of one storage area.
//!
//! `FileSlots` keeps one JSON file per slot under a directory; `MemorySlots`
//! keeps them in a map and is what tests inject. Both enforce one byte quota
//! shared across all slots.

use async_trait::async_trait;

use crate::errors::ServiceError;

pub mod file_slots;
pub mod memory_slots;

pub use file_slots::FileSlots;
pub use memory_slots::MemorySlots;

/// Default capacity of a storage area, shared by all of its slots.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Raw access to named slots. Implementations can be file-backed, in-memory, or remote.
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Current value of the slot, `None` when it was never written or was erased.
    async fn read(&self, name: &str) -> Result<Option<String>, ServiceError>;
    /// Replace the slot's value. On failure the previous value is kept.
    async fn write(&self, name: &str, value: &str) -> Result<(), ServiceError>;
    /// Remove the slot; erasing an absent slot succeeds.
    async fn erase(&self, name: &str) -> Result<(), ServiceError>;
}

/// Slot names map onto file names, so keep them to a safe alphabet.
pub fn validate_slot_name(name: &str) -> Result<(), ServiceError> {
    let ok = !name.is_empty()
        && !name.starts_with('.')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if ok { Ok(()) } else { Err(ServiceError::persistence(name, "invalid slot name")) }
}

/// Bytes a slot occupies against the quota.
pub(crate) fn slot_footprint(name: &str, value: &str) -> usize { name.len() + value.len() }

/// Fail when writing `value` into `name` would push the area past `quota`.
/// `others` is the footprint of every other slot.
pub(crate) fn check_quota(others: usize, name: &str, value: &str, quota: usize) -> Result<(), ServiceError> {
    let needed = others + slot_footprint(name, value);
    if needed > quota {
        return Err(ServiceError::persistence(name, format!("quota exceeded ({needed} > {quota} bytes)")));
    }
    Ok(())
}
