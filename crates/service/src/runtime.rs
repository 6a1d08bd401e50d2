//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` plus the slot area the binary runs on.

use std::{path::Path, sync::Arc};

use crate::errors::ServiceError;
use crate::storage::{FileSlots, SlotStore};

/// Ensure the slot directory exists and open it as the site's storage area.
pub async fn open_slot_area(data_dir: &Path, quota_bytes: usize) -> Result<Arc<dyn SlotStore>, ServiceError> {
    common::env::ensure_data_dir(data_dir)
        .await
        .map_err(|e| ServiceError::Persistence(e.to_string()))?;
    let slots: Arc<dyn SlotStore> = FileSlots::new(data_dir, quota_bytes).await?;
    Ok(slots)
}
