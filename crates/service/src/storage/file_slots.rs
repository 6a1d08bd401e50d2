use std::{io::ErrorKind, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tokio::{fs, sync::Mutex};
use tracing::debug;

use super::{check_quota, slot_footprint, validate_slot_name, SlotStore};
use crate::errors::ServiceError;

const SLOT_EXT: &str = "json";

/// Directory-backed slot area: each slot is `<dir>/<name>.json`.
///
/// Writes land in a temp file first and are renamed into place, so a failed
/// write never leaves a half-written slot behind.
pub struct FileSlots {
    dir: PathBuf,
    quota: usize,
    // 进程内串行化配额统计与写入
    write_lock: Mutex<()>,
}

impl FileSlots {
    /// Open (creating if needed) the slot directory.
    pub async fn new<P: Into<PathBuf>>(dir: P, quota: usize) -> Result<Arc<Self>, ServiceError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| ServiceError::Persistence(format!("cannot create {}: {e}", dir.display())))?;
        Ok(Arc::new(Self { dir, quota, write_lock: Mutex::new(()) }))
    }

    pub fn dir(&self) -> &std::path::Path { &self.dir }

    fn path_for(&self, name: &str) -> Result<PathBuf, ServiceError> {
        validate_slot_name(name)?;
        Ok(self.dir.join(format!("{name}.{SLOT_EXT}")))
    }

    /// Footprint of every stored slot except `skip`.
    async fn usage_excluding(&self, skip: &str) -> Result<usize, ServiceError> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| ServiceError::persistence(skip, e))?;
        let mut total = 0usize;
        while let Some(entry) = entries.next_entry().await.map_err(|e| ServiceError::persistence(skip, e))? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SLOT_EXT) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else { continue };
            if stem == skip {
                continue;
            }
            let len = entry.metadata().await.map(|m| m.len() as usize).unwrap_or(0);
            total += stem.len() + len;
        }
        Ok(total)
    }
}

#[async_trait]
impl SlotStore for FileSlots {
    async fn read(&self, name: &str) -> Result<Option<String>, ServiceError> {
        let path = self.path_for(name)?;
        match fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ServiceError::persistence(name, e)),
        }
    }

    async fn write(&self, name: &str, value: &str) -> Result<(), ServiceError> {
        let path = self.path_for(name)?;
        let _guard = self.write_lock.lock().await;
        let others = self.usage_excluding(name).await?;
        check_quota(others, name, value, self.quota)?;

        // 先写临时文件再重命名，失败时保留旧值
        let tmp = path.with_extension(format!("{SLOT_EXT}.tmp"));
        fs::write(&tmp, value.as_bytes()).await.map_err(|e| ServiceError::persistence(name, e))?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(ServiceError::persistence(name, e));
        }
        debug!(slot = name, bytes = slot_footprint(name, value), "slot_written");
        Ok(())
    }

    async fn erase(&self, name: &str) -> Result<(), ServiceError> {
        let path = self.path_for(name)?;
        let _guard = self.write_lock.lock().await;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ServiceError::persistence(name, e)),
        }
    }
}
