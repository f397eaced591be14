// src/storage/memory.rs

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;

use super::LocalStorage;
use crate::error::AppError;

/// In-process storage, used by tests and ephemeral runs.
///
/// Writes can be switched off with [`MemoryStorage::fail_writes`] to exercise
/// the storage error paths.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail (or succeed again with `false`).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn items(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, AppError> {
        self.items
            .lock()
            .map_err(|e| AppError::StorageError(e.to_string()))
    }

    fn check_writable(&self) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::StorageError("storage is read-only".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LocalStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.items()?.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.check_writable()?;
        self.items()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn set_items(&self, items: &[(&str, String)]) -> Result<(), AppError> {
        self.check_writable()?;
        let mut map = self.items()?;
        for (key, value) in items {
            map.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), AppError> {
        self.check_writable()?;
        self.items()?.remove(key);
        Ok(())
    }
}
