//! In-process key-value store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{CoreError, CoreResult};
use crate::storage::Storage;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record, as if a previous process had written it.
    pub fn with_record(key: &str, value: impl Into<String>) -> Self {
        let storage = Self::default();
        if let Ok(mut data) = storage.data.lock() {
            data.insert(key.to_string(), value.into());
        }
        storage
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read(&self, key: &str) -> CoreResult<Option<String>> {
        let data = self
            .data
            .lock()
            .map_err(|_| CoreError::Storage("memory storage lock poisoned".to_string()))?;
        Ok(data.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> CoreResult<()> {
        let mut data = self
            .data
            .lock()
            .map_err(|_| CoreError::Storage("memory storage lock poisoned".to_string()))?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
