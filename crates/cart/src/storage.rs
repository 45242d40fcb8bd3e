pub mod file;
pub mod memory;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::CoreResult;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Asynchronous key-value store holding serialized records.
///
/// Each key maps to one value that is written and read as a whole.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn read(&self, key: &str) -> CoreResult<Option<String>>;
    async fn write(&self, key: &str, value: &str) -> CoreResult<()>;
}

pub type SharedStorage = Arc<dyn Storage>;
