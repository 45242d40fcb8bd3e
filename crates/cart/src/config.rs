use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};
use crate::storage::FileStorage;

pub const CART_CONFIG_FILENAME: &str = "cart.json";
pub const CART_CONFIG_VERSION: &str = "1.0.0";

/// Key under which the cart snapshot has always been persisted.
pub const DEFAULT_STORAGE_KEY: &str = "@GoBarber:products";
pub const DEFAULT_STORAGE_DIR: &str = "storage";
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartConfig {
    pub version: String,
    pub storage_key: String,
    /// Relative paths resolve against the directory holding `cart.json`.
    pub storage_dir: PathBuf,
    pub event_capacity: usize,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            version: CART_CONFIG_VERSION.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl CartConfig {
    pub fn resolve_storage_dir(&self, base: &Path) -> PathBuf {
        if self.storage_dir.is_absolute() {
            self.storage_dir.clone()
        } else {
            base.join(&self.storage_dir)
        }
    }

    pub fn file_storage(&self, base: &Path) -> FileStorage {
        FileStorage::new(self.resolve_storage_dir(base))
    }
}

pub fn load_or_create_cart_config(dir: &Path) -> CoreResult<CartConfig> {
    std::fs::create_dir_all(dir).map_err(|error| {
        CoreError::Storage(format!(
            "failed to create config directory {}: {error}",
            dir.display()
        ))
    })?;

    let path = cart_config_path(dir);
    if !path.exists() {
        let config = CartConfig::default();
        write_cart_config(&path, &config)?;
        tracing::debug!("created default cart config at {}", path.display());
        return Ok(config);
    }

    let data = std::fs::read_to_string(&path).map_err(|error| {
        CoreError::Storage(format!(
            "failed to read cart config {}: {error}",
            path.display()
        ))
    })?;
    let config: CartConfig = serde_json::from_str(&data).map_err(|error| {
        CoreError::Deserialization(format!(
            "failed to parse cart config {}: {error}",
            path.display()
        ))
    })?;

    if config.version != CART_CONFIG_VERSION {
        return Err(CoreError::InvalidInput(format!(
            "unsupported cart config version {}",
            config.version
        )));
    }
    if config.event_capacity == 0 {
        return Err(CoreError::InvalidInput(
            "event_capacity must be greater than zero".to_string(),
        ));
    }

    Ok(config)
}

pub fn cart_config_path(dir: &Path) -> PathBuf {
    dir.join(CART_CONFIG_FILENAME)
}

fn write_cart_config(path: &Path, config: &CartConfig) -> CoreResult<()> {
    let data = serde_json::to_string_pretty(config).map_err(|error| {
        CoreError::Internal(format!(
            "failed to serialize cart config {}: {error}",
            path.display()
        ))
    })?;
    std::fs::write(path, data).map_err(|error| {
        CoreError::Storage(format!(
            "failed to write cart config {}: {error}",
            path.display()
        ))
    })?;
    Ok(())
}
