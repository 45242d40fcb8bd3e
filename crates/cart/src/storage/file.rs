use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::{CoreError, CoreResult};
use crate::storage::Storage;

/// Stores each key as `<root>/<key>.json`.
#[derive(Clone, Debug)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn build_path(&self, key: &str) -> CoreResult<PathBuf> {
        validate_key(key)?;
        let mut filename = key.to_string();
        if !filename.ends_with(".json") {
            filename.push_str(".json");
        }
        Ok(self.root.join(filename))
    }

    async fn ensure_root_dir(&self) -> CoreResult<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|error| {
                CoreError::Storage(format!(
                    "failed to create storage directory {}: {error}",
                    self.root.display()
                ))
            })
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn read(&self, key: &str) -> CoreResult<Option<String>> {
        let path = self.build_path(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(CoreError::Storage(format!(
                "failed to read storage file {}: {error}",
                path.display()
            ))),
        }
    }

    async fn write(&self, key: &str, value: &str) -> CoreResult<()> {
        let path = self.build_path(key)?;
        self.ensure_root_dir().await?;

        // Write beside the target and rename so readers never see a partial record.
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, value)
            .await
            .map_err(|error| {
                CoreError::Storage(format!(
                    "failed to write storage file {}: {error}",
                    tmp_path.display()
                ))
            })?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|error| {
                CoreError::Storage(format!(
                    "failed to finalize storage file {}: {error}",
                    path.display()
                ))
            })?;
        tracing::debug!("wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

fn validate_key(key: &str) -> CoreResult<()> {
    if key.is_empty() || key == "." || key == ".." {
        return Err(CoreError::InvalidInput(format!("invalid storage key {key}")));
    }
    if key.contains('/') || key.contains('\\') {
        return Err(CoreError::InvalidInput(format!("invalid storage key {key}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn writes_and_reads_value() {
        let dir = tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path().join("nested"));
        storage
            .write("cart.products", r#"[{"id":"a"}]"#)
            .await
            .expect("write");
        let loaded = storage
            .read("cart.products")
            .await
            .expect("read")
            .expect("value");
        assert_eq!(loaded, r#"[{"id":"a"}]"#);
        assert!(dir.path().join("nested").join("cart.products.json").exists());
    }

    #[tokio::test]
    async fn missing_file_returns_none() {
        let dir = tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path().to_path_buf());
        let loaded = storage.read("missing").await.expect("read");
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn overwrite_leaves_no_temp_file() {
        let dir = tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path().to_path_buf());
        storage.write("cart", "[]").await.expect("first write");
        storage.write("cart", "[1]").await.expect("second write");
        assert_eq!(storage.read("cart").await.expect("read").as_deref(), Some("[1]"));
        assert!(!dir.path().join("cart.json.tmp").exists());
    }

    #[tokio::test]
    async fn invalid_key_rejected() {
        let dir = tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path().to_path_buf());
        let err = storage.write("../escape", "[]").await.expect_err("invalid key");
        match err {
            CoreError::InvalidInput(_) => {}
            _ => panic!("expected invalid input"),
        }
        let err = storage.read("..").await.expect_err("invalid key");
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }
}
