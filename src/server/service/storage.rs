//! Object storage for uploaded image bytes.

use async_trait::async_trait;
use axum::body::Bytes;
use std::path::{Path, PathBuf};

use crate::server::error::{storage::StorageError, AppError};

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), AppError>;

    async fn get(&self, key: &str) -> Result<Bytes, AppError>;

    /// Removes an object. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

/// Validates a storage key: slash-separated segments of `[A-Za-z0-9._-]`, no `.`
/// or `..` segments and no leading slash.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key.split('/').all(|segment| {
            !segment.is_empty()
                && segment != "."
                && segment != ".."
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        });

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// Stores objects as files below a root directory.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Creates the root directory if it does not exist yet.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self, AppError> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(StorageError::from)?;

        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn put(&self, key: &str, bytes: Bytes, _content_type: &str) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(StorageError::from)?;
        }

        tokio::fs::write(&path, &bytes)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, AppError> {
        let path = self.path_for(key)?;

        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()).into())
            }
            Err(e) => Err(StorageError::from(e).into()),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let path = self.path_for(key)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from(e).into()),
        }
    }
}

/// In-memory object store.
#[cfg(test)]
#[derive(Default, Clone)]
pub struct MemoryStore {
    objects: std::sync::Arc<std::sync::Mutex<std::collections::HashMap<String, Bytes>>>,
    failing: std::sync::Arc<std::sync::atomic::AtomicBool>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Makes deletes fail until switched back.
    pub fn set_failing(&self, fail: bool) {
        self.failing
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, key: &str, bytes: Bytes, _content_type: &str) -> Result<(), AppError> {
        validate_key(key)?;
        self.objects.lock().unwrap().insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, AppError> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()).into())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        if self.failing.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other("store unavailable")).into());
        }
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}
