//! Object storage for uploaded media.
//!
//! [`StorageService`] is a thin pass-through over an [`ObjectStore`] backend. Production uses
//! [`LocalStorage`] rooted at the configured media directory, tests use [`MemoryStorage`].

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::server::error::media::MediaError;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), MediaError>;
    async fn get(&self, key: &str) -> Result<Vec<u8>, MediaError>;
    /// Deleting a missing object is not an error
    async fn delete(&self, key: &str) -> Result<(), MediaError>;
}

#[async_trait]
impl<T: ObjectStore + ?Sized> ObjectStore for Arc<T> {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), MediaError> {
        (**self).put(key, bytes).await
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, MediaError> {
        (**self).get(key).await
    }

    async fn delete(&self, key: &str) -> Result<(), MediaError> {
        (**self).delete(key).await
    }
}

#[derive(Clone)]
pub struct StorageService {
    backend: Arc<dyn ObjectStore>,
}

impl StorageService {
    pub fn new(backend: impl ObjectStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Storage backed by memory, contents are lost when the last clone is dropped
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::default())
    }

    pub async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), MediaError> {
        validate_key(key)?;
        self.backend.put(key, bytes).await
    }

    pub async fn get(&self, key: &str) -> Result<Vec<u8>, MediaError> {
        validate_key(key)?;
        self.backend.get(key).await
    }

    pub async fn delete(&self, key: &str) -> Result<(), MediaError> {
        validate_key(key)?;
        self.backend.delete(key).await
    }

    /// Deletes every key, logging failures instead of returning them.
    ///
    /// Used to clean up objects written by an operation that failed afterwards.
    pub async fn delete_all(&self, keys: &[String]) {
        for key in keys {
            if let Err(e) = self.delete(key).await {
                tracing::warn!("Failed to delete orphaned object {:?}: {}", key, e);
            }
        }
    }
}

/// Keys are relative `/`-separated paths without `.` or `..` segments
fn validate_key(key: &str) -> Result<(), MediaError> {
    let valid = !key.contains('\\')
        && key
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..");

    if valid {
        Ok(())
    } else {
        Err(MediaError::InvalidKey(key.to_string()))
    }
}

/// Stores objects as files below a root directory
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Creates the root directory if it does not exist yet
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, MediaError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;

        Ok(Self { root })
    }
}

#[async_trait]
impl ObjectStore for LocalStorage {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), MediaError> {
        let path = self.root.join(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(path, bytes).await?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, MediaError> {
        match tokio::fs::read(self.root.join(key)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(MediaError::ObjectNotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), MediaError> {
        match tokio::fs::remove_file(self.root.join(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    /// Number of objects currently stored
    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl ObjectStore for MemoryStorage {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), MediaError> {
        self.objects.write().await.insert(key.to_string(), bytes);

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, MediaError> {
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| MediaError::ObjectNotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), MediaError> {
        self.objects.write().await.remove(key);

        Ok(())
    }
}
