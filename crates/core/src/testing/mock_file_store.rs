//! Mock remote file store for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::cleanup::{CleanupError, DeleteResult, RemoteFileStore};

/// In-memory remote directory.
#[derive(Debug, Default)]
pub struct MockFileStore {
    files: Arc<RwLock<Vec<String>>>,
    deleted: Arc<RwLock<Vec<String>>>,
    failing_deletes: Arc<RwLock<HashSet<String>>>,
    fail_listing: Arc<RwLock<bool>>,
}

impl MockFileStore {
    /// Create a store holding `files`.
    pub fn with_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: Arc::new(RwLock::new(files.into_iter().map(Into::into).collect())),
            ..Default::default()
        }
    }

    /// Files still present.
    pub async fn files(&self) -> Vec<String> {
        self.files.read().await.clone()
    }

    /// Files deleted so far.
    pub async fn deleted(&self) -> Vec<String> {
        self.deleted.read().await.clone()
    }

    /// Make deleting `name` fail.
    pub async fn fail_delete(&self, name: &str) {
        self.failing_deletes.write().await.insert(name.to_string());
    }

    /// Make listing fail.
    pub async fn fail_listing(&self) {
        *self.fail_listing.write().await = true;
    }
}

#[async_trait]
impl RemoteFileStore for MockFileStore {
    async fn list_files(&self) -> Result<Vec<String>, CleanupError> {
        if *self.fail_listing.read().await {
            return Err(CleanupError::Storage("mock listing failure".to_string()));
        }
        Ok(self.files.read().await.clone())
    }

    async fn delete_files(&self, names: &[String]) -> Result<Vec<DeleteResult>, CleanupError> {
        let failing = self.failing_deletes.read().await.clone();
        let mut files = self.files.write().await;
        let mut deleted = self.deleted.write().await;

        Ok(names
            .iter()
            .map(|name| {
                let error = if failing.contains(name) {
                    Some("550 Permission denied".to_string())
                } else if let Some(pos) = files.iter().position(|f| f == name) {
                    files.remove(pos);
                    deleted.push(name.clone());
                    None
                } else {
                    Some("550 File not found".to_string())
                };
                DeleteResult {
                    name: name.clone(),
                    error,
                }
            })
            .collect())
    }
}
