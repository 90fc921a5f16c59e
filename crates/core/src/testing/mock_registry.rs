//! Mock asset registry for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::registry::{Asset, AssetId, AssetRegistry, AssetStatus, RegistryError, StatusUpdate};

/// Mock implementation of the AssetRegistry trait.
///
/// Provides controllable behavior for testing:
/// - Serve a fixed set of assets, filtered by status
/// - Record every listing and update for assertions
/// - Apply successful updates, so a later cycle sees them
/// - Simulate failing listings and updates
///
/// # Example
///
/// ```rust,ignore
/// let registry = MockRegistry::new();
/// registry.add_asset(fixtures::active_asset(1, "J1")).await;
///
/// // ... run a cycle ...
///
/// let updates = registry.updates().await;
/// assert_eq!(updates.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockRegistry {
    assets: Arc<RwLock<Vec<Asset>>>,
    listings: Arc<RwLock<Vec<AssetStatus>>>,
    updates: Arc<RwLock<Vec<StatusUpdate>>>,
    failing_listings: Arc<RwLock<HashSet<AssetStatus>>>,
    failing_updates: Arc<RwLock<HashSet<AssetId>>>,
}

impl MockRegistry {
    /// Create a new empty mock registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset.
    pub async fn add_asset(&self, asset: Asset) {
        self.assets.write().await.push(asset);
    }

    /// Replace all assets.
    pub async fn set_assets(&self, assets: Vec<Asset>) {
        *self.assets.write().await = assets;
    }

    /// Current state of an asset.
    pub async fn asset(&self, id: &AssetId) -> Option<Asset> {
        self.assets
            .read()
            .await
            .iter()
            .find(|a| &a.id == id)
            .cloned()
    }

    /// Make listings of `status` fail.
    pub async fn fail_listing(&self, status: AssetStatus) {
        self.failing_listings.write().await.insert(status);
    }

    /// Make updates of asset `id` fail.
    pub async fn fail_updates_for(&self, id: AssetId) {
        self.failing_updates.write().await.insert(id);
    }

    /// Statuses listed so far, in call order.
    pub async fn listings(&self) -> Vec<AssetStatus> {
        self.listings.read().await.clone()
    }

    /// Updates received so far (including rejected ones), in call order.
    pub async fn updates(&self) -> Vec<StatusUpdate> {
        self.updates.read().await.clone()
    }

    /// Updates received for one asset.
    pub async fn updates_for(&self, id: &AssetId) -> Vec<StatusUpdate> {
        self.updates
            .read()
            .await
            .iter()
            .filter(|u| &u.id == id)
            .cloned()
            .collect()
    }

    /// Forget recorded listings and updates.
    pub async fn clear_recorded(&self) {
        self.listings.write().await.clear();
        self.updates.write().await.clear();
    }
}

#[async_trait]
impl AssetRegistry for MockRegistry {
    async fn list_assets(
        &self,
        status: AssetStatus,
        _page_limit: u32,
    ) -> Result<Vec<Asset>, RegistryError> {
        self.listings.write().await.push(status);

        if self.failing_listings.read().await.contains(&status) {
            return Err(RegistryError::ApiError {
                status: 503,
                message: "mock listing failure".to_string(),
            });
        }

        Ok(self
            .assets
            .read()
            .await
            .iter()
            .filter(|a| a.status == Some(status))
            .cloned()
            .collect())
    }

    async fn update_asset_status(&self, update: &StatusUpdate) -> Result<(), RegistryError> {
        self.updates.write().await.push(update.clone());

        if self.failing_updates.read().await.contains(&update.id) {
            return Err(RegistryError::ApiError {
                status: 500,
                message: "mock update failure".to_string(),
            });
        }

        let mut assets = self.assets.write().await;
        if let Some(asset) = assets.iter_mut().find(|a| a.id == update.id) {
            asset.status = Some(update.status);
            if let Some(job_id) = &update.encode_job_id {
                asset.encode_job_id = Some(job_id.clone());
            }
        }
        Ok(())
    }
}
