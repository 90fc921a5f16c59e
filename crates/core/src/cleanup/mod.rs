//! Removal of remote files for assets that are done.
//!
//! Files are matched by an asset's name prefix (the first two `_`-separated
//! parts of its movie file), which covers the source and every rendition.
//! Only SUCCESS and REJECT assets are cleaned unless forced.

mod ftp;

pub use ftp::FtpFileStore;

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::registry::{AssetRegistry, AssetStatus, RegistryError};

/// Errors that can occur during cleanup.
#[derive(Debug, Error)]
pub enum CleanupError {
    /// Cleaning this status needs `force`.
    #[error("refusing to delete files for {0} assets without force")]
    NotAllowed(AssetStatus),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("remote storage error: {0}")]
    Storage(String),

    #[error("invalid storage URL: {0}")]
    InvalidUrl(String),
}

/// Outcome of deleting one remote file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    pub name: String,
    pub error: Option<String>,
}

/// Remote directory holding source and rendition files.
#[async_trait]
pub trait RemoteFileStore: Send + Sync {
    /// Names of all files in the directory.
    async fn list_files(&self) -> Result<Vec<String>, CleanupError>;

    /// Delete the given files, reporting each one.
    async fn delete_files(&self, names: &[String]) -> Result<Vec<DeleteResult>, CleanupError>;
}

/// Summary of one cleanup pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanupReport {
    pub assets: usize,
    pub matched: Vec<String>,
    pub deleted: usize,
    pub failed: usize,
}

/// Statuses that can be cleaned without force.
pub const CLEANABLE_STATUSES: [AssetStatus; 2] = [AssetStatus::Success, AssetStatus::Reject];

/// Prefix shared by all files of an asset.
pub fn asset_prefix(movie_file: &str) -> String {
    movie_file.split('_').take(2).collect::<Vec<_>>().join("_")
}

/// Remote files belonging to any of the given prefixes, sorted and unique.
pub fn match_files(prefixes: &[String], files: &[String]) -> Vec<String> {
    files
        .iter()
        .filter(|file| {
            prefixes
                .iter()
                .any(|prefix| !prefix.is_empty() && file.contains(prefix.as_str()))
        })
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Deletes remote files of assets in a given status.
pub struct Cleaner {
    registry: Arc<dyn AssetRegistry>,
    store: Arc<dyn RemoteFileStore>,
    page_limit: u32,
    dry_run: bool,
}

impl Cleaner {
    pub fn new(
        registry: Arc<dyn AssetRegistry>,
        store: Arc<dyn RemoteFileStore>,
        page_limit: u32,
        dry_run: bool,
    ) -> Self {
        Self {
            registry,
            store,
            page_limit,
            dry_run,
        }
    }

    /// Delete files of every asset with `status`.
    pub async fn clean(
        &self,
        status: AssetStatus,
        force: bool,
    ) -> Result<CleanupReport, CleanupError> {
        if !force && !CLEANABLE_STATUSES.contains(&status) {
            warn!(
                status = %status,
                "Only SUCCESS or REJECT assets are cleaned without force"
            );
            return Err(CleanupError::NotAllowed(status));
        }

        info!(status = %status, "Cleaning files for assets");

        let assets = self.registry.list_assets(status, self.page_limit).await?;
        let prefixes: Vec<String> = assets
            .iter()
            .map(|a| asset_prefix(&a.movie_file))
            .filter(|p| !p.is_empty())
            .collect();

        let mut report = CleanupReport {
            assets: assets.len(),
            ..Default::default()
        };
        if prefixes.is_empty() {
            return Ok(report);
        }

        let files = self.store.list_files().await?;
        report.matched = match_files(&prefixes, &files);

        if self.dry_run {
            for name in &report.matched {
                info!("Would delete: {}", name);
            }
            return Ok(report);
        }
        if report.matched.is_empty() {
            return Ok(report);
        }

        for name in &report.matched {
            info!("Deleting: {}", name);
        }
        for result in self.store.delete_files(&report.matched).await? {
            match result.error {
                None => report.deleted += 1,
                Some(e) => {
                    warn!(file = %result.name, "Delete failed: {}", e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}
