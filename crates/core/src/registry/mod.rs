//! Asset registry abstraction.
//!
//! The registry (TeleUP's VOD endpoint) is the single source of truth for
//! asset status. This module provides the `AssetRegistry` trait and its HTTP
//! implementation.

mod teleup;
mod types;

pub use teleup::TeleupRegistry;
pub use types::{Asset, AssetId, AssetStatus, StatusUpdate};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Connection, timeout or other transport failure.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Registry answered with a non-success status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Endpoint or paging link could not be resolved, or paging loops back.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Read and update access to registry assets.
#[async_trait]
pub trait AssetRegistry: Send + Sync {
    /// List every asset with the given status, following paging links.
    async fn list_assets(
        &self,
        status: AssetStatus,
        page_limit: u32,
    ) -> Result<Vec<Asset>, RegistryError>;

    /// Push a status change for one asset.
    async fn update_asset_status(&self, update: &StatusUpdate) -> Result<(), RegistryError>;
}
