//! HTTP client for the TeleUP VOD endpoint.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use tracing::{debug, warn};

use crate::config::RegistryConfig;

use super::types::AssetPage;
use super::{Asset, AssetRegistry, AssetStatus, RegistryError, StatusUpdate};

/// Registry client authenticating with the shared secret.
pub struct TeleupRegistry {
    client: Client,
    endpoint: Url,
    secret: String,
}

impl TeleupRegistry {
    /// Create a new registry client.
    pub fn new(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let endpoint = Url::parse(&config.url).map_err(|e| {
            RegistryError::InvalidUrl(format!("registry url {}: {}", config.url, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            secret: config.secret.clone(),
        })
    }

    /// Secret as username, empty password.
    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.secret, Some(""))
    }

    async fn fetch_page(&self, request: RequestBuilder) -> Result<AssetPage, RegistryError> {
        let response = self.authed(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        response.json().await.map_err(|e| {
            RegistryError::ParseError(format!("Failed to parse asset list: {}", e))
        })
    }
}

#[async_trait]
impl AssetRegistry for TeleupRegistry {
    async fn list_assets(
        &self,
        status: AssetStatus,
        page_limit: u32,
    ) -> Result<Vec<Asset>, RegistryError> {
        debug!(status = %status, limit = page_limit, "Listing registry assets");

        let mut first = self.endpoint.clone();
        first
            .query_pairs_mut()
            .append_pair("status", &status.code().to_string())
            .append_pair("limit", &page_limit.to_string());

        let mut page = self.fetch_page(self.client.get(first.clone())).await?;
        let mut assets = page.take_assets();
        let mut visited = HashSet::from([first]);

        while let Some(next) = page.next_link() {
            let url = self
                .endpoint
                .join(next)
                .map_err(|e| RegistryError::InvalidUrl(format!("{}: {}", next, e)))?;
            if !visited.insert(url.clone()) {
                return Err(RegistryError::InvalidUrl(format!(
                    "paging loops back to {}",
                    url
                )));
            }

            debug!(url = %url, "Following registry paging link");
            page = self.fetch_page(self.client.get(url)).await?;
            assets.append(&mut page.take_assets());
        }

        debug!(status = %status, count = assets.len(), "Registry listing complete");
        Ok(assets)
    }

    async fn update_asset_status(&self, update: &StatusUpdate) -> Result<(), RegistryError> {
        debug!(
            id = %update.id,
            status = %update.status,
            "Updating registry asset status"
        );

        let response = self
            .authed(self.client.patch(self.endpoint.clone()))
            .json(&[update])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(id = %update.id, status = status.as_u16(), "Registry rejected status update");
            return Err(RegistryError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(())
    }
}
