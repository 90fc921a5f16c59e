//! Encoding.com API client.
//!
//! Every call is a form POST with a single `json` field holding a
//! `{"query": ...}` document. Errors come back with HTTP 200 and an
//! `errors` entry in the response.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::job::JobSpec;

use super::types::{AddMediaQuery, GetStatusQuery, ProviderResponse, QueryEnvelope, ResponseEnvelope};
use super::{EncodingProvider, JobStatus, ProviderError};

/// Encoding.com client implementation.
pub struct EncodingComClient {
    client: Client,
    config: ProviderConfig,
}

impl EncodingComClient {
    /// Create a new Encoding.com client.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self { client, config })
    }

    /// Send one query and return the unwrapped response.
    async fn query<Q: Serialize + Sync>(&self, query: &Q) -> Result<ProviderResponse, ProviderError> {
        let payload = serde_json::to_string(&QueryEnvelope { query })
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to encode query: {}", e)))?;

        let response = self
            .client
            .post(&self.config.url)
            .form(&[("json", payload)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message: body,
            });
        }

        let envelope: ResponseEnvelope = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse provider response: {}", e))
        })?;
        let response = envelope.response;

        if let Some(message) = response.error_message() {
            return Err(ProviderError::Rejected(message));
        }

        Ok(response)
    }
}

#[async_trait]
impl EncodingProvider for EncodingComClient {
    async fn submit_job(&self, job: &JobSpec) -> Result<String, ProviderError> {
        debug!(source = %job.source, tier = job.tier.as_str(), "Submitting encoding job");

        let query = AddMediaQuery::new(&self.config.user_id, &self.config.user_key, job);
        let response = self.query(&query).await.inspect_err(|e| {
            warn!(source = %job.source, "Failed sending encoding job: {}", e);
        })?;

        response.media_id.ok_or_else(|| {
            ProviderError::InvalidResponse("AddMedia response has no MediaID".to_string())
        })
    }

    async fn get_job_status(&self, job_id: &str) -> Result<JobStatus, ProviderError> {
        if job_id.trim().is_empty() {
            return Err(ProviderError::MissingJobId);
        }

        debug!(job_id, "Fetching encoding job status");

        let query = GetStatusQuery {
            userid: &self.config.user_id,
            userkey: &self.config.user_key,
            action: "GetStatus",
            mediaid: job_id,
        };
        let response = self.query(&query).await.inspect_err(|e| {
            warn!(job_id, "Retrieving encoding job status failed: {}", e);
        })?;

        let status = response.into_job_status();
        debug!(
            job_id,
            status = %status.status_text,
            progress = status.progress,
            created = ?status.created,
            started = ?status.started,
            "Encoding job status"
        );
        Ok(status)
    }
}
