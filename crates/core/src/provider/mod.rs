//! Encoding provider abstraction.
//!
//! This module provides an `EncodingProvider` trait for submitting jobs and
//! polling their status, implemented for the Encoding.com JSON API.

mod encoding_com;
mod types;

pub use encoding_com::EncodingComClient;
pub use types::JobStatus;

use async_trait::async_trait;
use thiserror::Error;

use crate::job::JobSpec;

/// Errors that can occur during provider operations.
///
/// Transport failures (`Transport`, `Http`) are kept apart from errors the
/// provider reports inside a successful response (`Rejected`).
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection, timeout or other transport failure.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider answered with a non-success HTTP status.
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// Provider accepted the request but reported an error in the payload.
    #[error("Provider error: {0}")]
    Rejected(String),

    /// Response could not be understood.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Status was requested without a job id.
    #[error("Missing job id")]
    MissingJobId,
}

impl ProviderError {
    /// Whether the provider itself reported the error.
    pub fn is_provider_reported(&self) -> bool {
        matches!(self, ProviderError::Rejected(_))
    }

    /// Whether the request never got a usable HTTP answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, ProviderError::Transport(_) | ProviderError::Http { .. })
    }
}

/// Job submission and status polling.
#[async_trait]
pub trait EncodingProvider: Send + Sync {
    /// Submit a job, returning the provider's job id.
    async fn submit_job(&self, job: &JobSpec) -> Result<String, ProviderError>;

    /// Fetch the current status of a job.
    async fn get_job_status(&self, job_id: &str) -> Result<JobStatus, ProviderError>;
}
