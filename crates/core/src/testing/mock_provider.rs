//! Mock encoding provider for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::job::JobSpec;
use crate::provider::{EncodingProvider, JobStatus, ProviderError};

/// How a mocked status query should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// HTTP-level failure.
    Http,
    /// Error reported inside a successful response.
    Rejected,
}

impl MockFailure {
    fn to_error(self) -> ProviderError {
        match self {
            MockFailure::Http => ProviderError::Http {
                status: 502,
                message: "mock gateway error".to_string(),
            },
            MockFailure::Rejected => ProviderError::Rejected("mock provider error".to_string()),
        }
    }
}

/// Mock implementation of the EncodingProvider trait.
///
/// Provides controllable behavior for testing:
/// - Report configured job statuses
/// - Hand out sequential job ids for submissions
/// - Record submissions and status queries for assertions
/// - Simulate failures per job or for the next submission
#[derive(Debug, Default)]
pub struct MockProvider {
    statuses: Arc<RwLock<HashMap<String, JobStatus>>>,
    status_failures: Arc<RwLock<HashMap<String, MockFailure>>>,
    submissions: Arc<RwLock<Vec<JobSpec>>>,
    status_queries: Arc<RwLock<Vec<String>>>,
    /// Failure for the next submission.
    next_submit_failure: Arc<RwLock<Option<MockFailure>>>,
    /// Sources whose submissions always fail.
    failing_sources: Arc<RwLock<HashMap<String, MockFailure>>>,
    job_counter: Arc<RwLock<u32>>,
}

impl MockProvider {
    /// Create a new mock provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the status reported for a job.
    pub async fn set_status(&self, job_id: &str, status: JobStatus) {
        self.statuses.write().await.insert(job_id.to_string(), status);
    }

    /// Make status queries for a job fail.
    pub async fn fail_status_for(&self, job_id: &str, failure: MockFailure) {
        self.status_failures
            .write()
            .await
            .insert(job_id.to_string(), failure);
    }

    /// Make the next submission fail.
    pub async fn fail_next_submission(&self, failure: MockFailure) {
        *self.next_submit_failure.write().await = Some(failure);
    }

    /// Make every submission whose source ends with `file` fail.
    pub async fn fail_submissions_for(&self, file: &str, failure: MockFailure) {
        self.failing_sources
            .write()
            .await
            .insert(file.to_string(), failure);
    }

    /// Jobs submitted so far, in call order (including failed ones).
    pub async fn submissions(&self) -> Vec<JobSpec> {
        self.submissions.read().await.clone()
    }

    /// Job ids queried so far, in call order.
    pub async fn status_queries(&self) -> Vec<String> {
        self.status_queries.read().await.clone()
    }

    async fn submission_failure(&self, job: &JobSpec) -> Option<MockFailure> {
        if let Some(failure) = self.next_submit_failure.write().await.take() {
            return Some(failure);
        }
        self.failing_sources
            .read()
            .await
            .iter()
            .find(|(file, _)| job.source.ends_with(file.as_str()))
            .map(|(_, failure)| *failure)
    }
}

#[async_trait]
impl EncodingProvider for MockProvider {
    async fn submit_job(&self, job: &JobSpec) -> Result<String, ProviderError> {
        self.submissions.write().await.push(job.clone());

        if let Some(failure) = self.submission_failure(job).await {
            return Err(failure.to_error());
        }

        let mut counter = self.job_counter.write().await;
        *counter += 1;
        let job_id = format!("mockjob{:04}", *counter);

        self.statuses
            .write()
            .await
            .insert(job_id.clone(), JobStatus::new("New", 0.0));
        Ok(job_id)
    }

    async fn get_job_status(&self, job_id: &str) -> Result<JobStatus, ProviderError> {
        if job_id.trim().is_empty() {
            return Err(ProviderError::MissingJobId);
        }
        self.status_queries.write().await.push(job_id.to_string());

        if let Some(failure) = self.status_failures.read().await.get(job_id) {
            return Err(failure.to_error());
        }

        self.statuses
            .read()
            .await
            .get(job_id)
            .cloned()
            .ok_or_else(|| ProviderError::Rejected(format!("Media {} not found", job_id)))
    }
}
