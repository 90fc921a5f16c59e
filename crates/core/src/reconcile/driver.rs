//! Reconciliation driver.
//!
//! One cycle has two phases, always in this order:
//! - **Active**: poll the provider for every ACTIVE asset and write the
//!   mapped status back.
//! - **Pending**: submit a job for every TODO asset and mark it ACTIVE.
//!
//! Refreshing in-flight jobs first keeps the registry current before more
//! work is added. Every decision is derived from what the registry and the
//! provider report right now; nothing is carried between cycles.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::job::{JobBuilder, QualityTier};
use crate::provider::EncodingProvider;
use crate::registry::{Asset, AssetRegistry, AssetStatus, StatusUpdate};

use super::status::{assess, Assessment};
use super::types::{ActiveOutcome, CycleReport, PendingOutcome, ReconcileOptions};

/// Drives assets through TODO -> ACTIVE -> SUCCESS/FAIL.
pub struct Reconciler {
    registry: Arc<dyn AssetRegistry>,
    provider: Arc<dyn EncodingProvider>,
    jobs: JobBuilder,
    options: ReconcileOptions,
}

impl Reconciler {
    /// Create a new reconciler.
    pub fn new(
        registry: Arc<dyn AssetRegistry>,
        provider: Arc<dyn EncodingProvider>,
        jobs: JobBuilder,
        options: ReconcileOptions,
    ) -> Self {
        Self {
            registry,
            provider,
            jobs,
            options,
        }
    }

    /// Run one full cycle.
    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::new(self.options.dry_run);
        if self.options.dry_run {
            info!("Dry run: no registry updates or job submissions will be made");
        }

        self.check_active(&mut report).await;

        if self.options.status_only {
            info!("Only updating active status, skipping adding new jobs");
        } else {
            report.pending_phase_ran = true;
            self.submit_pending(&mut report).await;
        }

        report.finished_at = Some(Utc::now());
        report
    }

    /// Refresh every ACTIVE asset from its provider job.
    pub async fn check_active(&self, report: &mut CycleReport) {
        let assets = match self
            .registry
            .list_assets(AssetStatus::Active, self.options.page_limit)
            .await
        {
            Ok(assets) => assets,
            Err(e) => {
                error!("Failed to list active assets, skipping status check: {}", e);
                report.active_list_failed = true;
                return;
            }
        };

        if assets.is_empty() {
            info!("No active jobs");
        }

        for asset in &assets {
            let outcome = self.reconcile_active(asset, report).await;
            report.record_active(&outcome);
        }
    }

    /// Reconcile one ACTIVE asset.
    async fn reconcile_active(&self, asset: &Asset, report: &mut CycleReport) -> ActiveOutcome {
        let Some(job_id) = asset.encode_job_id.as_deref() else {
            warn!(id = %asset.id, "No encode_job_id, cannot check job status");
            return ActiveOutcome::MissingJobId;
        };

        let assessment = match self.provider.get_job_status(job_id).await {
            Ok(job) => assess(&job),
            Err(e) => {
                warn!(id = %asset.id, job_id, "Job status check failed: {}", e);
                report.status_failures += 1;
                Assessment::status_unavailable(job_id)
            }
        };

        info!(
            id = %asset.id,
            job_id,
            status = %assessment.status,
            "{}",
            assessment.observation
        );

        if self.options.dry_run {
            return ActiveOutcome::Assessed(assessment);
        }

        let update = StatusUpdate::new(asset.id.clone(), assessment.status)
            .with_message(assessment.observation.clone());
        match self.registry.update_asset_status(&update).await {
            Ok(()) => ActiveOutcome::Updated(assessment),
            Err(e) => {
                warn!(id = %asset.id, "Updating vod status failed: {}", e);
                ActiveOutcome::UpdateFailed(assessment)
            }
        }
    }

    /// Submit a job for every TODO asset.
    pub async fn submit_pending(&self, report: &mut CycleReport) {
        let assets = match self
            .registry
            .list_assets(AssetStatus::Todo, self.options.page_limit)
            .await
        {
            Ok(assets) => assets,
            Err(e) => {
                error!("Failed to list assets to encode, skipping submission: {}", e);
                report.pending_list_failed = true;
                return;
            }
        };

        if assets.is_empty() {
            debug!("No new assets to encode");
        } else if !self.options.submit_confirmed && !self.options.dry_run {
            warn!(
                count = assets.len(),
                "Job submission not confirmed, previewing only (pass --yes to submit)"
            );
        }

        for asset in &assets {
            let outcome = self.submit_asset(asset).await;
            report.record_pending(&outcome);
        }
    }

    /// Build and submit the job for one TODO asset.
    async fn submit_asset(&self, asset: &Asset) -> PendingOutcome {
        if asset.movie_file.trim().is_empty() {
            warn!(id = %asset.id, "No movie_file, cannot build encoding job");
            return PendingOutcome::MissingFile;
        }

        let tier = QualityTier::from_flag(asset.movie_hd, self.options.hd_default);
        let job = self.jobs.build(&asset.movie_file, tier);

        match serde_json::to_string_pretty(&job) {
            Ok(json) => info!(id = %asset.id, "Encoding job:\n{}", json),
            Err(_) => info!(id = %asset.id, source = %job.source, "Encoding job"),
        }

        if self.options.dry_run || !self.options.submit_confirmed {
            return PendingOutcome::Previewed;
        }

        let job_id = match self.provider.submit_job(&job).await {
            Ok(job_id) => job_id,
            Err(e) => {
                if e.is_provider_reported() {
                    warn!(id = %asset.id, "Provider rejected encoding job: {}", e);
                } else if e.is_transport() {
                    warn!(id = %asset.id, "Failure encoding asset: {}", e);
                } else {
                    warn!(id = %asset.id, "Unusable provider answer for encoding job: {}", e);
                }
                return PendingOutcome::SubmitFailed;
            }
        };

        info!(id = %asset.id, job_id = %job_id, "Encoding job submitted");

        let update =
            StatusUpdate::new(asset.id.clone(), AssetStatus::Active).with_job_id(job_id.clone());
        match self.registry.update_asset_status(&update).await {
            Ok(()) => PendingOutcome::Submitted { job_id },
            Err(e) => {
                error!(
                    id = %asset.id,
                    job_id = %job_id,
                    "Job submitted but registry update failed, asset stays TODO: {}",
                    e
                );
                PendingOutcome::Unrecorded { job_id }
            }
        }
    }
}
