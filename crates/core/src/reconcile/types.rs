//! Types for the reconciliation driver.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::status::Assessment;

/// How a cycle should behave.
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Only refresh ACTIVE assets; don't submit new jobs.
    pub status_only: bool,
    /// Read everything, write nothing.
    pub dry_run: bool,
    /// Operator confirmed job submission. Without it pending assets are
    /// only previewed.
    pub submit_confirmed: bool,
    /// Tier for assets without an HD flag.
    pub hd_default: bool,
    /// Page size for registry listings.
    pub page_limit: u32,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            status_only: false,
            dry_run: false,
            submit_confirmed: false,
            hd_default: false,
            page_limit: 100,
        }
    }
}

/// What happened to one ACTIVE asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveOutcome {
    /// Registry updated with the assessment.
    Updated(Assessment),
    /// Registry refused or didn't answer; retried next cycle.
    UpdateFailed(Assessment),
    /// Dry run: assessment computed, nothing written.
    Assessed(Assessment),
    /// No job id to poll.
    MissingJobId,
}

/// What happened to one TODO asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingOutcome {
    /// Job submitted and asset moved to ACTIVE.
    Submitted { job_id: String },
    /// Job submitted but the registry update failed; the asset stays TODO
    /// and will be submitted again next cycle.
    Unrecorded { job_id: String },
    /// Provider didn't accept the job; asset stays TODO.
    SubmitFailed,
    /// Job spec built and logged only (dry run or unconfirmed).
    Previewed,
    /// Asset has no source file name.
    MissingFile,
}

/// Summary of one reconciliation cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub dry_run: bool,
    /// Listing ACTIVE assets failed; nothing was checked.
    pub active_list_failed: bool,
    pub active_checked: usize,
    pub active_updated: usize,
    pub active_skipped: usize,
    pub status_failures: usize,
    pub update_failures: usize,
    /// Whether the submission phase ran at all.
    pub pending_phase_ran: bool,
    pub pending_list_failed: bool,
    pub pending_seen: usize,
    pub submitted: usize,
    pub submit_failures: usize,
    pub previewed: usize,
    pub pending_skipped: usize,
}

impl CycleReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            dry_run,
            active_list_failed: false,
            active_checked: 0,
            active_updated: 0,
            active_skipped: 0,
            status_failures: 0,
            update_failures: 0,
            pending_phase_ran: false,
            pending_list_failed: false,
            pending_seen: 0,
            submitted: 0,
            submit_failures: 0,
            previewed: 0,
            pending_skipped: 0,
        }
    }

    pub(crate) fn record_active(&mut self, outcome: &ActiveOutcome) {
        match outcome {
            ActiveOutcome::Updated(_) => {
                self.active_checked += 1;
                self.active_updated += 1;
            }
            ActiveOutcome::UpdateFailed(_) => {
                self.active_checked += 1;
                self.update_failures += 1;
            }
            ActiveOutcome::Assessed(_) => self.active_checked += 1,
            ActiveOutcome::MissingJobId => self.active_skipped += 1,
        }
    }

    pub(crate) fn record_pending(&mut self, outcome: &PendingOutcome) {
        self.pending_seen += 1;
        match outcome {
            PendingOutcome::Submitted { .. } => self.submitted += 1,
            PendingOutcome::Unrecorded { .. } => {
                self.submitted += 1;
                self.update_failures += 1;
            }
            PendingOutcome::SubmitFailed => self.submit_failures += 1,
            PendingOutcome::Previewed => self.previewed += 1,
            PendingOutcome::MissingFile => self.pending_skipped += 1,
        }
    }

    /// True when the cycle ran without any failed call.
    pub fn is_clean(&self) -> bool {
        !self.active_list_failed
            && !self.pending_list_failed
            && self.status_failures == 0
            && self.update_failures == 0
            && self.submit_failures == 0
    }
}
