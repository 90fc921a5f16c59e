//! Mapping of provider job states onto registry asset statuses.
//!
//! This is the only place provider state names are interpreted. Anything not
//! recognised fails closed: the asset is marked FAIL rather than left ACTIVE.

use crate::provider::JobStatus;
use crate::registry::AssetStatus;

/// Provider states meaning the job is still in flight.
pub const ACTIVE_STATES: [&str; 5] = [
    "New",
    "Downloading",
    "Waiting for encoder",
    "Processing",
    "Saving",
];

/// Provider state meaning the job completed.
pub const SUCCESS_STATE: &str = "Finished";

/// Provider state meaning the job failed.
pub const FAIL_STATE: &str = "Error";

/// Classified provider job state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderState {
    Active,
    Success,
    Fail,
    /// A state name outside the known vocabulary.
    Unknown(String),
}

/// Classify a provider state name. Matching is exact.
pub fn classify(status_text: &str) -> ProviderState {
    if ACTIVE_STATES.contains(&status_text) {
        ProviderState::Active
    } else if status_text == SUCCESS_STATE {
        ProviderState::Success
    } else if status_text == FAIL_STATE {
        ProviderState::Fail
    } else {
        ProviderState::Unknown(status_text.to_string())
    }
}

/// Registry status and observation derived from a provider report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub status: AssetStatus,
    pub observation: String,
}

impl Assessment {
    /// Assess a job whose status could not be retrieved.
    pub fn status_unavailable(job_id: &str) -> Self {
        Self {
            status: AssetStatus::Fail,
            observation: format!("failed to retrieve status for {}", job_id),
        }
    }
}

/// Map a provider report to the asset's next registry status.
pub fn assess(job: &JobStatus) -> Assessment {
    match classify(&job.status_text) {
        ProviderState::Active => Assessment {
            status: AssetStatus::Active,
            observation: format!("{} {}%", job.status_text, job.progress),
        },
        ProviderState::Success => Assessment {
            status: AssetStatus::Success,
            observation: "-".to_string(),
        },
        ProviderState::Fail => Assessment {
            status: AssetStatus::Fail,
            observation: job
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .unwrap_or(job.status_text.as_str())
                .to_string(),
        },
        ProviderState::Unknown(text) => Assessment {
            status: AssetStatus::Fail,
            observation: format!("Encoding status {} unknown", text),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_states() {
        for state in ACTIVE_STATES {
            assert_eq!(classify(state), ProviderState::Active);
        }
        assert_eq!(classify("Finished"), ProviderState::Success);
        assert_eq!(classify("Error"), ProviderState::Fail);
    }

    #[test]
    fn test_classify_is_exact() {
        assert_eq!(
            classify("processing"),
            ProviderState::Unknown("processing".to_string())
        );
        assert_eq!(
            classify("Finished "),
            ProviderState::Unknown("Finished ".to_string())
        );
        assert_eq!(classify(""), ProviderState::Unknown(String::new()));
    }

    #[test]
    fn test_active_states_keep_active_with_progress() {
        for state in ACTIVE_STATES {
            let assessment = assess(&JobStatus::new(state, 42.0));
            assert_eq!(assessment.status, AssetStatus::Active);
            assert_eq!(assessment.observation, format!("{} 42%", state));
        }
    }

    #[test]
    fn test_fractional_progress() {
        let assessment = assess(&JobStatus::new("Processing", 12.5));
        assert_eq!(assessment.observation, "Processing 12.5%");
    }

    #[test]
    fn test_finished_is_success_regardless_of_progress() {
        for progress in [0.0, 42.0, 100.0] {
            let assessment = assess(&JobStatus::new("Finished", progress));
            assert_eq!(assessment.status, AssetStatus::Success);
            assert_eq!(assessment.observation, "-");
        }
    }

    #[test]
    fn test_error_prefers_description() {
        let assessment =
            assess(&JobStatus::new("Error", 10.0).with_description("Source file not found"));
        assert_eq!(assessment.status, AssetStatus::Fail);
        assert_eq!(assessment.observation, "Source file not found");
    }

    #[test]
    fn test_error_without_description_uses_status_text() {
        let assessment = assess(&JobStatus::new("Error", 10.0));
        assert_eq!(assessment.status, AssetStatus::Fail);
        assert_eq!(assessment.observation, "Error");

        let assessment = assess(&JobStatus::new("Error", 10.0).with_description("  "));
        assert_eq!(assessment.observation, "Error");
    }

    #[test]
    fn test_unknown_state_fails_closed() {
        let assessment = assess(&JobStatus::new("Deleted", 0.0));
        assert_eq!(assessment.status, AssetStatus::Fail);
        assert_eq!(assessment.observation, "Encoding status Deleted unknown");
        assert!(assessment.observation.contains("unknown"));
    }

    #[test]
    fn test_status_unavailable() {
        let assessment = Assessment::status_unavailable("J1");
        assert_eq!(assessment.status, AssetStatus::Fail);
        assert_eq!(assessment.observation, "failed to retrieve status for J1");
    }
}
