//! Encoding job specifications.
//!
//! A `JobSpec` is built fresh from an asset every time it is submitted; it
//! has no lifecycle of its own.

mod builder;

pub use builder::{build_job, JobBuilder};

use serde::Serialize;

/// Quality tier selecting a bitrate/size ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Sd,
    Hd,
}

impl QualityTier {
    /// Tier for an asset's HD flag, falling back to an explicit default.
    pub fn from_flag(movie_hd: Option<bool>, hd_default: bool) -> Self {
        if movie_hd.unwrap_or(hd_default) {
            QualityTier::Hd
        } else {
            QualityTier::Sd
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Sd => "sd",
            QualityTier::Hd => "hd",
        }
    }
}

/// Everything the provider needs to encode one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSpec {
    /// Full URL of the source movie.
    pub source: String,
    /// Full URL of the output package.
    pub destination: String,
    /// Output format token.
    pub output: String,
    pub tier: QualityTier,
    /// Bitrates, ordered like `sizes`.
    pub bitrates: Vec<String>,
    pub sizes: Vec<String>,
    /// Callback URL for provider notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify: Option<String>,
}
