//! Asset types exchanged with the registry.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Lifecycle status of an asset, as stored by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum AssetStatus {
    /// Selected to be encoded.
    Todo,
    /// Encoding job submitted and running.
    Active,
    /// Encoded successfully.
    Success,
    /// Encoding failed.
    Fail,
    /// Rejected upstream; never processed.
    Reject,
}

impl AssetStatus {
    /// Numeric code used on the wire.
    pub fn code(&self) -> i32 {
        match self {
            AssetStatus::Todo => 0,
            AssetStatus::Active => 1,
            AssetStatus::Success => 5,
            AssetStatus::Fail => -1,
            AssetStatus::Reject => -5,
        }
    }

    /// Returns the string representation for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Todo => "TODO",
            AssetStatus::Active => "ACTIVE",
            AssetStatus::Success => "SUCCESS",
            AssetStatus::Fail => "FAIL",
            AssetStatus::Reject => "REJECT",
        }
    }
}

impl From<AssetStatus> for i32 {
    fn from(status: AssetStatus) -> Self {
        status.code()
    }
}

impl TryFrom<i32> for AssetStatus {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(AssetStatus::Todo),
            1 => Ok(AssetStatus::Active),
            5 => Ok(AssetStatus::Success),
            -1 => Ok(AssetStatus::Fail),
            -5 => Ok(AssetStatus::Reject),
            other => Err(format!("unknown asset status code {}", other)),
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry identifier of an asset.
///
/// Kept in the JSON shape the registry sent it in, so PATCH bodies echo it
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssetId {
    Number(i64),
    Text(String),
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetId::Number(n) => write!(f, "{}", n),
            AssetId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for AssetId {
    fn from(id: i64) -> Self {
        AssetId::Number(id)
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        AssetId::Text(id.to_string())
    }
}

/// A video asset as listed by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    /// Source file name, relative to the storage source base.
    #[serde(default)]
    pub movie_file: String,
    /// Quality tier flag; `None` when the registry doesn't say.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub movie_hd: Option<bool>,
    /// `None` when missing or not a known code.
    #[serde(default, deserialize_with = "deserialize_status")]
    pub status: Option<AssetStatus>,
    /// Provider job linked to this asset; `None` until a job is submitted.
    #[serde(default, deserialize_with = "deserialize_job_id")]
    pub encode_job_id: Option<String>,
}

/// A status change pushed to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub id: AssetId,
    pub status: AssetStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encode_job_id: Option<String>,
    #[serde(rename = "observation", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusUpdate {
    /// Create an update carrying only a status.
    pub fn new(id: AssetId, status: AssetStatus) -> Self {
        Self {
            id,
            status,
            encode_job_id: None,
            message: None,
        }
    }

    /// Attach the provider job id.
    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.encode_job_id = Some(job_id.into());
        self
    }

    /// Attach a human-readable observation.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// One page of a registry listing.
///
/// Records are kept raw so one malformed asset can't fail the whole page.
#[derive(Debug, Deserialize)]
pub(crate) struct AssetPage {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Paging {
    #[serde(default)]
    pub next: Option<String>,
}

impl AssetPage {
    /// Decode the page's records, skipping the ones that don't parse.
    pub fn take_assets(&mut self) -> Vec<Asset> {
        std::mem::take(&mut self.data)
            .into_iter()
            .filter_map(|record| match Asset::deserialize(&record) {
                Ok(asset) => Some(asset),
                Err(e) => {
                    warn!(record = %record, "Skipping malformed registry asset: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Link to the following page, if any.
    pub fn next_link(&self) -> Option<&str> {
        self.paging
            .as_ref()
            .and_then(|p| p.next.as_deref())
            .filter(|next| !next.is_empty())
    }
}

/// Loosely typed scalar, used where the registry isn't consistent.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Scalar> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Scalar::Bool(b)) => Some(b),
        Some(Scalar::Int(n)) => Some(n != 0),
        Some(Scalar::Float(n)) => Some(n != 0.0),
        Some(Scalar::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Some(true),
            "0" | "false" | "no" => Some(false),
            _ => None,
        },
        None => None,
    })
}

fn deserialize_status<'de, D>(deserializer: D) -> Result<Option<AssetStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Scalar> = Option::deserialize(deserializer)?;
    let code = match value {
        Some(Scalar::Int(n)) => i32::try_from(n).ok(),
        Some(Scalar::Text(s)) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    Ok(code.and_then(|c| AssetStatus::try_from(c).ok()))
}

fn deserialize_job_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Scalar> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Scalar::Text(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Scalar::Int(n)) => Some(n.to_string()),
        _ => None,
    })
}
