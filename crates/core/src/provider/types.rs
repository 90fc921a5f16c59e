//! Provider wire types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::job::JobSpec;

/// Status of a provider job, as last reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobStatus {
    /// Provider job id (MediaID).
    pub media_id: Option<String>,
    /// Provider state name, e.g. "Processing".
    pub status_text: String,
    /// Percent complete, 0 to 100.
    pub progress: f64,
    /// Failure detail, when the provider gives one.
    pub description: Option<String>,
    pub created: Option<String>,
    pub started: Option<String>,
}

impl JobStatus {
    /// Create a status with just a state name and progress.
    pub fn new(status_text: impl Into<String>, progress: f64) -> Self {
        Self {
            media_id: None,
            status_text: status_text.into(),
            progress,
            description: None,
            created: None,
            started: None,
        }
    }

    /// Attach a failure description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Outer `{"query": ...}` envelope sent in the `json` form field.
#[derive(Debug, Serialize)]
pub(crate) struct QueryEnvelope<'a, Q: Serialize> {
    pub query: &'a Q,
}

/// AddMedia query.
#[derive(Debug, Serialize)]
pub(crate) struct AddMediaQuery<'a> {
    pub userid: &'a str,
    pub userkey: &'a str,
    pub action: &'static str,
    pub source: &'a str,
    pub format: FormatSpec<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FormatSpec<'a> {
    pub output: &'a str,
    pub bitrates: String,
    pub sizes: String,
    pub destination: &'a str,
}

impl<'a> AddMediaQuery<'a> {
    pub fn new(userid: &'a str, userkey: &'a str, job: &'a JobSpec) -> Self {
        Self {
            userid,
            userkey,
            action: "AddMedia",
            source: &job.source,
            format: FormatSpec {
                output: &job.output,
                bitrates: job.bitrates.join(","),
                sizes: job.sizes.join(","),
                destination: &job.destination,
            },
            notify: job.notify.as_deref(),
        }
    }
}

/// GetStatus query.
#[derive(Debug, Serialize)]
pub(crate) struct GetStatusQuery<'a> {
    pub userid: &'a str,
    pub userkey: &'a str,
    pub action: &'static str,
    pub mediaid: &'a str,
}

/// Outer `{"response": ...}` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ResponseEnvelope {
    pub response: ProviderResponse,
}

/// Union of the AddMedia and GetStatus response fields.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProviderResponse {
    #[serde(rename = "MediaID", default, deserialize_with = "deserialize_text")]
    pub media_id: Option<String>,
    #[serde(default)]
    pub errors: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub created: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub started: Option<String>,
    #[serde(default, deserialize_with = "deserialize_progress")]
    pub progress: f64,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub description: Option<String>,
}

impl ProviderResponse {
    /// Error text embedded in the response, if any.
    pub fn error_message(&self) -> Option<String> {
        self.errors.as_ref().and_then(error_text)
    }

    pub fn into_job_status(self) -> JobStatus {
        JobStatus {
            media_id: self.id.or(self.media_id),
            status_text: self.status.unwrap_or_default(),
            progress: self.progress,
            description: self.description,
            created: self.created,
            started: self.started,
        }
    }
}

/// Flatten the provider's `errors` value into one message.
///
/// Seen shapes: a string, `{"error": "..."}`, `{"error": ["...", "..."]}`
/// and plain lists of either.
fn error_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(error_text).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        Value::Object(map) if map.is_empty() => None,
        Value::Object(map) => match map.get("error") {
            Some(inner) => error_text(inner),
            None => Some(Value::Object(map.clone()).to_string()),
        },
        other => Some(other.to_string()),
    }
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn deserialize_progress<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').parse().unwrap_or(0.0),
        _ => 0.0,
    })
}
