//! Liveness ping sent after a completed cycle.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

/// Ping the health-check URL. Failures are logged, never returned.
pub async fn ping(url: &str, timeout: Duration) -> bool {
    let client = match Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            warn!("Failed to create health-check client: {}", e);
            return false;
        }
    };

    match client.get(url).send().await {
        Ok(response) if response.status().is_success() => {
            debug!(url, "Health check pinged");
            true
        }
        Ok(response) => {
            warn!(url, status = response.status().as_u16(), "Health check ping rejected");
            false
        }
        Err(e) => {
            warn!(url, "Health check ping failed: {}", e);
            false
        }
    }
}
