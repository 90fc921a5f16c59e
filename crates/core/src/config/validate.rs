use super::{types::Config, ConfigError, QualityConfig};

/// Validate configuration
/// Currently validates:
/// - Mandatory sections exist (enforced by serde)
/// - URLs, credentials and storage bases are not empty
/// - Page limit and timeouts are not 0
/// - Each tier has a non-empty ladder with as many sizes as bitrates
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let required = [
        ("registry.url", &config.registry.url),
        ("registry.secret", &config.registry.secret),
        ("provider.url", &config.provider.url),
        ("provider.user_id", &config.provider.user_id),
        ("provider.user_key", &config.provider.user_key),
        ("provider.output_format", &config.provider.output_format),
        ("provider.container_suffix", &config.provider.container_suffix),
        ("storage.source", &config.storage.source),
        ("storage.destination", &config.storage.destination),
    ];
    let missing: Vec<&str> = required
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "missing setting(s): {}",
            missing.join(", ")
        )));
    }

    if config.registry.page_limit == 0 {
        return Err(ConfigError::ValidationError(
            "registry.page_limit cannot be 0".to_string(),
        ));
    }
    if config.registry.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "registry.timeout_secs cannot be 0".to_string(),
        ));
    }
    if config.provider.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "provider.timeout_secs cannot be 0".to_string(),
        ));
    }
    if config.storage.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "storage.timeout_secs cannot be 0".to_string(),
        ));
    }
    if config.healthcheck_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "healthcheck_timeout_secs cannot be 0".to_string(),
        ));
    }

    let QualityConfig { sizes, bitrates } = &config.quality;
    validate_tier("sd", &sizes.sd, &bitrates.sd)?;
    validate_tier("hd", &sizes.hd, &bitrates.hd)?;

    Ok(())
}

fn validate_tier(tier: &str, sizes: &[String], bitrates: &[String]) -> Result<(), ConfigError> {
    if sizes.is_empty() || bitrates.is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "quality ladder for {} cannot be empty",
            tier
        )));
    }
    if sizes.len() != bitrates.len() {
        return Err(ConfigError::ValidationError(format!(
            "quality.sizes.{} has {} entries but quality.bitrates.{} has {}",
            tier,
            sizes.len(),
            tier,
            bitrates.len()
        )));
    }
    if sizes.iter().chain(bitrates.iter()).any(|v| v.contains(',')) {
        return Err(ConfigError::ValidationError(format!(
            "quality ladder entries for {} must not contain commas",
            tier
        )));
    }

    Ok(())
}
