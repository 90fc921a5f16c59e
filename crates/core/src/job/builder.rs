use crate::config::{Config, ProviderConfig, QualityConfig, StorageConfig};

use super::{JobSpec, QualityTier};

/// Build a job specification for one source file.
///
/// Pure: the destination is the source name with its extension replaced by
/// the provider's container suffix, rooted at the destination base.
pub fn build_job(
    filename: &str,
    tier: QualityTier,
    quality: &QualityConfig,
    storage: &StorageConfig,
    provider: &ProviderConfig,
) -> JobSpec {
    let (sizes, bitrates) = match tier {
        QualityTier::Hd => (&quality.sizes.hd, &quality.bitrates.hd),
        QualityTier::Sd => (&quality.sizes.sd, &quality.bitrates.sd),
    };

    JobSpec {
        source: join_url(&storage.source, filename),
        destination: join_url(
            &storage.destination,
            &format!("{}.{}", strip_extension(filename), provider.container_suffix),
        ),
        output: provider.output_format.clone(),
        tier,
        bitrates: bitrates.clone(),
        sizes: sizes.clone(),
        notify: provider.notify.clone().filter(|n| !n.is_empty()),
    }
}

/// Builds job specs from the loaded configuration.
#[derive(Debug, Clone)]
pub struct JobBuilder {
    quality: QualityConfig,
    storage: StorageConfig,
    provider: ProviderConfig,
}

impl JobBuilder {
    pub fn new(config: &Config) -> Self {
        Self {
            quality: config.quality.clone(),
            storage: config.storage.clone(),
            provider: config.provider.clone(),
        }
    }

    pub fn build(&self, filename: &str, tier: QualityTier) -> JobSpec {
        build_job(filename, tier, &self.quality, &self.storage, &self.provider)
    }
}

fn join_url(base: &str, name: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        name.trim_start_matches('/')
    )
}

/// Drop the last extension of the final path component.
///
/// Leading dots don't start an extension, so `.hidden` stays as is.
fn strip_extension(filename: &str) -> &str {
    let name_start = filename.rfind('/').map(|i| i + 1).unwrap_or(0);
    let name = &filename[name_start..];
    let stem_len = name.trim_start_matches('.').len();
    let leading_dots = name.len() - stem_len;

    match name[leading_dots..].rfind('.') {
        Some(dot) => &filename[..name_start + leading_dots + dot],
        None => filename,
    }
}
