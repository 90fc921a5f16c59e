pub mod cleanup;
pub mod config;
pub mod healthcheck;
pub mod job;
pub mod provider;
pub mod reconcile;
pub mod registry;
pub mod testing;

pub use cleanup::{Cleaner, CleanupError, CleanupReport, FtpFileStore, RemoteFileStore};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use job::{build_job, JobBuilder, JobSpec, QualityTier};
pub use provider::{EncodingComClient, EncodingProvider, JobStatus, ProviderError};
pub use reconcile::{CycleReport, ReconcileOptions, Reconciler};
pub use registry::{Asset, AssetId, AssetRegistry, AssetStatus, RegistryError, StatusUpdate, TeleupRegistry};
