mod cli;
mod logging;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use vodsync_core::{
    healthcheck, load_config, validate_config, AssetRegistry, Cleaner, Config, CycleReport,
    EncodingComClient, EncodingProvider, FtpFileStore, JobBuilder, ReconcileOptions, Reconciler,
    RemoteFileStore, SanitizedConfig, TeleupRegistry,
};

use cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(&cli.log_options()) {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    info!("Loading configuration from {:?}", cli.config);
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;

    validate_config(&config).context("Configuration validation failed")?;

    if cli.print_config {
        let sanitized = SanitizedConfig::from(&config);
        println!("{}", serde_json::to_string_pretty(&sanitized)?);
        return Ok(());
    }

    let registry: Arc<dyn AssetRegistry> = Arc::new(
        TeleupRegistry::new(&config.registry).context("Failed to create registry client")?,
    );

    if cli.cleanup {
        return run_cleanup(&cli, &config, registry).await;
    }

    let provider: Arc<dyn EncodingProvider> = Arc::new(
        EncodingComClient::new(config.provider.clone())
            .context("Failed to create provider client")?,
    );

    let options = ReconcileOptions {
        status_only: cli.update_status,
        dry_run: cli.dry_run,
        submit_confirmed: cli.yes,
        hd_default: cli.hd_default || config.reconcile.hd_default,
        page_limit: config.registry.page_limit,
    };
    let reconciler = Reconciler::new(registry, provider, JobBuilder::new(&config), options);

    let report = reconciler.run_cycle().await;
    log_summary(&report);

    if report.pending_phase_ran && !report.dry_run {
        if let Some(url) = &config.healthcheck_url {
            let timeout = Duration::from_secs(config.healthcheck_timeout_secs as u64);
            healthcheck::ping(url, timeout).await;
        }
    }

    Ok(())
}

async fn run_cleanup(cli: &Cli, config: &Config, registry: Arc<dyn AssetRegistry>) -> Result<()> {
    let store: Arc<dyn RemoteFileStore> = Arc::new(
        FtpFileStore::from_url(&config.storage.source)
            .context("Invalid storage source")?
            .with_timeout(Duration::from_secs(config.storage.timeout_secs as u64)),
    );
    let cleaner = Cleaner::new(registry, store, config.registry.page_limit, cli.dry_run);

    for status in cli.cleanup_statuses() {
        let report = cleaner
            .clean(status, cli.force)
            .await
            .with_context(|| format!("Cleaning files for {} assets failed", status))?;

        info!(
            status = %status,
            assets = report.assets,
            matched = report.matched.len(),
            deleted = report.deleted,
            failed = report.failed,
            "Cleanup finished"
        );
    }

    Ok(())
}

fn log_summary(report: &CycleReport) {
    let elapsed = report
        .finished_at
        .map(|end| (end - report.started_at).num_milliseconds())
        .unwrap_or_default();

    info!(
        dry_run = report.dry_run,
        active_checked = report.active_checked,
        active_updated = report.active_updated,
        active_skipped = report.active_skipped,
        submitted = report.submitted,
        previewed = report.previewed,
        pending_skipped = report.pending_skipped,
        elapsed_ms = elapsed,
        "Cycle complete"
    );

    if !report.is_clean() {
        warn!(
            active_list_failed = report.active_list_failed,
            pending_list_failed = report.pending_list_failed,
            status_failures = report.status_failures,
            update_failures = report.update_failures,
            submit_failures = report.submit_failures,
            "Cycle finished with failures"
        );
    }
}
