//! Tracing subscriber setup.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How logs should be emitted.
#[derive(Debug, Clone)]
pub struct LogOptions {
    pub level: String,
    pub dry_run: bool,
    pub file: Option<PathBuf>,
    pub json: bool,
}

/// Filter used when `RUST_LOG` is not set.
///
/// Dry runs always log at debug so the full job specs and provider answers
/// are visible.
pub fn default_directive(options: &LogOptions) -> String {
    let level = if options.dry_run && !matches!(options.level.as_str(), "debug" | "trace") {
        "debug"
    } else {
        options.level.as_str()
    };
    format!("{},hyper=warn,reqwest=warn", level)
}

/// Install the global subscriber: stderr always, plus an optional log file.
pub fn init(options: &LogOptions) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(options)));

    let file_layer = match &options.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    let installed = if options.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    installed.context("Failed to install log subscriber")
}
