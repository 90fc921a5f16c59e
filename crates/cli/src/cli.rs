// Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use vodsync_core::AssetStatus;

use crate::logging::LogOptions;

#[derive(Parser, Debug)]
#[command(
    name = "vodsync",
    version,
    about = "Reconcile VOD asset status between TeleUP and Encoding.com",
    long_about = "Polls running encoding jobs and writes their status back to the \
                  TeleUP registry, then submits encoding jobs for new assets. \
                  One cycle per invocation."
)]
pub struct Cli {
    /// Configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "VODSYNC_CONFIG",
        default_value = "config.toml"
    )]
    pub config: PathBuf,

    /// Only update the status of running jobs; don't submit new ones
    #[arg(long)]
    pub update_status: bool,

    /// Delete remote files of finished and rejected assets, then exit
    #[arg(long)]
    pub cleanup: bool,

    /// Asset status to clean up (repeatable). Defaults to reject, then success
    #[arg(long = "cleanup-status", value_enum, value_name = "STATUS", requires = "cleanup")]
    pub cleanup_statuses: Vec<StatusArg>,

    /// Allow cleaning up statuses other than success and reject
    #[arg(long, requires = "cleanup")]
    pub force: bool,

    /// Read everything, change nothing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Confirm submission of new encoding jobs (without it they are only previewed)
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Encode assets without an HD flag with the HD ladder
    #[arg(long)]
    pub hd_default: bool,

    /// Log level, overridden by RUST_LOG
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "info",
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    pub log_level: String,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Print the effective configuration with secrets redacted, then exit
    #[arg(long)]
    pub print_config: bool,
}

/// Asset status as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Todo,
    Active,
    Success,
    Fail,
    Reject,
}

impl From<StatusArg> for AssetStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Todo => AssetStatus::Todo,
            StatusArg::Active => AssetStatus::Active,
            StatusArg::Success => AssetStatus::Success,
            StatusArg::Fail => AssetStatus::Fail,
            StatusArg::Reject => AssetStatus::Reject,
        }
    }
}

impl Cli {
    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            level: self.log_level.clone(),
            dry_run: self.dry_run,
            file: self.log_file.clone(),
            json: self.log_json,
        }
    }

    /// Statuses to clean, in order.
    pub fn cleanup_statuses(&self) -> Vec<AssetStatus> {
        if self.cleanup_statuses.is_empty() {
            vec![AssetStatus::Reject, AssetStatus::Success]
        } else {
            self.cleanup_statuses.iter().map(|&s| s.into()).collect()
        }
    }
}
