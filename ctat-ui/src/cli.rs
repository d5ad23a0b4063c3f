//! Command-line arguments for ctat-ui
//!
//! Every setting can also come from a `CTAT_*` environment variable; clap
//! gives the flag priority over the variable.

use std::path::PathBuf;

use clap::Parser;
use ctat_common::config::ConfigOverrides;

#[derive(Parser, Debug)]
#[command(name = "ctat-ui")]
#[command(about = "Conversation transcript annotation tool")]
#[command(version)]
pub struct Args {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(short, long, env = "CTAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "CTAT_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "CTAT_PORT")]
    pub port: Option<u16>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "CTAT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Largest accepted workbook upload, in megabytes
    #[arg(long, env = "CTAT_MAX_UPLOAD_MB")]
    pub max_upload_mb: Option<usize>,

    /// How long status messages stay visible, in milliseconds
    #[arg(long, env = "CTAT_STATUS_DISPLAY_MS")]
    pub status_display_ms: Option<u64>,

    /// Workbook to load at startup
    #[arg(long)]
    pub open: Option<PathBuf>,
}

impl Args {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            log_level: self.log_level.clone(),
            max_upload_mb: self.max_upload_mb,
            status_display_ms: self.status_display_ms,
        }
    }
}
