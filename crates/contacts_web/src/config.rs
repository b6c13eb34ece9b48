//! Command-line and environment configuration.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Server settings; every flag falls back to a `CONTACTS_*` variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "contacts_web", version, about = "Server-rendered contacts manager")]
pub struct Config {
    /// SQLite database file; created and migrated on first start.
    #[arg(long, env = "CONTACTS_DATABASE_PATH")]
    pub database_path: PathBuf,

    /// Address to listen on.
    #[arg(long, env = "CONTACTS_BIND", default_value = "127.0.0.1:4567")]
    pub bind: SocketAddr,

    /// trace|debug|info|warn|error. Defaults by build mode.
    #[arg(long, env = "CONTACTS_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files. Logs go to stderr when unset.
    #[arg(long, env = "CONTACTS_LOG_DIR")]
    pub log_dir: Option<String>,
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or_else(contacts_core::default_log_level)
    }
}
