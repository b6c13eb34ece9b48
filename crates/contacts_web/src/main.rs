//! Contacts manager HTTP entry point.
//!
//! Configuration comes from flags or `CONTACTS_*` environment variables; see
//! [`config::Config`].

mod config;
mod error;
mod render;
mod routes;
mod server;
mod session;

use anyhow::anyhow;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::Config::parse();

    let logging = match config.log_dir.as_deref() {
        Some(dir) => contacts_core::init_logging(config.log_level(), dir),
        None => contacts_core::init_stderr_logging(config.log_level()),
    };
    logging.map_err(|err| anyhow!(err))?;

    log::info!(
        "event=web_init module=web status=ok core_version={}",
        contacts_core::core_version()
    );
    server::run_server(&config).await
}
