//! web-relay
//!
//! Serves third-party pages to an embedding browser shell.
//!
//! # Architecture Overview
//!
//! ```text
//!     Shell iframe                 ┌──────────────────────────────────────────────┐
//!     GET /relay?url=…  ──────────▶│  http::server (request ID, trace, timeout)   │
//!                                  │      → security::auth                        │
//!                                  │      → relay::target   (normalize)           │
//!                                  │      → relay::fetch    (reqwest, redirects)──┼──▶ Upstream
//!                                  │      → relay::html / relay::css (rewrite)    │
//!     Rewritten page   ◀───────────│      → relay::emit     (framing overrides)   │
//!                                  │                                              │
//!     /api/sessions    ◀──────────▶│  sessions (memory | sqlite)                  │
//!                                  └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use web_relay::config::{load_config, validation::validate_config, RelayConfig};
use web_relay::lifecycle::{launch, signals, Shutdown};
use web_relay::observability::logging;

#[derive(Parser)]
#[command(name = "web-relay", version, about = "Rewriting content relay for embedded browsing")]
struct Args {
    /// Path to a TOML config file. Built-in defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            let config = RelayConfig::default();
            validate_config(&config).map_err(web_relay::config::ConfigError::Validation)?;
            config
        }
    };

    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "web-relay starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        endpoint = %config.relay.endpoint_path,
        auth_enabled = config.auth.enabled,
        storage = ?config.storage.backend,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let started = launch(config, &shutdown).await?;

    signals::wait_for_signal().await;
    shutdown.trigger();
    started.handle.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
