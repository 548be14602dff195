//! Console logging for the `tabstore` binary.
//!
//! The library only talks to the `log` facade; this module installs
//! `env_logger` behind it. The default level is INFO and `RUST_LOG` overrides
//! it, e.g. `RUST_LOG=tabstore=debug`.
//!
//! ```no_run
//! tabstore::logging::init().expect("Failed to initialize logging");
//! log::info!("App started");
//! ```

use anyhow::{Context as _, Result};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info";

/// Initializes the global logger.
///
/// # Errors
///
/// Returns error if a logger has already been installed.
pub fn init() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_FILTER))
        .format_timestamp_millis()
        .try_init()
        .context("Failed to initialize logger")?;

    log::debug!("Logging initialized");
    Ok(())
}
