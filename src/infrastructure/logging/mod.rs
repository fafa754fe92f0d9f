// Logging module - Logging infrastructure
use crate::domain::error::{TransferError, TransferResult};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set
pub fn default_directive(level: &str, verbose: bool) -> String {
    let level = if verbose { "debug" } else { level };
    format!("uboot_transfer={},warn", level)
}

/// Initialize logging system
///
/// Logs go to stderr so stdout only carries console traffic.
pub fn init_logging(level: &str, verbose: bool) -> TransferResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level, verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(|e| TransferError::Logging(e.to_string()))?;

    tracing::info!("Uboot transfer logging system initialized");
    Ok(())
}
