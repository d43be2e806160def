//! Logger module
//!
//! Thin layer over `tracing` for the server:
//! - Subscriber setup (compact or JSON output, `RUST_LOG` aware)
//! - Server lifecycle and connection events
//! - One diagnostic record per conversion request
//! - Access log lines in combined, common or JSON format

mod format;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LogFormat, LoggingConfig};
use crate::convert::Conversion;
use crate::error::ServerError;

/// Target used for access log records, filterable with `RUST_LOG=access=off`
pub const ACCESS_TARGET: &str = "access";

/// Initialize the global subscriber
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> Result<(), ServerError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .compact(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };

    result.map_err(|e| ServerError::Logging(e.to_string()))
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!(
        %addr,
        static_root = %config.static_files.root,
        workers = ?config.server.workers,
        max_body_size = config.http.max_body_size,
        max_connections = ?config.performance.max_connections,
        "Server listening on http://{addr}"
    );
    for conversion in Conversion::ALL {
        tracing::debug!(route = %conversion.path(), "Registered conversion endpoint");
    }
}

pub fn log_server_stopped(open_connections: usize) {
    tracing::info!(open_connections, "Server stopped accepting connections");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!(%peer_addr, "Connection accepted");
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    tracing::warn!(error = %err, "Failed to serve connection");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Diagnostic record for one handled conversion request
pub fn log_conversion(conversion: Conversion, payload: &Value) {
    tracing::info!(route = %conversion, %payload, "{conversion}: {payload}");
}

/// Log rejected conversion request
pub fn log_rejected(conversion: Conversion, status: u16, reason: &str) {
    tracing::warn!(route = %conversion, status, reason, "Rejected conversion request");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: ACCESS_TARGET, "{}", entry.format(format));
}
