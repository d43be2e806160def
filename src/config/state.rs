// Application state module
// Read-only configuration and converter table shared by all connections

use std::sync::atomic::AtomicUsize;

use tokio::sync::watch;

use super::types::Config;
use crate::convert::ConverterTable;

/// Application state
pub struct AppState {
    pub config: Config,
    pub converters: ConverterTable,

    /// Open connections, checked against `performance.max_connections`
    pub active_connections: AtomicUsize,

    /// Flips to `true` once the server stops accepting
    shutdown: watch::Sender<bool>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_converters(config, ConverterTable::default())
    }

    pub fn with_converters(config: Config, converters: ConverterTable) -> Self {
        Self {
            config,
            converters,
            active_connections: AtomicUsize::new(0),
            shutdown: watch::Sender::new(false),
        }
    }

    /// Ask every open connection to finish its current request and close
    pub fn begin_shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    /// Receiver that observes `begin_shutdown`, including calls made before subscribing
    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }
}
