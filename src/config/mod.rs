// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::ServerError;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HealthConfig, HttpConfig, LogFormat, LoggingConfig, PerformanceConfig, ServerConfig,
    StaticFilesConfig,
};

/// Default config file name (without extension), resolves to `config.toml`
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Sources, lowest priority first: built-in defaults, the optional config
    /// file, then `SERVER_`-prefixed environment variables using `__` between
    /// nested keys (e.g. `SERVER_SERVER__PORT=9000`).
    pub fn load_from(config_path: &str) -> Result<Self, ServerError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(config_path).required(false))
            .add_source(
                ::config::Environment::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 9527)?
            .set_default("static_files.root", "dist")?
            .set_default("static_files.index_file", "index.html")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "compact")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "conversion-server")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("health.enabled", true)?
            .set_default("health.liveness_path", "/healthz")?
            .set_default("health.readiness_path", "/readyz")?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|e| ServerError::InvalidAddress(format!("{addr}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_load_without_file() {
        let loaded = Config::load_from("/nonexistent/conversion-server-config").unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_default_bind_address() {
        let addr = Config::default().socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:9527");
    }

    #[test]
    fn test_invalid_address() {
        let mut cfg = Config::default();
        cfg.server.host = "not a host".to_string();
        assert!(matches!(
            cfg.socket_addr(),
            Err(ServerError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8088
workers = 2

[static_files]
root = "public"

[logging]
format = "json"
access_log_format = "common"

[performance]
max_connections = 64
"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let cfg = Config::load_from(&path).unwrap();

        assert_eq!(cfg.server.port, 8088);
        assert_eq!(cfg.server.workers, Some(2));
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.static_files.root, "public");
        assert_eq!(cfg.static_files.index_file, "index.html");
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.logging.access_log_format, "common");
        assert_eq!(cfg.performance.max_connections, Some(64));
        assert_eq!(cfg.http, HttpConfig::default());
    }
}
