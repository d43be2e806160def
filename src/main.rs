use clap::Parser;
use conversion_server::config::{self, Config};
use conversion_server::{logger, server, ServerError};

/// Conversion endpoints and front-end host
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Config file path, with or without the `.toml` extension
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: String,
}

fn main() -> Result<(), ServerError> {
    let cli = Cli::parse();
    let cfg = Config::load_from(&cli.config)?;

    logger::init(&cfg.logging)?;

    // Worker thread count from server.workers, zero means default
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers.filter(|&w| w > 0) {
        runtime_builder.worker_threads(workers);
        tracing::info!(workers, "Using configured worker threads");
    } else {
        tracing::info!("Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(server::run(cfg)).map_err(|e| {
        tracing::error!(error = %e, "Server exited with error");
        e
    })
}
