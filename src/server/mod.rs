// Server module entry
// Binds the listener, runs the accept loop and shuts down gracefully

pub mod connection;
pub mod listener;
pub mod signal;

use std::future::Future;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::config::{AppState, Config};
use crate::error::ServerError;
use crate::logger;

// Re-export commonly used items
pub use connection::accept_connection;
pub use listener::create_reusable_listener;
pub use signal::shutdown_signal;

/// How long in-flight connections may run after shutdown starts
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Bind the configured address and serve until SIGINT/SIGTERM
pub async fn run(config: Config) -> Result<(), ServerError> {
    let addr = config.socket_addr()?;
    let listener = create_reusable_listener(addr).map_err(|e| {
        logger::log_error(&format!("Failed to bind {addr}: {e}"));
        e
    })?;

    if !Path::new(&config.static_files.root).is_dir() {
        logger::log_warning(&format!(
            "Static directory '{}' does not exist, front-end requests will return 404",
            config.static_files.root
        ));
    }

    let state = Arc::new(AppState::new(config));
    logger::log_server_start(&addr, &state.config);

    serve(listener, state, shutdown_signal()).await;
    Ok(())
}

/// Accept connections until `shutdown` resolves, then drain open connections
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
            () = &mut shutdown => break,
        }
    }

    drop(listener);
    state.begin_shutdown();
    drain_connections(&state, DRAIN_TIMEOUT).await;
}

/// Wait for open connections to finish, giving up after `timeout`
///
/// Connections still open at the deadline are left to their own timeouts.
async fn drain_connections(state: &AppState, timeout: Duration) {
    let deadline = tokio::time::Instant::now() + timeout;

    while state.active_connections.load(Ordering::SeqCst) > 0
        && tokio::time::Instant::now() < deadline
    {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    logger::log_server_stopped(state.active_connections.load(Ordering::SeqCst));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serve_returns_after_shutdown() {
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let state = Arc::new(AppState::new(Config::default()));

        tokio::time::timeout(Duration::from_secs(5), serve(listener, state, async {}))
            .await
            .expect("serve should stop once shutdown resolves");
    }

    #[tokio::test]
    async fn test_connection_limit() {
        let mut config = Config::default();
        config.performance.max_connections = Some(0);
        let state = Arc::new(AppState::new(config));

        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let (accepted, _client) =
            tokio::join!(listener.accept(), tokio::net::TcpStream::connect(addr));
        let (stream, peer_addr) = accepted.unwrap();

        assert!(!accept_connection(stream, peer_addr, &state));
        assert_eq!(state.active_connections.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_idle_keep_alive_connection_does_not_delay_shutdown() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(AppState::new(Config::default()));

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(serve(listener, Arc::clone(&state), async move {
            let _ = rx.await;
        }));

        let mut client = tokio::net::TcpStream::connect(addr).await.unwrap();
        client
            .write_all(b"GET /healthz HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();
        let mut buf = [0u8; 1024];
        let n = client.read(&mut buf).await.unwrap();
        assert!(buf[..n].starts_with(b"HTTP/1.1 200"));
        assert_eq!(state.active_connections.load(Ordering::SeqCst), 1);

        let started = tokio::time::Instant::now();
        tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(2), server)
            .await
            .expect("idle connection held shutdown open")
            .unwrap();
        assert!(started.elapsed() < DRAIN_TIMEOUT);
        assert_eq!(state.active_connections.load(Ordering::SeqCst), 0);

        // The server closed its side
        assert_eq!(client.read(&mut buf).await.unwrap(), 0);
    }
}
