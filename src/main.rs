//! redis-toolbox - string and list tools over a shared Redis connection
//!
//! Reads JSON tool calls from stdin, one per line, and writes one JSON reply
//! per line to stdout. Logs go to stderr.

// Use jemalloc for better multi-threaded performance
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use redis_toolbox::config::Config;
use redis_toolbox::health::HealthServer;
use redis_toolbox::metrics::Metrics;
use redis_toolbox::session::Session;
use redis_toolbox::store;
use redis_toolbox::tools::Dispatcher;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::runtime::Builder;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize tracing (stdout is reserved for replies)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting redis-toolbox");

    // Load configuration
    let config = if let Some(config_path) = std::env::args().nth(1) {
        info!("Loading configuration from {}", config_path);
        Config::from_file(&config_path)?
    } else {
        info!("Using default configuration (set TOOLBOX_* env vars to customize)");
        Config::from_env()?
    };

    info!("Configuration: {:?}", config);

    let runtime = Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(async_main(config))
}

async fn async_main(config: Config) -> anyhow::Result<()> {
    // Create cancellation token for graceful shutdown
    let cancel_token = CancellationToken::new();

    let store = store::connect(&config.store)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open store: {e}"))?;

    let metrics = Arc::new(Metrics::new());

    // Start health server in separate thread if enabled
    let health_server = if config.metrics.enabled {
        let health = Arc::new(HealthServer::new(Arc::clone(&metrics)));
        let health_clone = Arc::clone(&health);
        let metrics_config = config.metrics.clone();

        std::thread::spawn(move || {
            if let Err(e) = health_clone.run(&metrics_config) {
                error!("Health server error: {}", e);
            }
        });

        Some(health)
    } else {
        None
    };

    // Readiness follows periodic store pings
    match health_server {
        Some(ref health) => {
            let health = Arc::clone(health);
            let store = Arc::clone(&store);
            let interval = Duration::from_secs(config.metrics.readiness_interval_secs.max(1));
            let cancel = cancel_token.clone();
            tokio::spawn(async move {
                health.watch_store(store, interval, cancel).await;
            });
        }
        None => {
            if let Err(e) = store.ping().await {
                warn!("Store did not answer ping: {}", e);
            } else {
                info!("Store is reachable");
            }
        }
    }

    // Setup signal handlers
    let cancel_for_signal = cancel_token.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received SIGINT, shutting down...");
            }
            _ = async {
                #[cfg(unix)]
                {
                    use tokio::signal::unix::{signal, SignalKind};
                    match signal(SignalKind::terminate()) {
                        Ok(mut sigterm) => sigterm.recv().await,
                        Err(e) => {
                            warn!("Failed to install SIGTERM handler: {}", e);
                            std::future::pending::<Option<()>>().await
                        }
                    }
                }
                #[cfg(not(unix))]
                {
                    std::future::pending::<Option<()>>().await
                }
            } => {
                info!("Received SIGTERM, shutting down...");
            }
        }
        cancel_for_signal.cancel();
    });

    let dispatcher = Arc::new(Dispatcher::new(store, Arc::clone(&metrics)));
    let session = Session::new(dispatcher, config.session.clone(), cancel_token);

    if let Err(e) = session
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
    {
        error!("Session error: {}", e);
    }

    if let Some(health) = health_server {
        health.stop();
    }

    info!("redis-toolbox stopped");
    Ok(())
}
