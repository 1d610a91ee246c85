use anyhow::{Context, Result};
use avatar_signal_proxy::{
    create_router, AppState, AvatarFetcher, AvatarFetcherConfig, Config, GravatarUrlBuilder,
    PgSignalStore, PgSignalStoreConfig, SignalStore,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize rustls crypto provider
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    // Load environment variables
    dotenv::dotenv().ok();

    if std::env::var("TOKIO_CONSOLE").is_ok() {
        console_subscriber::init();
        info!("tokio-console enabled on port 6669");
    } else {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,avatar_signal_proxy=debug,tower_http=debug")
        });
        fmt().with_env_filter(env_filter).with_target(true).init();
    }

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: bind={}, database={}, record_signals={}, gravatar={}",
        config.bind_addr,
        config.database_url_masked().as_deref().unwrap_or("<none>"),
        config.record_signals,
        config.gravatar_base_url
    );

    let signal_store = if config.record_signals {
        let database_url = config
            .database_url
            .clone()
            .context("DATABASE_URL is required when RECORD_SIGNALS is enabled")?;
        let mut store_config = PgSignalStoreConfig::new(database_url);
        store_config.max_connections = config.database_max_connections;

        let store = PgSignalStore::connect(&store_config)
            .await
            .context("Failed to connect to signal database")?;
        store
            .ensure_schema()
            .await
            .context("Failed to prepare Signal table")?;
        Some(store)
    } else {
        warn!("Signal recording disabled, avatars will be proxied without tracking");
        None
    };

    let fetcher = AvatarFetcher::new(AvatarFetcherConfig {
        timeout: config.upstream_timeout,
    })?;

    let state = AppState::new(
        GravatarUrlBuilder::new(config.gravatar_base_url.clone()),
        fetcher,
        signal_store
            .clone()
            .map(|store| Arc::new(store) as Arc<dyn SignalStore>),
    );
    let app = create_router(state);

    // Ctrl+C cancels the token; the server drains once it is cancelled
    let cancellation_token = CancellationToken::new();
    let signal_token = cancellation_token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received, stopping server...");
                signal_token.cancel();
            }
            Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
        }
    });
    let shutdown_signal = cancellation_token.clone().cancelled_owned();

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Avatar proxy listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server stopped, releasing resources...");

    if let Some(store) = signal_store {
        store.close().await;
        info!("Database connections closed");
    }

    info!("Clean shutdown complete");

    Ok(())
}
