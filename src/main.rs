use anyhow::Result;
use cinedex::cache::MemoryCache;
use cinedex::config::Config;
use cinedex::images::ImageUrls;
use cinedex::job;
use cinedex::tmdb::TmdbClient;
use cinedex::transform::Transformer;
use cinedex::MediaService;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let loaded = dotenv();
    init_tracing();
    match loaded {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => warn!("No .env file loaded ({}) - relying on environment", e),
    }

    let config = Config::from_env()?;
    let client = TmdbClient::new(&config.tmdb)?;
    let cache = Arc::new(MemoryCache::new());
    let service = MediaService::new(
        Arc::new(client),
        cache.clone(),
        Transformer::new(ImageUrls::new(&config.app_url)),
    )
    .with_default_timezone(config.default_timezone);

    info!(
        every_secs = config.refresh_interval.as_secs(),
        timezone = %config.default_timezone,
        "Starting discover refresh loop"
    );
    let sweeper = {
        let cache = cache.clone();
        let every = config.refresh_interval.min(std::time::Duration::from_secs(15 * 60));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let purged = cache.purge_expired();
                if purged > 0 {
                    info!(purged, "Purged expired cache entries");
                }
            }
        })
    };
    job::run_refresh_loop(service, config.refresh_interval, shutdown_signal()).await;
    sweeper.abort();
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
