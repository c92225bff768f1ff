use crate::models::{Listing, MediaSummary, Scope};
use crate::service::MediaService;
use std::future::Future;
use std::time::Duration;
use tracing::info;

/// Drops every discover entry and warms the combined featured listing.
pub async fn refresh_discover(service: &MediaService) -> Listing<MediaSummary> {
    info!("Refreshing discover caches");
    let featured = service.clear_cache().await.get_featured(Scope::All).await;
    info!(items = featured.len(), "Discover caches refreshed");
    featured
}

/// Runs [`refresh_discover`] immediately and then every `every` until
/// `shutdown` resolves.
pub async fn run_refresh_loop<S>(service: MediaService, every: Duration, shutdown: S)
where
    S: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                refresh_discover(&service).await;
            }
            _ = &mut shutdown => {
                info!("Refresh loop stopping");
                break;
            }
        }
    }
}
