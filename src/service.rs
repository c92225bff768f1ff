use crate::cache::CacheStore;
use crate::error::Result;
use crate::flight::SingleFlight;
use crate::models::{
    CuratedList, Listing, MediaKind, MediaSummary, MovieDetail, ProviderReview, Scope,
    SearchResult, TrendingPeriod, TvSeason, TvShowDetail, WatchProviders,
};
use crate::tmdb::MediaProvider;
use crate::transform::Transformer;
use chrono::{DateTime, Local, TimeZone, Timelike};
use chrono_tz::Tz;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

const HOUR: Duration = Duration::from_secs(60 * 60);
pub const TRENDING_TTL: Duration = Duration::from_secs(6 * 60 * 60);
pub const AIRING_TTL: Duration = Duration::from_secs(12 * 60 * 60);
pub const DETAIL_TTL: Duration = HOUR;
pub const CURATED_TTL: Duration = HOUR;
pub const CURATED_KEY: &str = "lists.curated";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoverCategory {
    Featured,
    Trending,
    Airing,
}

impl DiscoverCategory {
    pub const ALL: [DiscoverCategory; 3] = [
        DiscoverCategory::Featured,
        DiscoverCategory::Trending,
        DiscoverCategory::Airing,
    ];

    fn segment(&self) -> &'static str {
        match self {
            DiscoverCategory::Featured => "featured",
            DiscoverCategory::Trending => "trending",
            DiscoverCategory::Airing => "airing",
        }
    }

    pub fn key(&self, scope: Scope) -> String {
        format!("discover.{}.{}", self.segment(), scope.key_segment())
    }

    pub fn ttl<Z: TimeZone>(&self, now: &DateTime<Z>) -> Duration {
        match self {
            DiscoverCategory::Featured => until_next_day(now),
            DiscoverCategory::Trending => TRENDING_TTL,
            DiscoverCategory::Airing => AIRING_TTL,
        }
    }
}

pub fn detail_key(kind: MediaKind, id: i64) -> String {
    format!("media.{}.{id}", kind.provider_segment())
}

/// Time left until the next midnight in `now`'s timezone.
pub fn until_next_day<Z: TimeZone>(now: &DateTime<Z>) -> Duration {
    let next_midnight = now
        .date_naive()
        .succ_opt()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|d| now.timezone().from_local_datetime(&d).earliest());
    match next_midnight {
        Some(next) => (next - now.clone())
            .to_std()
            .unwrap_or(Duration::from_secs(1)),
        // Midnight skipped by a DST jump: fall back to wall-clock arithmetic.
        None => Duration::from_secs(86_400 - u64::from(now.num_seconds_from_midnight())),
    }
}

/// Application-facing contract over the provider: cached discover and
/// detail lookups, uncached query passthroughs.
#[derive(Clone)]
pub struct MediaService {
    provider: Arc<dyn MediaProvider>,
    transformer: Transformer,
    flight: SingleFlight,
    default_timezone: Tz,
}

impl MediaService {
    pub fn new(
        provider: Arc<dyn MediaProvider>,
        cache: Arc<dyn CacheStore>,
        transformer: Transformer,
    ) -> Self {
        Self {
            provider,
            transformer,
            flight: SingleFlight::new(cache),
            default_timezone: Tz::UTC,
        }
    }

    pub fn with_default_timezone(mut self, timezone: Tz) -> Self {
        self.default_timezone = timezone;
        self
    }

    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        self.flight.cache()
    }

    pub async fn get_featured(&self, scope: Scope) -> Listing<MediaSummary> {
        let category = DiscoverCategory::Featured;
        let provider = self.provider.clone();
        let transformer = self.transformer.clone();
        self.discover(category, scope, category.ttl(&Local::now()), async move {
            let raw = provider.featured(scope).await?;
            summarize(&transformer, scope, raw)
        })
        .await
    }

    pub async fn get_trending(&self, scope: Scope) -> Listing<MediaSummary> {
        let category = DiscoverCategory::Trending;
        let provider = self.provider.clone();
        let transformer = self.transformer.clone();
        self.discover(category, scope, category.ttl(&Local::now()), async move {
            let raw = provider.trending(scope, TrendingPeriod::Day, 1).await?;
            summarize(&transformer, scope, raw)
        })
        .await
    }

    /// Pages past the first are fetched on every call and never cached.
    pub async fn get_trending_page(&self, scope: Scope, page: u32) -> Listing<MediaSummary> {
        if page <= 1 {
            return self.get_trending(scope).await;
        }
        let fetched = self
            .provider
            .trending(scope, TrendingPeriod::Day, page)
            .await
            .and_then(|raw| summarize(&self.transformer, scope, raw));
        fetched.unwrap_or_else(|e| {
            error!(operation = "trending", page, error = %e, "Failed to load trending page");
            Listing::empty(scope)
        })
    }

    /// The airing window follows `timezone`, but entries are cached per
    /// scope only: the first caller's week is served until expiry.
    pub async fn get_airing(&self, scope: Scope, timezone: Option<&str>) -> Listing<MediaSummary> {
        let tz = match timezone.map(str::parse::<Tz>) {
            None => self.default_timezone,
            Some(Ok(tz)) => tz,
            Some(Err(e)) => {
                warn!(timezone = ?timezone, error = %e, "Unknown timezone, using default");
                self.default_timezone
            }
        };
        let category = DiscoverCategory::Airing;
        let provider = self.provider.clone();
        let transformer = self.transformer.clone();
        self.discover(category, scope, category.ttl(&Local::now()), async move {
            let raw = provider.airing(scope, tz).await?;
            summarize(&transformer, scope, raw)
        })
        .await
    }

    pub async fn get_movie_details(&self, id: i64) -> Option<MovieDetail> {
        let provider = self.provider.clone();
        let transformer = self.transformer.clone();
        self.cached(
            "movie details",
            &detail_key(MediaKind::Movie, id),
            DETAIL_TTL,
            async move { transformer.movie(&provider.movie_details(id).await?) },
        )
        .await
    }

    pub async fn get_show_details(&self, id: i64) -> Option<TvShowDetail> {
        let provider = self.provider.clone();
        let transformer = self.transformer.clone();
        self.cached(
            "tv show details",
            &detail_key(MediaKind::TvShow, id),
            DETAIL_TTL,
            async move { transformer.tv_show(&provider.show_details(id).await?) },
        )
        .await
    }

    pub async fn get_curated_lists(&self) -> Vec<CuratedList> {
        let provider = self.provider.clone();
        let transformer = self.transformer.clone();
        self.cached("curated lists", CURATED_KEY, CURATED_TTL, async move {
            provider
                .curated_lists()
                .await?
                .iter()
                .map(|l| transformer.curated_list(l))
                .collect::<Result<Vec<_>>>()
        })
        .await
        .unwrap_or_default()
    }

    pub async fn get_related(&self, kind: MediaKind, id: i64) -> Result<Vec<MediaSummary>> {
        self.provider
            .related(kind, id)
            .await?
            .iter()
            .map(|r| self.transformer.summary(kind, r))
            .collect()
    }

    pub async fn get_season(&self, show_id: i64, number: i32) -> Result<TvSeason> {
        let raw = self.provider.season(show_id, number).await?;
        self.transformer.season(&raw)
    }

    /// A blank query returns no results without calling the provider.
    pub async fn search(
        &self,
        query: &str,
        scope: Scope,
        page: u32,
    ) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.provider
            .search(query, scope, page)
            .await?
            .iter()
            .map(|r| self.transformer.search_result(r, scope.kind()))
            .collect()
    }

    pub async fn get_watch_providers(
        &self,
        kind: MediaKind,
        id: i64,
        region: Option<&str>,
    ) -> Result<WatchProviders> {
        let raw = self.provider.watch_providers(kind, id, region).await?;
        self.transformer.watch_providers(&raw)
    }

    pub async fn get_reviews(
        &self,
        kind: MediaKind,
        id: i64,
        page: u32,
    ) -> Result<Vec<ProviderReview>> {
        self.provider
            .reviews(kind, id, page)
            .await?
            .iter()
            .map(|r| self.transformer.review(r))
            .collect()
    }

    /// Forgets every featured/trending/airing entry for every scope. A
    /// computation still running for one of those keys is detached, so the
    /// next call always goes upstream.
    pub async fn clear_cache(&self) -> &Self {
        let mut removed = 0;
        for category in DiscoverCategory::ALL {
            for scope in Scope::ALL {
                if self.flight.forget(&category.key(scope)).await {
                    removed += 1;
                }
            }
        }
        info!(removed, "Cleared discover caches");
        self
    }

    async fn discover<Fut>(
        &self,
        category: DiscoverCategory,
        scope: Scope,
        ttl: Duration,
        compute: Fut,
    ) -> Listing<MediaSummary>
    where
        Fut: Future<Output = Result<Listing<MediaSummary>>> + Send + 'static,
    {
        self.cached(category.segment(), &category.key(scope), ttl, compute)
            .await
            .unwrap_or_else(|| Listing::empty(scope))
    }

    /// Get-or-compute; failures are logged and come back as `None`.
    async fn cached<T, Fut>(
        &self,
        operation: &str,
        key: &str,
        ttl: Duration,
        compute: Fut,
    ) -> Option<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        match self.flight.remember(key, ttl, move || compute).await {
            Ok(value) => Some(value),
            Err(e) => {
                error!(operation, key = %key, error = %e, "Failed to load {}", operation);
                None
            }
        }
    }
}

fn summarize(
    transformer: &Transformer,
    scope: Scope,
    raw: Listing<serde_json::Value>,
) -> Result<Listing<MediaSummary>> {
    raw.try_map(scope.kind().unwrap_or(MediaKind::Movie), |kind, item| {
        transformer.summary(kind, &item)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};

    #[test]
    fn keys_follow_dotted_scheme() {
        assert_eq!(
            DiscoverCategory::Featured.key(Scope::Movies),
            "discover.featured.movies"
        );
        assert_eq!(DiscoverCategory::Airing.key(Scope::All), "discover.airing.all");
        assert_eq!(detail_key(MediaKind::Movie, 42), "media.movie.42");
        assert_eq!(detail_key(MediaKind::TvShow, 1399), "media.tv.1399");
    }

    #[test]
    fn featured_expires_at_next_local_midnight() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = tz
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(2024, 3, 9)
                    .unwrap()
                    .and_hms_opt(22, 30, 0)
                    .unwrap(),
            )
            .unwrap();
        assert_eq!(
            DiscoverCategory::Featured.ttl(&now),
            Duration::from_secs(90 * 60)
        );
        assert_eq!(DiscoverCategory::Trending.ttl(&now), TRENDING_TTL);
        assert_eq!(DiscoverCategory::Airing.ttl(&now), AIRING_TTL);
    }
}
