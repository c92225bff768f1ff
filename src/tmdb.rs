use crate::config::TmdbConfig;
use crate::error::{MediaError, Result};
use crate::models::{Listing, MediaKind, Scope, TrendingPeriod};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{Datelike, Duration as ChronoDuration, NaiveDate, Utc};
use chrono_tz::Tz;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::future::Future;
use tracing::debug;

const MAX_ERROR_BODY: usize = 512;

/// Raw catalog access. Every call is a single attempt: failures surface
/// immediately and callers decide recovery. Paginated calls take a 1-based
/// `page`; zero is treated as the first page.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    async fn featured(&self, scope: Scope) -> Result<Listing<Value>>;
    async fn trending(
        &self,
        scope: Scope,
        period: TrendingPeriod,
        page: u32,
    ) -> Result<Listing<Value>>;
    async fn airing(&self, scope: Scope, timezone: Tz) -> Result<Listing<Value>>;
    async fn movie_details(&self, id: i64) -> Result<Value>;
    async fn show_details(&self, id: i64) -> Result<Value>;
    async fn related(&self, kind: MediaKind, id: i64) -> Result<Vec<Value>>;
    async fn season(&self, show_id: i64, number: i32) -> Result<Value>;
    async fn watch_providers(&self, kind: MediaKind, id: i64, region: Option<&str>)
        -> Result<Value>;
    async fn search(&self, query: &str, scope: Scope, page: u32) -> Result<Vec<Value>>;
    async fn reviews(&self, kind: MediaKind, id: i64, page: u32) -> Result<Vec<Value>>;
    async fn curated_lists(&self) -> Result<Vec<Value>>;
}

#[derive(Debug)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    account_id: Option<String>,
}

impl TmdbClient {
    pub fn new(cfg: &TmdbConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", cfg.api_key))
            .context("TMDB_API_KEY contains characters not allowed in a header")?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(cfg.connect_timeout)
            .timeout(cfg.timeout)
            .user_agent(format!("cinedex/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build TMDB HTTP client")?;

        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            account_id: cfg.account_id.clone(),
        })
    }

    fn url(&self, version: u8, path: &str, params: &[(&str, String)]) -> String {
        let mut url = format!("{}/{}/{}", self.base_url, version, path);
        if !params.is_empty() {
            url.push('?');
            url.push_str(&encode_query(params));
        }
        url
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        debug!(url = %url, "TMDB request");
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MediaError::Transport(format!("{url}: {e}")))?;
        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| MediaError::Transport(format!("reading body of {url}: {e}")))?;
        if !status.is_success() {
            return Err(MediaError::Upstream {
                status: status.as_u16(),
                url: url.to_string(),
                body: truncate(&text, MAX_ERROR_BODY),
            });
        }
        serde_json::from_str(&text)
            .map_err(|e| MediaError::transform(format!("JSON parse failed for {url}: {e}")))
    }

    async fn get_results(&self, url: &str) -> Result<Vec<Value>> {
        let body = self.get_json(url).await?;
        take_results(body, url)
    }

    async fn discover(&self, kind: MediaKind, mut params: Vec<(&str, String)>) -> Result<Vec<Value>> {
        params.push(("with_original_language", "en".to_string()));
        params.push(("sort_by", "popularity.desc".to_string()));
        let url = self.url(3, &format!("discover/{}", kind.provider_segment()), &params);
        self.get_results(&url).await
    }

    async fn featured_kind(&self, kind: MediaKind) -> Result<Vec<Value>> {
        let params = match kind {
            MediaKind::Movie => vec![("with_release_type", "2|3".to_string())],
            MediaKind::TvShow => Vec::new(),
        };
        self.discover(kind, params).await
    }

    async fn trending_kind(
        &self,
        kind: MediaKind,
        period: TrendingPeriod,
        page: u32,
    ) -> Result<Vec<Value>> {
        let url = self.url(
            3,
            &format!("trending/{}/{}", kind.provider_segment(), period.as_str()),
            &[
                ("page", page.max(1).to_string()),
                ("with_original_language", "en".to_string()),
            ],
        );
        self.get_results(&url).await
    }

    async fn airing_kind(&self, kind: MediaKind, timezone: Tz) -> Result<Vec<Value>> {
        let today = Utc::now().with_timezone(&timezone).date_naive();
        let (start, end) = week_window(today);
        let field = match kind {
            MediaKind::Movie => "primary_release_date",
            MediaKind::TvShow => "air_date",
        };
        let gte = format!("{field}.gte");
        let lte = format!("{field}.lte");
        let params = vec![
            (gte.as_str(), start.format("%Y-%m-%d").to_string()),
            (lte.as_str(), end.format("%Y-%m-%d").to_string()),
            ("timezone", timezone.name().to_string()),
        ];
        self.discover(kind, params).await
    }
}

#[async_trait]
impl MediaProvider for TmdbClient {
    async fn featured(&self, scope: Scope) -> Result<Listing<Value>> {
        per_scope(scope, |kind| self.featured_kind(kind)).await
    }

    async fn trending(
        &self,
        scope: Scope,
        period: TrendingPeriod,
        page: u32,
    ) -> Result<Listing<Value>> {
        per_scope(scope, |kind| self.trending_kind(kind, period, page)).await
    }

    async fn airing(&self, scope: Scope, timezone: Tz) -> Result<Listing<Value>> {
        per_scope(scope, |kind| self.airing_kind(kind, timezone)).await
    }

    async fn movie_details(&self, id: i64) -> Result<Value> {
        let url = self.url(
            3,
            &format!("movie/{id}"),
            &[("append_to_response", "videos".to_string())],
        );
        self.get_json(&url).await
    }

    async fn show_details(&self, id: i64) -> Result<Value> {
        let url = self.url(
            3,
            &format!("tv/{id}"),
            &[("append_to_response", "videos,external_ids".to_string())],
        );
        self.get_json(&url).await
    }

    async fn related(&self, kind: MediaKind, id: i64) -> Result<Vec<Value>> {
        let url = self.url(
            3,
            &format!("{}/{id}/recommendations", kind.provider_segment()),
            &[("language", "en-US".to_string())],
        );
        self.get_results(&url).await
    }

    async fn season(&self, show_id: i64, number: i32) -> Result<Value> {
        let url = self.url(
            3,
            &format!("tv/{show_id}/season/{number}"),
            &[("append_to_response", "videos".to_string())],
        );
        self.get_json(&url).await
    }

    async fn watch_providers(
        &self,
        kind: MediaKind,
        id: i64,
        region: Option<&str>,
    ) -> Result<Value> {
        let url = self.url(
            3,
            &format!("{}/{id}/watch/providers", kind.provider_segment()),
            &[],
        );
        let body = self.get_json(&url).await?;
        match region.map(str::trim).filter(|r| !r.is_empty()) {
            Some(r) => Ok(only_region(body, &r.to_ascii_uppercase())),
            None => Ok(body),
        }
    }

    async fn search(&self, query: &str, scope: Scope, page: u32) -> Result<Vec<Value>> {
        let endpoint = match scope.kind() {
            None => "multi",
            Some(kind) => kind.provider_segment(),
        };
        let url = self.url(
            3,
            &format!("search/{endpoint}"),
            &[
                ("query", query.to_string()),
                ("page", page.max(1).to_string()),
                ("include_adult", "false".to_string()),
            ],
        );
        let results = self.get_results(&url).await?;
        Ok(rank_search_results(results))
    }

    async fn reviews(&self, kind: MediaKind, id: i64, page: u32) -> Result<Vec<Value>> {
        let url = self.url(
            3,
            &format!("{}/{id}/reviews", kind.provider_segment()),
            &[("page", page.max(1).to_string())],
        );
        self.get_results(&url).await
    }

    async fn curated_lists(&self) -> Result<Vec<Value>> {
        let account = self
            .account_id
            .as_deref()
            .ok_or_else(|| MediaError::transform("TMDB account id is not configured"))?;
        let url = self.url(4, &format!("account/{account}/lists"), &[]);
        self.get_results(&url).await
    }
}

/// Issues one call per kind the scope covers; `All` runs both concurrently
/// and fails as soon as either fails.
async fn per_scope<F, Fut>(scope: Scope, fetch: F) -> Result<Listing<Value>>
where
    F: Fn(MediaKind) -> Fut,
    Fut: Future<Output = Result<Vec<Value>>>,
{
    match scope.kind() {
        Some(kind) => Ok(Listing::Single(fetch(kind).await?)),
        None => {
            let (movies, shows) =
                tokio::try_join!(fetch(MediaKind::Movie), fetch(MediaKind::TvShow))?;
            Ok(Listing::Combined { movies, shows })
        }
    }
}

/// Monday through Sunday of the week containing `today`.
pub fn week_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = today - ChronoDuration::days(today.weekday().num_days_from_monday() as i64);
    (monday, monday + ChronoDuration::days(6))
}

/// Keeps entries that carry artwork and are not people, most popular first.
pub fn rank_search_results(results: Vec<Value>) -> Vec<Value> {
    let mut kept: Vec<Value> = results
        .into_iter()
        .filter(|r| r.get("media_type").and_then(Value::as_str) != Some("person"))
        .filter(|r| has_image(r, "poster_path") || has_image(r, "backdrop_path"))
        .collect();
    kept.sort_by(|a, b| {
        popularity(b)
            .partial_cmp(&popularity(a))
            .unwrap_or(Ordering::Equal)
    });
    kept
}

fn has_image(v: &Value, field: &str) -> bool {
    v.get(field)
        .and_then(Value::as_str)
        .is_some_and(|p| !p.trim().is_empty())
}

fn popularity(v: &Value) -> f64 {
    v.get("popularity").and_then(Value::as_f64).unwrap_or(0.0)
}

fn only_region(mut body: Value, region: &str) -> Value {
    let filtered: Map<String, Value> = body
        .get("results")
        .and_then(Value::as_object)
        .and_then(|r| r.get(region))
        .map(|v| Map::from_iter([(region.to_string(), v.clone())]))
        .unwrap_or_default();
    if let Some(obj) = body.as_object_mut() {
        obj.insert("results".to_string(), Value::Object(filtered));
    }
    body
}

fn take_results(body: Value, url: &str) -> Result<Vec<Value>> {
    match body {
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => Ok(items),
            Some(Value::Null) | None => Err(MediaError::transform(format!(
                "{url}: response has no 'results' array"
            ))),
            Some(_) => Err(MediaError::transform(format!(
                "{url}: 'results' is not an array"
            ))),
        },
        _ => Err(MediaError::transform(format!(
            "{url}: expected a JSON object"
        ))),
    }
}

fn encode_query(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn week_window_runs_monday_to_sunday() {
        let wed = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let (start, end) = week_window(wed);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 5, 13).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 5, 19).unwrap());

        let sunday = NaiveDate::from_ymd_opt(2024, 5, 19).unwrap();
        assert_eq!(week_window(sunday).0, start);
        let monday = NaiveDate::from_ymd_opt(2024, 5, 13).unwrap();
        assert_eq!(week_window(monday), (start, end));
    }

    #[test]
    fn ranks_search_results() {
        let ranked = rank_search_results(vec![
            json!({"id": 1, "popularity": 3.0, "poster_path": "/a.jpg"}),
            json!({"id": 2, "popularity": 9.0, "poster_path": null, "backdrop_path": null}),
            json!({"id": 3, "popularity": 7.5, "backdrop_path": "/c.jpg"}),
            json!({"id": 4, "popularity": 99.0, "media_type": "person", "poster_path": "/p.jpg"}),
            json!({"id": 5, "popularity": 5.0, "poster_path": ""}),
        ]);
        let ids: Vec<i64> = ranked.iter().filter_map(|r| r["id"].as_i64()).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn region_filter_keeps_only_requested_region() {
        let body = json!({"id": 1, "results": {"US": {"link": "u"}, "GB": {"link": "g"}}});
        let filtered = only_region(body, "GB");
        assert_eq!(filtered["results"], json!({"GB": {"link": "g"}}));
        let missing = only_region(json!({"id": 1, "results": {"US": {}}}), "FR");
        assert_eq!(missing["results"], json!({}));
    }

    #[test]
    fn query_values_are_encoded() {
        assert_eq!(
            encode_query(&[("query", "fight club".into()), ("with_release_type", "2|3".into())]),
            "query=fight%20club&with_release_type=2%7C3"
        );
    }
}
