//! Provider JSON → display-ready records.
//!
//! [`Transformer::to`] dispatches on a closed [`View`]; each view has one
//! mapping method that is pure over its input. Missing optional fields map to
//! the record defaults, and ratings, years and image URLs are always
//! normalized before a record is returned.

use crate::error::{MediaError, Result};
use crate::images::{ImageSize, ImageUrls};
use crate::models::{
    CuratedList, MediaKind, MediaSummary, MovieDetail, ProviderReview, RegionProviders,
    SearchResult, Trailer, TvEpisode, TvSeason, TvSeasonSummary, TvShowDetail, WatchProvider,
    WatchProviders,
};
use crate::normalize::{normalize, release_year, release_year_or_sentinel, round_rating, Tie};
use crate::text::{escape_html, limit_chars, strip_tags};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

const REVIEW_SUMMARY_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Movie,
    Tv,
    Season,
    MovieSummary,
    TvSummary,
    /// `hint` is used when the payload carries no `media_type`.
    SearchResult { hint: Option<MediaKind> },
    Review,
    CuratedList,
    WatchProviders,
}

impl View {
    pub fn summary(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Movie => View::MovieSummary,
            MediaKind::TvShow => View::TvSummary,
        }
    }
}

impl FromStr for View {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "movie" => Ok(View::Movie),
            "tv" => Ok(View::Tv),
            "season" => Ok(View::Season),
            "movieSummary" => Ok(View::MovieSummary),
            "tvSummary" => Ok(View::TvSummary),
            "searchResult" => Ok(View::SearchResult { hint: None }),
            "review" => Ok(View::Review),
            "customList" => Ok(View::CuratedList),
            "watchProviders" => Ok(View::WatchProviders),
            other => Err(MediaError::unsupported(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Movie(MovieDetail),
    Tv(TvShowDetail),
    Season(TvSeason),
    Summary(MediaSummary),
    SearchResult(SearchResult),
    Review(ProviderReview),
    CuratedList(CuratedList),
    WatchProviders(WatchProviders),
}

#[derive(Debug, Deserialize)]
struct Genre {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Videos {
    results: Option<Vec<Video>>,
}

#[derive(Debug, Deserialize)]
struct Video {
    key: Option<String>,
    name: Option<String>,
    site: Option<String>,
    #[serde(rename = "type")]
    video_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MovieExtras {
    imdb_id: Option<String>,
    tagline: Option<String>,
    runtime: Option<f64>,
    genres: Option<Vec<Genre>>,
    videos: Option<Videos>,
}

#[derive(Debug, Deserialize)]
struct ExternalIds {
    imdb_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ShowExtras {
    external_ids: Option<ExternalIds>,
    tagline: Option<String>,
    status: Option<String>,
    episode_run_time: Option<Vec<f64>>,
    number_of_seasons: Option<i32>,
    seasons: Option<Vec<Value>>,
    genres: Option<Vec<Genre>>,
    videos: Option<Videos>,
    last_episode_to_air: Option<Value>,
    next_episode_to_air: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct SeasonExtras {
    season_number: Option<i32>,
    episode_count: Option<i32>,
    episodes: Option<Vec<Value>>,
    videos: Option<Videos>,
}

#[derive(Debug, Deserialize)]
struct EpisodeExtras {
    season_number: Option<i32>,
    episode_number: Option<i32>,
    runtime: Option<f64>,
    still_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawReview {
    author: Option<String>,
    content: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawList {
    id: Option<i64>,
    name: Option<String>,
    description: Option<String>,
    number_of_items: Option<i64>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawProviders {
    id: Option<i64>,
    results: Option<BTreeMap<String, RawRegion>>,
}

#[derive(Debug, Deserialize)]
struct RawRegion {
    link: Option<String>,
    flatrate: Option<Vec<RawProvider>>,
    rent: Option<Vec<RawProvider>>,
    buy: Option<Vec<RawProvider>>,
    free: Option<Vec<RawProvider>>,
    ads: Option<Vec<RawProvider>>,
}

#[derive(Debug, Deserialize)]
struct RawProvider {
    provider_id: Option<i64>,
    provider_name: Option<String>,
    logo_path: Option<String>,
    display_priority: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct Transformer {
    images: ImageUrls,
}

impl Transformer {
    pub fn new(images: ImageUrls) -> Self {
        Self { images }
    }

    pub fn images(&self) -> &ImageUrls {
        &self.images
    }

    pub fn to(&self, view: &View, raw: &Value) -> Result<Record> {
        Ok(match view {
            View::Movie => Record::Movie(self.movie(raw)?),
            View::Tv => Record::Tv(self.tv_show(raw)?),
            View::Season => Record::Season(self.season(raw)?),
            View::MovieSummary => Record::Summary(self.summary(MediaKind::Movie, raw)?),
            View::TvSummary => Record::Summary(self.summary(MediaKind::TvShow, raw)?),
            View::SearchResult { hint } => Record::SearchResult(self.search_result(raw, *hint)?),
            View::Review => Record::Review(self.review(raw)?),
            View::CuratedList => Record::CuratedList(self.curated_list(raw)?),
            View::WatchProviders => Record::WatchProviders(self.watch_providers(raw)?),
        })
    }

    pub fn movie(&self, raw: &Value) -> Result<MovieDetail> {
        let f = normalize(raw, MediaKind::Movie)?;
        let x: MovieExtras = extract(raw, "movie")?;
        let release_date = f.date.clone().unwrap_or_default();

        Ok(MovieDetail {
            id: f.id,
            kind: MediaKind::Movie,
            title: f.title,
            external_id: x.imdb_id.filter(|s| !s.is_empty()),
            overview: f.overview,
            rating: round_rating(f.vote_average, 2, Tie::HalfUp),
            image_url: self.images.format(f.poster_path.as_deref(), ImageSize::Standard),
            backdrop_url: self.images.format(f.backdrop_path.as_deref(), ImageSize::High),
            release_year: release_year(f.date.as_deref())
                .and_then(|y| y.parse().ok())
                .unwrap_or(0),
            release_date,
            tagline: x.tagline.filter(|s| !s.is_empty()),
            runtime: minutes(x.runtime),
            genres: genre_names(x.genres),
            trailers: trailers(x.videos),
        })
    }

    pub fn tv_show(&self, raw: &Value) -> Result<TvShowDetail> {
        let f = normalize(raw, MediaKind::TvShow)?;
        let x: ShowExtras = extract(raw, "tv")?;

        let seasons = x
            .seasons
            .unwrap_or_default()
            .iter()
            .map(|s| self.season_summary(s))
            .collect::<Result<Vec<_>>>()?;

        Ok(TvShowDetail {
            id: f.id,
            kind: MediaKind::TvShow,
            title: f.title,
            external_id: x
                .external_ids
                .and_then(|e| e.imdb_id)
                .filter(|s| !s.is_empty()),
            overview: f.overview,
            seasons,
            rating: round_rating(f.vote_average, 2, Tie::HalfUp),
            image_url: self.images.format(f.poster_path.as_deref(), ImageSize::Standard),
            release_year: release_year_or_sentinel(f.date.as_deref()),
            release_date: f.date.unwrap_or_default(),
            seasons_count: x.number_of_seasons.unwrap_or(0),
            backdrop_url: self.images.format(f.backdrop_path.as_deref(), ImageSize::High),
            trailers: trailers(x.videos),
            tagline: x.tagline.filter(|s| !s.is_empty()),
            status: x.status.filter(|s| !s.is_empty()),
            runtime: minutes(x.episode_run_time.and_then(|r| r.first().copied())),
            genres: genre_names(x.genres),
            last_episode: self.optional_episode(x.last_episode_to_air.as_ref())?,
            next_episode: self.optional_episode(x.next_episode_to_air.as_ref())?,
        })
    }

    pub fn season(&self, raw: &Value) -> Result<TvSeason> {
        let f = normalize(raw, MediaKind::TvShow)?;
        let x: SeasonExtras = extract(raw, "season")?;
        let episodes = x
            .episodes
            .unwrap_or_default()
            .iter()
            .map(|e| self.episode(e))
            .collect::<Result<Vec<_>>>()?;

        Ok(TvSeason {
            id: f.id,
            title: f.title,
            number: x.season_number.unwrap_or(0),
            rating: round_rating(f.vote_average, 2, Tie::HalfUp),
            episodes,
            trailers: trailers(x.videos),
            image_url: self.images.format(f.poster_path.as_deref(), ImageSize::Standard),
            overview: f.overview,
            air_date: f.date,
        })
    }

    fn season_summary(&self, raw: &Value) -> Result<TvSeasonSummary> {
        let f = normalize(raw, MediaKind::TvShow)?;
        let x: SeasonExtras = extract(raw, "season")?;
        Ok(TvSeasonSummary {
            id: f.id,
            title: f.title,
            number: x.season_number.unwrap_or(0),
            rating: round_rating(f.vote_average, 2, Tie::HalfUp),
            image_url: self.images.format(f.poster_path.as_deref(), ImageSize::Standard),
            overview: f.overview,
            air_date: f.date,
            episode_count: x.episode_count.unwrap_or(0),
        })
    }

    pub fn episode(&self, raw: &Value) -> Result<TvEpisode> {
        let f = normalize(raw, MediaKind::TvShow)?;
        let x: EpisodeExtras = extract(raw, "episode")?;
        Ok(TvEpisode {
            id: f.id,
            title: f.title,
            rating: round_rating(f.vote_average, 2, Tie::HalfUp),
            season: x.season_number.unwrap_or(0),
            episode: x.episode_number.unwrap_or(0),
            runtime: minutes(x.runtime),
            overview: f.overview,
            image_url: self.images.format(x.still_path.as_deref(), ImageSize::Standard),
            air_date: f.date,
        })
    }

    fn optional_episode(&self, raw: Option<&Value>) -> Result<Option<TvEpisode>> {
        match raw {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) if map.is_empty() => Ok(None),
            Some(v) => self.episode(v).map(Some),
        }
    }

    pub fn summary(&self, kind: MediaKind, raw: &Value) -> Result<MediaSummary> {
        let f = normalize(raw, kind)?;
        Ok(MediaSummary {
            id: f.id,
            kind,
            title: escape_html(&f.title),
            overview: escape_html(&f.overview),
            rating: round_rating(f.vote_average, 2, Tie::HalfDown),
            image_url: self.images.format(f.poster_path.as_deref(), ImageSize::Standard),
            release_year: release_year_or_sentinel(f.date.as_deref()),
        })
    }

    pub fn search_result(&self, raw: &Value, hint: Option<MediaKind>) -> Result<SearchResult> {
        let declared = raw.get("media_type").and_then(Value::as_str);
        let kind = match declared {
            Some("tv") | Some("tv-show") => MediaKind::TvShow,
            Some(_) => MediaKind::Movie,
            None => hint.unwrap_or(MediaKind::Movie),
        };
        let f = normalize(raw, kind)?;
        let image = f.poster_path.as_deref().or(f.backdrop_path.as_deref());

        Ok(SearchResult {
            id: f.id,
            kind,
            title: f.title,
            overview: f.overview,
            rating: round_rating(f.vote_average, 1, Tie::HalfUp),
            image_url: self.images.format(image, ImageSize::Standard),
            release_year: release_year_or_sentinel(f.date.as_deref()),
        })
    }

    pub fn review(&self, raw: &Value) -> Result<ProviderReview> {
        let r: RawReview = extract(raw, "review")?;
        let content = r.content.unwrap_or_default();
        Ok(ProviderReview {
            source: "provider".to_string(),
            author: r.author.unwrap_or_default(),
            summary: strip_tags(&limit_chars(&content, REVIEW_SUMMARY_CHARS)),
            content,
            date: r.updated_at.or(r.created_at),
        })
    }

    pub fn curated_list(&self, raw: &Value) -> Result<CuratedList> {
        let l: RawList = extract(raw, "list")?;
        let id = l
            .id
            .ok_or_else(|| MediaError::transform("list payload is missing 'id'"))?;
        let image = l
            .poster_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .or(l.backdrop_path.as_deref());
        Ok(CuratedList {
            id,
            name: l.name.unwrap_or_default(),
            description: l.description.unwrap_or_default(),
            number_of_items: l.number_of_items.unwrap_or(0),
            image_url: self.images.format(image, ImageSize::Medium),
            created_at: l.created_at,
            updated_at: l.updated_at,
        })
    }

    pub fn watch_providers(&self, raw: &Value) -> Result<WatchProviders> {
        let p: RawProviders = extract(raw, "watch providers")?;
        let id = p
            .id
            .ok_or_else(|| MediaError::transform("watch providers payload is missing 'id'"))?;
        let regions = p
            .results
            .unwrap_or_default()
            .into_iter()
            .map(|(code, region)| (code, self.region(region)))
            .collect();
        Ok(WatchProviders { id, regions })
    }

    fn region(&self, raw: RawRegion) -> RegionProviders {
        RegionProviders {
            link: raw.link,
            stream: self.providers(raw.flatrate),
            rent: self.providers(raw.rent),
            buy: self.providers(raw.buy),
            free: self.providers(raw.free),
            ads: self.providers(raw.ads),
        }
    }

    fn providers(&self, raw: Option<Vec<RawProvider>>) -> Vec<WatchProvider> {
        let mut list: Vec<WatchProvider> = raw
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| {
                Some(WatchProvider {
                    id: p.provider_id?,
                    name: p.provider_name.unwrap_or_default(),
                    logo_url: self.images.format(p.logo_path.as_deref(), ImageSize::Standard),
                    priority: p.display_priority.unwrap_or(i32::MAX),
                })
            })
            .collect();
        list.sort_by_key(|p| p.priority);
        list
    }
}

fn extract<T: DeserializeOwned>(raw: &Value, what: &str) -> Result<T> {
    T::deserialize(raw).map_err(|e| MediaError::transform(format!("{what} payload: {e}")))
}

fn minutes(raw: Option<f64>) -> i32 {
    raw.filter(|m| m.is_finite() && *m > 0.0)
        .map(|m| m.round() as i32)
        .unwrap_or(0)
}

fn genre_names(genres: Option<Vec<Genre>>) -> Vec<String> {
    genres
        .unwrap_or_default()
        .into_iter()
        .filter_map(|g| g.name)
        .collect()
}

fn trailers(videos: Option<Videos>) -> Vec<Trailer> {
    videos
        .and_then(|v| v.results)
        .unwrap_or_default()
        .into_iter()
        .filter(|v| v.video_type.as_deref() == Some("Trailer"))
        .map(|v| Trailer {
            key: v.key.unwrap_or_default(),
            name: v.name.unwrap_or_default(),
            site: v.site.unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fight_club() -> Value {
        json!({
            "id": 550,
            "title": "Fight Club",
            "vote_average": 8.433,
            "release_date": "1999-10-15",
            "overview": "A ticking-time-bomb insomniac...",
            "genres": [{"id": 18, "name": "Drama"}, {"id": 53, "name": "Thriller"}],
            "videos": {"results": [
                {"type": "Featurette", "key": "zzz", "name": "Behind", "site": "YouTube"},
                {"type": "Trailer", "key": "abc", "name": "Trailer 1", "site": "YouTube"}
            ]},
            "poster_path": "/x.jpg",
            "backdrop_path": "/y.jpg",
            "runtime": 139,
            "tagline": "Mischief. Mayhem. Soap.",
            "imdb_id": "tt0137523"
        })
    }

    #[test]
    fn fight_club_movie_detail() {
        let t = Transformer::default();
        let m = t.movie(&fight_club()).unwrap();
        assert_eq!(m.id, 550);
        assert_eq!(m.kind, MediaKind::Movie);
        assert_eq!(m.rating, 8.43);
        assert_eq!(m.release_year, 1999);
        assert_eq!(m.release_date, "1999-10-15");
        assert_eq!(m.runtime, 139);
        assert_eq!(m.genres, vec!["Drama", "Thriller"]);
        assert_eq!(m.external_id.as_deref(), Some("tt0137523"));
        assert_eq!(
            m.trailers,
            vec![Trailer {
                key: "abc".into(),
                name: "Trailer 1".into(),
                site: "YouTube".into()
            }]
        );
        assert!(m.image_url.ends_with("/w500/x.jpg"));
        assert!(m.backdrop_url.ends_with("/original/y.jpg"));
    }

    #[test]
    fn movie_without_release_date_has_year_zero() {
        let t = Transformer::default();
        let m = t.movie(&json!({"id": 1, "title": "Untitled"})).unwrap();
        assert_eq!(m.release_year, 0);
        assert_eq!(m.release_date, "");
        let undated = t.movie(&json!({"id": 2, "title": "TBA", "release_date": ""})).unwrap();
        assert_eq!(undated.release_year, 0);
    }

    #[test]
    fn dispatch_through_view_tags() {
        let t = Transformer::default();
        let view: View = "movie".parse().unwrap();
        match t.to(&view, &fight_club()).unwrap() {
            Record::Movie(m) => assert_eq!(m.title, "Fight Club"),
            other => panic!("unexpected record {other:?}"),
        }
        assert_eq!(
            "watchProvider".parse::<View>(),
            Err(MediaError::UnsupportedKind("watchProvider".into()))
        );
    }

    #[test]
    fn null_images_use_placeholder_everywhere() {
        let t = Transformer::default();
        let placeholder = t.images().placeholder().to_string();
        let raw = json!({
            "id": 1, "name": "Show", "poster_path": null, "backdrop_path": null,
            "first_air_date": "2020-01-01",
            "seasons": [{"id": 10, "name": "S1", "season_number": 1, "poster_path": null}],
            "last_episode_to_air": {"id": 5, "name": "Ep", "still_path": null}
        });
        let show = t.tv_show(&raw).unwrap();
        assert_eq!(show.image_url, placeholder);
        assert_eq!(show.backdrop_url, placeholder);
        assert_eq!(show.seasons[0].image_url, placeholder);
        assert_eq!(show.last_episode.as_ref().unwrap().image_url, placeholder);
        assert!(show.next_episode.is_none());

        let summary = t.summary(MediaKind::TvShow, &raw).unwrap();
        assert_eq!(summary.image_url, placeholder);
    }

    #[test]
    fn tv_detail_defaults() {
        let t = Transformer::default();
        let raw = json!({
            "id": 1399,
            "name": "Game of Thrones",
            "vote_average": 8.456,
            "status": "Ended",
            "number_of_seasons": 8,
            "episode_run_time": [],
            "external_ids": {"imdb_id": "tt0944947"},
            "next_episode_to_air": null
        });
        let show = t.tv_show(&raw).unwrap();
        assert_eq!(show.rating, 8.46);
        assert_eq!(show.runtime, 0);
        assert_eq!(show.release_year, "0000");
        assert_eq!(show.release_date, "");
        assert!(show.genres.is_empty());
        assert!(show.trailers.is_empty());
        assert!(show.seasons.is_empty());
        assert_eq!(show.seasons_count, 8);
        assert_eq!(show.status.as_deref(), Some("Ended"));
        assert_eq!(show.external_id.as_deref(), Some("tt0944947"));
    }

    #[test]
    fn summary_escapes_and_rounds_half_down() {
        let t = Transformer::default();
        let raw = json!({
            "id": 9, "title": "Tom & Jerry", "overview": "<cat> vs \"mouse\"",
            "vote_average": 6.125, "release_date": "1940-02-10", "poster_path": "/t.jpg"
        });
        let s = t.summary(MediaKind::Movie, &raw).unwrap();
        assert_eq!(s.title, "Tom &amp; Jerry");
        assert_eq!(s.overview, "&lt;cat&gt; vs &quot;mouse&quot;");
        assert_eq!(s.rating, 6.12);
        assert_eq!(s.release_year, "1940");
        assert_eq!(s.kind, MediaKind::Movie);
    }

    #[test]
    fn search_result_kind_resolution() {
        let t = Transformer::default();
        let tv = json!({"id": 1, "media_type": "tv", "name": "Dark", "first_air_date": "2017-12-01", "vote_average": 8.44, "backdrop_path": "/b.jpg"});
        let r = t.search_result(&tv, Some(MediaKind::Movie)).unwrap();
        assert_eq!(r.kind, MediaKind::TvShow);
        assert_eq!(r.title, "Dark");
        assert_eq!(r.rating, 8.4);
        assert!(r.image_url.ends_with("/w500/b.jpg"));

        let hinted = json!({"id": 2, "name": "Severance", "vote_average": 8.35});
        let r = t.search_result(&hinted, Some(MediaKind::TvShow)).unwrap();
        assert_eq!(r.kind, MediaKind::TvShow);
        assert_eq!(r.title, "Severance");
        assert_eq!(r.rating, 8.4);
        assert_eq!(r.release_year, "0000");

        let bare = json!({"id": 3, "title": "Heat", "release_date": "1995-12-15"});
        assert_eq!(t.search_result(&bare, None).unwrap().kind, MediaKind::Movie);
    }

    #[test]
    fn season_with_episodes_and_trailers() {
        let t = Transformer::default();
        let raw = json!({
            "id": 3624, "name": "Season 1", "season_number": 1, "air_date": "2011-04-17",
            "overview": "", "poster_path": "/s1.jpg", "vote_average": 8.3,
            "episodes": [
                {"id": 63056, "name": "Winter Is Coming", "season_number": 1, "episode_number": 1,
                 "runtime": 62, "air_date": "2011-04-17", "still_path": "/e1.jpg", "vote_average": 7.9},
                {"id": 63057, "name": "The Kingsroad", "season_number": 1, "episode_number": 2,
                 "runtime": null, "air_date": "2011-04-24", "still_path": null}
            ],
            "videos": {"results": [{"type": "Trailer", "key": "k", "name": "S1", "site": "YouTube"}]}
        });
        let s = t.season(&raw).unwrap();
        assert_eq!(s.number, 1);
        assert_eq!(s.episodes.len(), 2);
        assert_eq!(s.episodes[0].runtime, 62);
        assert_eq!(s.episodes[1].runtime, 0);
        assert_eq!(s.episodes[1].episode, 2);
        assert_eq!(s.trailers.len(), 1);
        assert_eq!(s.air_date.as_deref(), Some("2011-04-17"));
    }

    #[test]
    fn review_and_curated_list() {
        let t = Transformer::default();
        let long = format!("<p>{}</p>", "a".repeat(300));
        let r = t
            .review(&json!({"author": "critic", "content": long, "updated_at": "2021-06-01T00:00:00Z"}))
            .unwrap();
        assert_eq!(r.source, "provider");
        assert!(r.summary.ends_with("..."));
        assert!(!r.summary.contains("<p>"));
        assert_eq!(r.date.as_deref(), Some("2021-06-01T00:00:00Z"));

        let l = t
            .curated_list(&json!({
                "id": 8, "name": "Picks", "description": "", "number_of_items": 12,
                "poster_path": null, "backdrop_path": "/bd.jpg",
                "created_at": "2024-01-01 10:00:00 UTC", "updated_at": null
            }))
            .unwrap();
        assert!(l.image_url.ends_with("/w1280/bd.jpg"));
        assert_eq!(l.number_of_items, 12);
    }

    #[test]
    fn watch_providers_sorted_by_priority() {
        let t = Transformer::default();
        let raw = json!({
            "id": 550,
            "results": {
                "US": {
                    "link": "https://www.themoviedb.org/movie/550/watch?locale=US",
                    "flatrate": [
                        {"provider_id": 2, "provider_name": "B", "logo_path": "/b.png", "display_priority": 5},
                        {"provider_id": 1, "provider_name": "A", "logo_path": "/a.png", "display_priority": 1}
                    ]
                }
            }
        });
        let p = t.watch_providers(&raw).unwrap();
        let us = &p.regions["US"];
        assert_eq!(us.stream.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 2]);
        assert!(us.rent.is_empty());
    }
}
