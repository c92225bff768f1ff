use crate::error::MediaError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv-show")]
    TvShow,
}

impl MediaKind {
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::TvShow => "tv-show",
        }
    }

    /// Path segment the provider uses for this kind.
    pub fn provider_segment(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::TvShow => "tv",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MediaKind {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" | "movies" => Ok(MediaKind::Movie),
            "tv-show" | "tv" | "show" | "shows" => Ok(MediaKind::TvShow),
            other => Err(MediaError::unsupported(other)),
        }
    }
}

/// Selector for discover and search operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    #[default]
    All,
    Movies,
    Shows,
}

impl Scope {
    pub const ALL: [Scope; 3] = [Scope::All, Scope::Movies, Scope::Shows];

    /// Segment used in cache keys.
    pub fn key_segment(&self) -> &'static str {
        match self {
            Scope::All => "all",
            Scope::Movies => "movies",
            Scope::Shows => "shows",
        }
    }

    pub fn kind(&self) -> Option<MediaKind> {
        match self {
            Scope::All => None,
            Scope::Movies => Some(MediaKind::Movie),
            Scope::Shows => Some(MediaKind::TvShow),
        }
    }
}

impl From<MediaKind> for Scope {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Movie => Scope::Movies,
            MediaKind::TvShow => Scope::Shows,
        }
    }
}

impl FromStr for Scope {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Scope::All);
        }
        s.parse::<MediaKind>().map(Scope::from)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendingPeriod {
    #[default]
    Day,
    Week,
}

impl TrendingPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendingPeriod::Day => "day",
            TrendingPeriod::Week => "week",
        }
    }
}

/// Discover collections: both kinds side by side for `Scope::All`, a flat
/// list otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Combined { movies: Vec<T>, shows: Vec<T> },
    Single(Vec<T>),
}

impl<T> Listing<T> {
    pub fn empty(scope: Scope) -> Self {
        match scope {
            Scope::All => Listing::Combined {
                movies: Vec::new(),
                shows: Vec::new(),
            },
            _ => Listing::Single(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Listing::Combined { movies, shows } => movies.len() + shows.len(),
            Listing::Single(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maps each item, tagging it with the kind of the list it sits in.
    /// `single_kind` names the kind of a `Single` list.
    pub fn try_map<U, E>(
        self,
        single_kind: MediaKind,
        mut f: impl FnMut(MediaKind, T) -> Result<U, E>,
    ) -> Result<Listing<U>, E> {
        Ok(match self {
            Listing::Combined { movies, shows } => Listing::Combined {
                movies: movies
                    .into_iter()
                    .map(|m| f(MediaKind::Movie, m))
                    .collect::<Result<_, _>>()?,
                shows: shows
                    .into_iter()
                    .map(|s| f(MediaKind::TvShow, s))
                    .collect::<Result<_, _>>()?,
            },
            Listing::Single(items) => Listing::Single(
                items
                    .into_iter()
                    .map(|i| f(single_kind, i))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trailer {
    pub key: String,
    pub name: String,
    pub site: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetail {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub title: String,
    pub external_id: Option<String>,
    pub overview: String,
    pub rating: f64,
    pub image_url: String,
    pub backdrop_url: String,
    /// Numeric year; `0` when the release date is missing or unparseable.
    pub release_year: i32,
    pub release_date: String,
    pub tagline: Option<String>,
    pub runtime: i32,
    pub genres: Vec<String>,
    pub trailers: Vec<Trailer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TvShowDetail {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub title: String,
    pub external_id: Option<String>,
    pub overview: String,
    pub seasons: Vec<TvSeasonSummary>,
    pub rating: f64,
    pub image_url: String,
    pub release_year: String,
    pub release_date: String,
    pub seasons_count: i32,
    pub backdrop_url: String,
    pub trailers: Vec<Trailer>,
    pub tagline: Option<String>,
    pub status: Option<String>,
    pub runtime: i32,
    pub genres: Vec<String>,
    pub last_episode: Option<TvEpisode>,
    pub next_episode: Option<TvEpisode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TvSeasonSummary {
    pub id: i64,
    pub title: String,
    pub number: i32,
    pub rating: f64,
    pub image_url: String,
    pub overview: String,
    pub air_date: Option<String>,
    pub episode_count: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TvSeason {
    pub id: i64,
    pub title: String,
    pub number: i32,
    pub rating: f64,
    pub episodes: Vec<TvEpisode>,
    pub trailers: Vec<Trailer>,
    pub image_url: String,
    pub overview: String,
    pub air_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TvEpisode {
    pub id: i64,
    pub title: String,
    pub rating: f64,
    pub season: i32,
    pub episode: i32,
    pub runtime: i32,
    pub overview: String,
    pub image_url: String,
    pub air_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSummary {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub title: String,
    pub overview: String,
    pub rating: f64,
    pub image_url: String,
    pub release_year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub title: String,
    pub overview: String,
    pub rating: f64,
    pub image_url: String,
    pub release_year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CuratedList {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub number_of_items: i64,
    pub image_url: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderReview {
    pub source: String,
    pub author: String,
    pub summary: String,
    pub content: String,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchProvider {
    pub id: i64,
    pub name: String,
    pub logo_url: String,
    pub priority: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RegionProviders {
    pub link: Option<String>,
    pub stream: Vec<WatchProvider>,
    pub rent: Vec<WatchProvider>,
    pub buy: Vec<WatchProvider>,
    pub free: Vec<WatchProvider>,
    pub ads: Vec<WatchProvider>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchProviders {
    pub id: i64,
    pub regions: BTreeMap<String, RegionProviders>,
}
