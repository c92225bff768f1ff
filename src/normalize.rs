//! Canonical attributes over the provider's per-kind field names.
//!
//! Movies carry `title`/`release_date`, shows carry `name`/`first_air_date`,
//! seasons and episodes carry `name`/`air_date`, and multi-search mixes all of
//! them. Everything downstream reads [`MediaFields`] instead.

use crate::error::{MediaError, Result};
use crate::models::MediaKind;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

pub const RATING_MAX: f64 = 10.0;
pub const YEAR_SENTINEL: &str = "0000";

#[derive(Debug, Default, Deserialize)]
struct RawMedia {
    id: Option<i64>,
    title: Option<String>,
    name: Option<String>,
    overview: Option<String>,
    vote_average: Option<f64>,
    popularity: Option<f64>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    air_date: Option<String>,
    media_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaFields {
    pub id: i64,
    pub title: String,
    pub overview: String,
    /// Raw provider score; see [`clamp_rating`] before exposing it.
    pub vote_average: f64,
    pub popularity: f64,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub date: Option<String>,
    pub media_type: Option<String>,
}

pub fn normalize(raw: &Value, kind: MediaKind) -> Result<MediaFields> {
    if !raw.is_object() {
        return Err(MediaError::transform(format!(
            "expected a {} object, got {}",
            kind,
            json_type(raw)
        )));
    }
    let r = RawMedia::deserialize(raw)
        .map_err(|e| MediaError::transform(format!("{kind} payload: {e}")))?;
    let id = r
        .id
        .ok_or_else(|| MediaError::transform(format!("{kind} payload is missing 'id'")))?;

    let (title, date) = match kind {
        MediaKind::Movie => (
            non_empty(r.title).or(non_empty(r.name)),
            non_empty(r.release_date)
                .or(non_empty(r.first_air_date))
                .or(non_empty(r.air_date)),
        ),
        MediaKind::TvShow => (
            non_empty(r.name).or(non_empty(r.title)),
            non_empty(r.first_air_date)
                .or(non_empty(r.air_date))
                .or(non_empty(r.release_date)),
        ),
    };

    Ok(MediaFields {
        id,
        title: title.unwrap_or_default(),
        overview: r.overview.unwrap_or_default(),
        vote_average: r.vote_average.unwrap_or(0.0),
        popularity: r.popularity.unwrap_or(0.0),
        poster_path: non_empty(r.poster_path),
        backdrop_path: non_empty(r.backdrop_path),
        date,
        media_type: non_empty(r.media_type),
    })
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tie {
    HalfUp,
    HalfDown,
}

pub fn clamp_rating(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, RATING_MAX)
}

/// Clamps to the rating range, then rounds to `places` decimals.
pub fn round_rating(raw: f64, places: u32, tie: Tie) -> f64 {
    let value = clamp_rating(raw);
    let factor = 10f64.powi(places as i32);
    let scaled = value * factor;
    let floor = scaled.floor();
    // Treat representation noise around .5 as an exact tie.
    let rounded = if ((scaled - floor) - 0.5).abs() < 1e-9 {
        match tie {
            Tie::HalfUp => floor + 1.0,
            Tie::HalfDown => floor,
        }
    } else {
        scaled.round()
    };
    rounded / factor
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    None
}

pub fn release_year(date: Option<&str>) -> Option<String> {
    date.and_then(parse_date)
        .map(|d| d.year())
        .filter(|y| (0..=9999).contains(y))
        .map(|y| format!("{y:04}"))
}

pub fn release_year_or_sentinel(date: Option<&str>) -> String {
    release_year(date).unwrap_or_else(|| YEAR_SENTINEL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tv_prefers_name_and_first_air_date() {
        let raw = json!({
            "id": 1396,
            "name": "Breaking Bad",
            "first_air_date": "2008-01-20",
            "vote_average": 8.9,
            "poster_path": "/bb.jpg"
        });
        let f = normalize(&raw, MediaKind::TvShow).unwrap();
        assert_eq!(f.title, "Breaking Bad");
        assert_eq!(f.date.as_deref(), Some("2008-01-20"));
        assert_eq!(f.overview, "");
    }

    #[test]
    fn movie_falls_back_to_name_and_blank_dates_are_absent() {
        let raw = json!({"id": 7, "name": "Odd Payload", "release_date": "", "poster_path": null});
        let f = normalize(&raw, MediaKind::Movie).unwrap();
        assert_eq!(f.title, "Odd Payload");
        assert_eq!(f.date, None);
        assert_eq!(f.poster_path, None);
    }

    #[test]
    fn missing_id_is_a_transform_error() {
        let err = normalize(&json!({"title": "No Id"}), MediaKind::Movie).unwrap_err();
        assert!(matches!(err, MediaError::Transform(_)));
        let err = normalize(&json!([1, 2]), MediaKind::Movie).unwrap_err();
        assert!(matches!(err, MediaError::Transform(_)));
    }

    #[test]
    fn rounds_with_tie_policy() {
        assert_eq!(round_rating(8.433, 2, Tie::HalfDown), 8.43);
        assert_eq!(round_rating(7.125, 2, Tie::HalfDown), 7.12);
        assert_eq!(round_rating(7.125, 2, Tie::HalfUp), 7.13);
        assert_eq!(round_rating(6.45, 1, Tie::HalfUp), 6.5);
        assert_eq!(round_rating(12.0, 2, Tie::HalfUp), 10.0);
        assert_eq!(round_rating(-1.0, 2, Tie::HalfUp), 0.0);
        assert_eq!(round_rating(f64::NAN, 1, Tie::HalfUp), 0.0);
    }

    #[test]
    fn release_year_tolerates_formats() {
        assert_eq!(release_year(Some("1999-10-15")).as_deref(), Some("1999"));
        assert_eq!(
            release_year(Some("2021-03-04T10:00:00Z")).as_deref(),
            Some("2021")
        );
        assert_eq!(
            release_year(Some("2020-01-01 08:30:00")).as_deref(),
            Some("2020")
        );
        assert_eq!(release_year_or_sentinel(Some("soon")), "0000");
        assert_eq!(release_year_or_sentinel(None), "0000");
    }
}
