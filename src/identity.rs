//! Local identity for provider media.
//!
//! Records coming out of the transformer carry the provider's id. Anything
//! that wants to attach its own data (ratings, lists, watch history) resolves
//! them to a stable local identity keyed by `(external_id, kind)`.

use crate::error::{MediaError, Result};
use crate::images::provider_path;
use crate::models::{MediaKind, MediaSummary, MovieDetail, TvShowDetail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// The provider tuple a local record is created or refreshed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    pub external_id: i64,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaIdentity {
    pub id: u64,
    pub external_id: i64,
    pub kind: MediaKind,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub last_synced_at: DateTime<Utc>,
}

#[async_trait]
pub trait MediaIdentityResolver: Send + Sync {
    /// Finds or creates the local record for `media`, refreshing its
    /// descriptive fields. The local id never changes for a given key.
    async fn resolve(&self, media: &MediaRef) -> Result<MediaIdentity>;
    async fn find(&self, external_id: i64, kind: MediaKind) -> Option<MediaIdentity>;
}

pub trait ToMediaRef {
    fn media_ref(&self) -> MediaRef;
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

impl ToMediaRef for MovieDetail {
    fn media_ref(&self) -> MediaRef {
        MediaRef {
            external_id: self.id,
            kind: MediaKind::Movie,
            title: self.title.clone(),
            poster_path: provider_path(&self.image_url),
            release_date: non_empty(&self.release_date),
        }
    }
}

impl ToMediaRef for TvShowDetail {
    fn media_ref(&self) -> MediaRef {
        MediaRef {
            external_id: self.id,
            kind: MediaKind::TvShow,
            title: self.title.clone(),
            poster_path: provider_path(&self.image_url),
            release_date: non_empty(&self.release_date),
        }
    }
}

impl ToMediaRef for MediaSummary {
    fn media_ref(&self) -> MediaRef {
        MediaRef {
            external_id: self.id,
            kind: self.kind,
            title: self.title.clone(),
            poster_path: provider_path(&self.image_url),
            release_date: None,
        }
    }
}

#[derive(Debug)]
pub struct InMemoryMediaIndex {
    next_id: AtomicU64,
    records: DashMap<(i64, MediaKind), MediaIdentity>,
}

impl Default for InMemoryMediaIndex {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            records: DashMap::new(),
        }
    }
}

impl InMemoryMediaIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl MediaIdentityResolver for InMemoryMediaIndex {
    async fn resolve(&self, media: &MediaRef) -> Result<MediaIdentity> {
        if media.external_id <= 0 {
            return Err(MediaError::transform(format!(
                "invalid external id {}",
                media.external_id
            )));
        }
        if media.title.trim().is_empty() {
            return Err(MediaError::transform("media title is empty"));
        }

        let now = Utc::now();
        let mut entry = self
            .records
            .entry((media.external_id, media.kind))
            .or_insert_with(|| MediaIdentity {
                id: self.next_id.fetch_add(1, Ordering::Relaxed),
                external_id: media.external_id,
                kind: media.kind,
                title: String::new(),
                poster_path: None,
                release_date: None,
                last_synced_at: now,
            });
        entry.title = media.title.clone();
        // Keep what we had when the provider no longer sends it.
        if media.poster_path.is_some() {
            entry.poster_path = media.poster_path.clone();
        }
        if media.release_date.is_some() {
            entry.release_date = media.release_date.clone();
        }
        entry.last_synced_at = now;
        Ok(entry.clone())
    }

    async fn find(&self, external_id: i64, kind: MediaKind) -> Option<MediaIdentity> {
        self.records.get(&(external_id, kind)).map(|r| r.clone())
    }
}
