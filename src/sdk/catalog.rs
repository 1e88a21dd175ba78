//! Content fetch: video lists and playlists

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::Playlist;
use super::{SdkError, Sessions};

#[derive(Clone, Debug, PartialEq)]
pub struct VideoItem {
    pub id: String,
    pub title: String,
    pub author: String,
    pub duration_ms: u32,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default)]
pub struct FilteredVideosRequest {
    pub limit: Option<usize>,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct FilteredPlaylistSpec {
    pub tags: Vec<String>,
}

#[async_trait]
pub trait VideoService: Send + Sync {
    /// Newest first.
    async fn get_list(&self, request: &FilteredVideosRequest) -> Result<Vec<VideoItem>, SdkError>;
    async fn load_playlist(&self, spec: &FilteredPlaylistSpec) -> Result<Playlist, SdkError>;
    /// Metadata lookup for ids carried by a playlist.
    async fn video(&self, id: &str) -> Option<VideoItem>;
}

/// In-memory catalog standing in for the hosted video backend.
pub struct DemoCatalog {
    sessions: Sessions,
    videos: Vec<VideoItem>,
    latency: Duration,
}

const TITLES: &[&str] = &[
    "Morning surf", "City lights", "Latte art", "Trail run", "Street food",
    "Skate park", "Rainy window", "Night market", "Sunset pier", "Studio jam",
];

impl DemoCatalog {
    pub fn new(sessions: Sessions, size: usize) -> Self {
        let now = Utc::now();
        let videos = (0..size)
            .map(|i| VideoItem {
                id: format!("clip-{:02}", i + 1),
                title: TITLES[i % TITLES.len()].to_string(),
                author: format!("creator{}", i % 4 + 1),
                duration_ms: 8_000 + (i as u32 % 5) * 3_000,
                tags: if i % 3 == 0 { vec!["featured".to_string()] } else { Vec::new() },
                created_at: now - chrono::Duration::minutes(i as i64 * 7),
            })
            .collect();

        Self {
            sessions,
            videos,
            latency: Duration::from_millis(250),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn matching(&self, tags: &[String]) -> Vec<VideoItem> {
        let mut videos: Vec<VideoItem> = self
            .videos
            .iter()
            .filter(|v| tags.iter().all(|t| v.tags.contains(t)))
            .cloned()
            .collect();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        videos
    }
}

#[async_trait]
impl VideoService for DemoCatalog {
    async fn get_list(&self, request: &FilteredVideosRequest) -> Result<Vec<VideoItem>, SdkError> {
        self.sessions.ensure_started()?;
        tokio::time::sleep(self.latency).await;

        let mut videos = self.matching(&request.tags);
        if let Some(limit) = request.limit {
            videos.truncate(limit);
        }
        tracing::debug!(count = videos.len(), limit = ?request.limit, "Video list fetched");
        Ok(videos)
    }

    async fn load_playlist(&self, spec: &FilteredPlaylistSpec) -> Result<Playlist, SdkError> {
        self.sessions.ensure_started()?;
        tokio::time::sleep(self.latency).await;

        let ids = self.matching(&spec.tags).into_iter().map(|v| v.id).collect();
        let playlist = Playlist::from_ids(ids).map_err(|e| SdkError::Request(e.to_string()))?;
        tracing::debug!(size = playlist.len(), "Playlist loaded");
        Ok(playlist)
    }

    async fn video(&self, id: &str) -> Option<VideoItem> {
        self.videos.iter().find(|v| v.id == id).cloned()
    }
}
