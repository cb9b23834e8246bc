use domain::gateway::VideoSearch;
use domain::models::{RelatedVideo, VideoSuggestion};
use reqwest::Client;
use serde::Deserialize;
use shared::telemetry::Telemetry;
use shared::types::Result;
use std::sync::Arc;

use crate::config::Config;

const TUTORIAL_RESULTS: u32 = 5;

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: ItemId,
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemId {
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// Keep only items that have both a video id and a thumbnail.
fn related_videos(response: SearchResponse) -> Vec<RelatedVideo> {
    response
        .items
        .into_iter()
        .filter_map(|item| {
            let video_id = item.id.video_id.filter(|id| !id.is_empty())?;
            let thumbnails = item.snippet.thumbnails;
            let thumbnail = thumbnails.high.or(thumbnails.default)?;
            Some(RelatedVideo {
                video_url: watch_url(&video_id),
                thumbnail_url: thumbnail.url,
            })
        })
        .collect()
}

fn suggestions(response: SearchResponse) -> Vec<VideoSuggestion> {
    response
        .items
        .into_iter()
        .map(|item| {
            let video_id = item.id.video_id.unwrap_or_default();
            VideoSuggestion {
                title: item.snippet.title,
                url: watch_url(&video_id),
                thumbnail: item
                    .snippet
                    .thumbnails
                    .default
                    .map(|t| t.url)
                    .unwrap_or_default(),
                video_id,
            }
        })
        .collect()
}

/// YouTube Data API v3 search client.
#[derive(Clone)]
pub struct YouTubeClient {
    client: Arc<Client>,
    base_url: String,
    api_key: Option<String>,
}

impl YouTubeClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client: Arc::new(Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.youtube_base_url, config.youtube_api_key.clone())
    }

    async fn search(&self, params: &[(&str, String)]) -> Result<SearchResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Missing YouTube API key"))?;
        let url = format!("{}/search", self.base_url);
        let timer = Telemetry::new();
        let response = self
            .client
            .get(&url)
            .query(&[("part", "snippet"), ("type", "video"), ("key", api_key)])
            .query(params)
            .send()
            .await?;
        let status = response.status();
        tracing::debug!(status = %status, elapsed_ms = timer.elapsed_ms(), "youtube search");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("YouTube API responded with status {}: {}", status, body));
        }
        Ok(response.json::<SearchResponse>().await?)
    }

    /// Tutorial suggestions for a study plan.
    pub async fn search_tutorials(&self, subject: &str) -> Result<Vec<VideoSuggestion>> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(anyhow::anyhow!("Missing subject"));
        }
        let response = self
            .search(&[
                ("q", format!("{subject} tutorial education")),
                ("maxResults", TUTORIAL_RESULTS.to_string()),
                ("order", "relevance".to_string()),
            ])
            .await?;
        Ok(suggestions(response))
    }
}

impl VideoSearch for YouTubeClient {
    async fn search_videos(&self, query: &str, max_results: u32) -> Option<Vec<RelatedVideo>> {
        if self.api_key.is_none() {
            tracing::error!("YouTube API key is not configured; video suggestions are disabled");
            return None;
        }
        let response = self
            .search(&[
                ("q", query.to_string()),
                ("maxResults", max_results.to_string()),
                ("safeSearch", "strict".to_string()),
            ])
            .await;
        match response {
            Ok(response) => {
                let videos = related_videos(response);
                (!videos.is_empty()).then_some(videos)
            }
            Err(e) => {
                tracing::error!(query, error = %e, "failed to fetch YouTube videos");
                None
            }
        }
    }
}
