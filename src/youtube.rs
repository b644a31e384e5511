//! Client for the YouTube Data API `playlistItems.list` endpoint.
//!
//! https://developers.google.com/youtube/v3/docs/playlistItems/list

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::config::{ApiKeysConfig, Config};
use crate::error::ConvertError;

/// Largest page size `playlistItems.list` accepts.
pub const MAX_RESULTS: u32 = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    pub snippet: PlaylistItemSnippet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItemSnippet {
    pub title: String,
    #[serde(rename = "resourceId")]
    pub resource_id: ResourceId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceId {
    #[serde(rename = "videoId")]
    pub video_id: String,
}

impl PlaylistItem {
    pub fn title(&self) -> &str {
        &self.snippet.title
    }

    pub fn video_id(&self) -> &str {
        &self.snippet.resource_id.video_id
    }
}

#[derive(Debug, Deserialize)]
pub struct PlaylistItemsPage {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
    /// Present when the API reports a failure inside a 2xx response.
    #[serde(default)]
    error: Option<ApiErrorDetail>,
}

impl PlaylistItemsPage {
    /// The cursor for the following page; an empty token means this page was the last.
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_page_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[derive(Clone)]
pub struct YoutubeClient {
    http: Client,
    base_url: String,
    max_pages: usize,
    keys: ApiKeysConfig,
}

impl YoutubeClient {
    /// Takes its key set from `config`, so env overrides must already be applied.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if config.api.request_timeout > 0 {
            builder = builder.timeout(Duration::from_secs(config.api.request_timeout));
        }
        Ok(Self {
            http: builder.build()?,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            max_pages: config.api.max_pages,
            keys: config.api.keys.clone(),
        })
    }

    pub async fn fetch_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        api_key: &str,
    ) -> Result<PlaylistItemsPage, ConvertError> {
        let url = format!("{}/playlistItems", self.base_url);
        let max_results = MAX_RESULTS.to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("maxResults", max_results.as_str()),
            ("playlistId", playlist_id),
            ("key", api_key),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| ConvertError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(ConvertError::Upstream(message));
        }

        let mut page = response
            .json::<PlaylistItemsPage>()
            .await
            .map_err(|e| ConvertError::Internal(e.to_string()))?;
        if let Some(error) = page.error.take() {
            return Err(ConvertError::Upstream(error.message));
        }
        Ok(page)
    }

    /// Walks the cursor chain until the API stops returning one and
    /// concatenates every page in fetch order.
    ///
    /// Any failing page discards whatever was collected so far.
    pub async fn fetch_all_items(
        &self,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistItem>, ConvertError> {
        let mut all_items = Vec::new();
        let mut next_page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let api_key = self
                .keys
                .rotated()
                .ok_or_else(|| ConvertError::Internal("YouTube APIキーが設定されていません".to_string()))?;

            let page = self
                .fetch_page(playlist_id, next_page_token.as_deref(), api_key)
                .await?;
            pages += 1;
            log::debug!(
                "Fetched page {} of playlist {} ({} items)",
                pages,
                playlist_id,
                page.items.len()
            );

            let cursor = page.next_cursor().map(|t| t.to_string());
            all_items.extend(page.items);

            match cursor {
                Some(token) => {
                    if self.max_pages > 0 && pages >= self.max_pages {
                        return Err(ConvertError::Internal(format!(
                            "ページ数の上限({})を超えました",
                            self.max_pages
                        )));
                    }
                    next_page_token = Some(token);
                }
                None => break,
            }
        }

        log::info!(
            "Playlist {}: {} items across {} pages",
            playlist_id,
            all_items.len(),
            pages
        );
        Ok(all_items)
    }
}
