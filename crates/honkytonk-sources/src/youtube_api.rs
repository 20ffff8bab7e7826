//! YouTube Data API v3: channel resolution and view counts.

use crate::{error::SourceError, http::ensure_success};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

/// The API accepts at most 50 ids per `videos` call.
pub const STATISTICS_BATCH_SIZE: usize = 50;

/// What the user typed when registering a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRef {
    /// A `UC…` channel id
    Id(String),
    /// A handle, always with the leading `@`
    Handle(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChannel {
    pub channel_id: String,
    pub title: String,
    pub handle: Option<String>,
}

/// `UC` followed by 22 URL-safe base64 characters.
pub fn is_channel_id(value: &str) -> bool {
    value.len() == 24
        && value.starts_with("UC")
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Accepts `UC…`, `@handle`, `handle`, `https://www.youtube.com/channel/UC…` and
/// `https://www.youtube.com/@handle` (with or without scheme, trailing path or query).
pub fn parse_channel_input(input: &str) -> Result<ChannelRef, SourceError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SourceError::Parse("channel input is empty".to_string()));
    }

    if let Some((_, rest)) = trimmed.split_once("/channel/") {
        let id = first_segment(rest);
        return if is_channel_id(id) {
            Ok(ChannelRef::Id(id.to_string()))
        } else {
            Err(SourceError::Parse(format!("invalid channel id in URL: {}", id)))
        };
    }

    if let Some((_, rest)) = trimmed.split_once("/@") {
        return handle_ref(first_segment(rest));
    }

    if is_channel_id(trimmed) {
        return Ok(ChannelRef::Id(trimmed.to_string()));
    }

    if trimmed.contains('/') || trimmed.contains(' ') {
        return Err(SourceError::Parse(format!(
            "unrecognized channel input: {}",
            trimmed
        )));
    }

    handle_ref(trimmed.trim_start_matches('@'))
}

fn first_segment(rest: &str) -> &str {
    rest.split(['/', '?', '#']).next().unwrap_or_default()
}

fn handle_ref(name: &str) -> Result<ChannelRef, SourceError> {
    if name.is_empty() {
        return Err(SourceError::Parse("channel handle is empty".to_string()));
    }
    Ok(ChannelRef::Handle(format!("@{}", name)))
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    id: String,
    snippet: ChannelSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelSnippet {
    title: String,
    #[serde(default)]
    custom_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    #[serde(default)]
    statistics: Option<VideoStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    #[serde(default)]
    view_count: Option<String>,
}

#[derive(Clone)]
pub struct YouTubeApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YouTubeApiClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Look up a channel's id, title and handle.
    #[tracing::instrument(skip(self))]
    pub async fn resolve_channel(&self, input: &str) -> Result<ResolvedChannel, SourceError> {
        let (param, value) = match parse_channel_input(input)? {
            ChannelRef::Id(id) => ("id", id),
            ChannelRef::Handle(handle) => ("forHandle", handle),
        };

        let url = format!("{}/youtube/v3/channels", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                (param, value.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let list: ListResponse<ChannelItem> = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("channels response: {}", e)))?;

        let item = list
            .items
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::NotFound(format!("YouTube channel {}", value)))?;

        Ok(ResolvedChannel {
            channel_id: item.id,
            title: item.snippet.title,
            handle: item.snippet.custom_url.map(|h| {
                if h.starts_with('@') {
                    h
                } else {
                    format!("@{}", h)
                }
            }),
        })
    }

    /// View counts keyed by video id. Ids the API does not return are absent.
    #[tracing::instrument(skip(self, video_ids), fields(videos = video_ids.len()))]
    pub async fn video_statistics(
        &self,
        video_ids: &[String],
    ) -> Result<HashMap<String, i64>, SourceError> {
        let mut views = HashMap::with_capacity(video_ids.len());
        let url = format!("{}/youtube/v3/videos", self.base_url);

        for chunk in video_ids.chunks(STATISTICS_BATCH_SIZE) {
            let ids = chunk.join(",");
            let response = self
                .client
                .get(&url)
                .query(&[
                    ("part", "statistics"),
                    ("id", ids.as_str()),
                    ("key", self.api_key.as_str()),
                ])
                .send()
                .await?;

            let list: ListResponse<VideoItem> = ensure_success(response)
                .await?
                .json()
                .await
                .map_err(|e| SourceError::Parse(format!("videos response: {}", e)))?;

            for item in list.items {
                if let Some(count) = item
                    .statistics
                    .and_then(|s| s.view_count)
                    .and_then(|v| v.parse::<i64>().ok())
                {
                    views.insert(item.id, count);
                }
            }
        }

        Ok(views)
    }
}
