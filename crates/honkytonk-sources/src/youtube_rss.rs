//! YouTube channel upload feeds (`/feeds/videos.xml?channel_id=…`).

use crate::{error::SourceError, http::ensure_success};
use chrono::{DateTime, Utc};
use feed_rs::model::Entry;
use reqwest::Client;

/// One upload as listed in a channel feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedVideo {
    pub video_id: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: String,
    pub published_at: DateTime<Utc>,
    pub view_count: Option<i64>,
}

impl FeedVideo {
    /// YouTube Shorts are tagged `#shorts` in the title or description.
    pub fn is_short(&self) -> bool {
        let tagged = |s: &str| s.to_lowercase().contains("#shorts");
        tagged(&self.title) || self.description.as_deref().is_some_and(tagged)
    }
}

#[derive(Clone)]
pub struct YouTubeRssClient {
    client: Client,
    base_url: String,
}

impl YouTubeRssClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_channel(&self, channel_id: &str) -> Result<Vec<FeedVideo>, SourceError> {
        let url = format!("{}/feeds/videos.xml", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("channel_id", channel_id)])
            .send()
            .await?;
        let bytes = ensure_success(response).await?.bytes().await?;

        let videos = parse_channel_feed(&bytes)?;
        tracing::debug!(channel_id, videos = videos.len(), "Fetched channel feed");
        Ok(videos)
    }
}

/// Parse a channel's Atom feed. Entries without a video id or publish time are dropped.
pub fn parse_channel_feed(bytes: &[u8]) -> Result<Vec<FeedVideo>, SourceError> {
    let feed = feed_rs::parser::parse(bytes)
        .map_err(|e| SourceError::Parse(format!("channel feed: {}", e)))?;

    Ok(feed.entries.iter().filter_map(entry_to_video).collect())
}

fn entry_to_video(entry: &Entry) -> Option<FeedVideo> {
    let video_id = video_id_of(entry)?;
    let published_at = entry.published.or(entry.updated)?;
    let media = entry.media.first();

    let title = entry
        .title
        .as_ref()
        .map(|t| t.content.trim().to_string())
        .or_else(|| media.and_then(|m| m.title.as_ref()).map(|t| t.content.trim().to_string()))
        .unwrap_or_default();

    let description = media
        .and_then(|m| m.description.as_ref())
        .map(|d| d.content.trim().to_string())
        .filter(|d| !d.is_empty());

    let thumbnail_url = media
        .and_then(|m| m.thumbnails.first())
        .map(|t| t.image.uri.clone())
        .unwrap_or_else(|| fallback_thumbnail(&video_id));

    let view_count = media
        .and_then(|m| m.community.as_ref())
        .and_then(|c| c.stats_views)
        .and_then(|v| i64::try_from(v).ok());

    Some(FeedVideo {
        video_id,
        title,
        description,
        thumbnail_url,
        published_at,
        view_count,
    })
}

/// `yt:video:<ID>` from the entry id, else the `v` parameter of the watch link.
fn video_id_of(entry: &Entry) -> Option<String> {
    if let Some(id) = entry.id.strip_prefix("yt:video:") {
        if !id.is_empty() {
            return Some(id.to_string());
        }
    }

    entry
        .links
        .iter()
        .find_map(|link| watch_param(&link.href))
}

fn watch_param(href: &str) -> Option<String> {
    let (_, query) = href.split_once("watch?")?;
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("v="))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

pub fn fallback_thumbnail(video_id: &str) -> String {
    format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", video_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const CHANNEL_ID: &str = "UCxxxxxxxxxxxxxxxxxxxxxx";

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns:yt="http://www.youtube.com/xml/schemas/2015" xmlns:media="http://search.yahoo.com/mrss/" xmlns="http://www.w3.org/2005/Atom">
 <id>yt:channel:UCxxxxxxxxxxxxxxxxxxxxxx</id>
 <title>Cody Johnson</title>
 <published>2015-01-01T00:00:00+00:00</published>
 <entry>
  <id>yt:video:abc123DEF45</id>
  <yt:videoId>abc123DEF45</yt:videoId>
  <title>Cody Johnson - Dirt Cheap (Official Music Video)</title>
  <link rel="alternate" href="https://www.youtube.com/watch?v=abc123DEF45"/>
  <published>2024-05-01T16:00:00+00:00</published>
  <updated>2024-05-02T10:00:00+00:00</updated>
  <media:group>
   <media:title>Cody Johnson - Dirt Cheap (Official Music Video)</media:title>
   <media:thumbnail url="https://i2.ytimg.com/vi/abc123DEF45/hqdefault.jpg" width="480" height="360"/>
   <media:description>Stream Dirt Cheap now.</media:description>
   <media:community>
    <media:starRating count="100" average="5.00" min="1" max="5"/>
    <media:statistics views="123456"/>
   </media:community>
  </media:group>
 </entry>
 <entry>
  <id>tag:example,2024:entry</id>
  <title>Behind the scenes #Shorts</title>
  <link rel="alternate" href="https://www.youtube.com/watch?v=short00001&amp;feature=share"/>
  <published>2024-05-03T16:00:00+00:00</published>
 </entry>
 <entry>
  <id>tag:example,2024:no-video</id>
  <title>Community post</title>
  <link rel="alternate" href="https://www.youtube.com/post/123"/>
  <published>2024-05-03T16:00:00+00:00</published>
 </entry>
</feed>"#;

    #[test]
    fn test_parse_channel_feed() {
        let videos = parse_channel_feed(FEED.as_bytes()).unwrap();
        assert_eq!(videos.len(), 2);

        let first = &videos[0];
        assert_eq!(first.video_id, "abc123DEF45");
        assert_eq!(first.title, "Cody Johnson - Dirt Cheap (Official Music Video)");
        assert_eq!(first.description.as_deref(), Some("Stream Dirt Cheap now."));
        assert_eq!(
            first.thumbnail_url,
            "https://i2.ytimg.com/vi/abc123DEF45/hqdefault.jpg"
        );
        assert_eq!(first.view_count, Some(123456));
        assert!(!first.is_short());

        let second = &videos[1];
        assert_eq!(second.video_id, "short00001");
        assert_eq!(
            second.thumbnail_url,
            "https://i.ytimg.com/vi/short00001/hqdefault.jpg"
        );
        assert!(second.is_short());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_channel_feed(b"not a feed"),
            Err(SourceError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_channel_from_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/feeds/videos.xml")
            .match_query(Matcher::UrlEncoded("channel_id".into(), CHANNEL_ID.into()))
            .with_status(200)
            .with_header("content-type", "application/atom+xml")
            .with_body(FEED)
            .create_async()
            .await;

        let client = YouTubeRssClient::new(Client::new(), server.url());
        let videos = client.fetch_channel(CHANNEL_ID).await.unwrap();
        assert_eq!(videos.len(), 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_channel_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/feeds/videos.xml")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body("Not Found")
            .create_async()
            .await;

        let client = YouTubeRssClient::new(Client::new(), server.url());
        let err = client.fetch_channel(CHANNEL_ID).await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
    }
}
