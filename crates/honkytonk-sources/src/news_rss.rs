//! News RSS/Atom feeds.

use crate::{
    error::SourceError,
    html::{decode_entities, first_img_src, strip_html, summarize},
    http::ensure_success,
};
use feed_rs::model::Entry;
use honkytonk_core::models::NewNewsArticle;
use reqwest::Client;

pub const SUMMARY_MAX_CHARS: usize = 300;

#[derive(Debug, Clone)]
pub struct ParsedNewsFeed {
    pub source: String,
    pub articles: Vec<NewNewsArticle>,
}

#[derive(Clone)]
pub struct NewsFeedClient {
    client: Client,
}

impl NewsFeedClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<ParsedNewsFeed, SourceError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "application/rss+xml, application/atom+xml, application/xml;q=0.9, */*;q=0.8",
            )
            .send()
            .await?;
        let bytes = ensure_success(response).await?.bytes().await?;

        let feed = parse_news_feed(&bytes, &fallback_source(url))?;
        tracing::debug!(url, source = %feed.source, articles = feed.articles.len(), "Fetched news feed");
        Ok(feed)
    }
}

/// Host of the feed URL without `www.`, used when the feed has no title.
fn fallback_source(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_else(|| url.to_string())
}

/// Parse a feed into articles. Items without a link or a title are dropped.
pub fn parse_news_feed(bytes: &[u8], fallback_source: &str) -> Result<ParsedNewsFeed, SourceError> {
    let feed = feed_rs::parser::parse(bytes)
        .map_err(|e| SourceError::Parse(format!("news feed: {}", e)))?;

    let source = feed
        .title
        .as_ref()
        .map(|t| strip_html(&t.content))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| fallback_source.to_string());

    let articles = feed
        .entries
        .iter()
        .filter_map(|entry| entry_to_article(entry, &source))
        .collect();

    Ok(ParsedNewsFeed { source, articles })
}

fn entry_to_article(entry: &Entry, source: &str) -> Option<NewNewsArticle> {
    let url = entry
        .links
        .first()
        .map(|l| l.href.trim().to_string())
        .filter(|href| !href.is_empty())?;
    let title = entry
        .title
        .as_ref()
        .map(|t| strip_html(&t.content))
        .filter(|t| !t.is_empty())?;

    let summary_html = entry.summary.as_ref().map(|s| s.content.as_str());
    let content_html = entry.content.as_ref().and_then(|c| c.body.as_deref());

    let summary = summary_html
        .or(content_html)
        .map(strip_html)
        .filter(|s| !s.is_empty())
        .map(|s| summarize(&s, SUMMARY_MAX_CHARS));

    Some(NewNewsArticle {
        url,
        title,
        summary,
        image_url: image_of(entry, content_html, summary_html),
        source: source.to_string(),
        published_at: entry.published.or(entry.updated),
    })
}

/// Media thumbnail, then image media content, then the first `<img>` in the HTML.
fn image_of(entry: &Entry, content_html: Option<&str>, summary_html: Option<&str>) -> Option<String> {
    let thumbnail = entry
        .media
        .iter()
        .flat_map(|m| m.thumbnails.iter())
        .map(|t| decode_entities(&t.image.uri))
        .next();
    if thumbnail.is_some() {
        return thumbnail;
    }

    let image_content = entry
        .media
        .iter()
        .flat_map(|m| m.content.iter())
        .find(|c| {
            c.content_type
                .as_ref()
                .is_some_and(|ct| ct.to_string().starts_with("image/"))
        })
        .and_then(|c| c.url.as_ref().map(|u| u.to_string()));
    if image_content.is_some() {
        return image_content;
    }

    content_html
        .and_then(first_img_src)
        .or_else(|| summary_html.and_then(first_img_src))
}
