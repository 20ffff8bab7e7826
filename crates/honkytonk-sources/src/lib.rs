//! Clients and parsers for every upstream data source
//!
//! - YouTube channel RSS feeds and the YouTube Data API
//! - The chart page, reduced to text and parsed by an OpenAI chat completion
//! - The Apify dataset holding the Top-30 list
//! - News RSS/Atom feeds
//!
//! Every client takes its base URL from configuration so tests can point it at a mock server.

pub mod apify;
pub mod chart;
pub mod error;
pub mod html;
pub mod http;
mod lenient;
pub mod news_rss;
pub mod openai;
pub mod youtube_api;
pub mod youtube_rss;

pub use apify::{normalize_top30, ApifyClient, ApifyItem, ApifySource};
pub use chart::{validate_chart_entries, ChartPageClient, ParsedChart, RawChartEntry};
pub use error::SourceError;
pub use html::reduce_html;
pub use http::build_client;
pub use news_rss::{parse_news_feed, NewsFeedClient, ParsedNewsFeed};
pub use openai::OpenAiChartParser;
pub use youtube_api::{parse_channel_input, ChannelRef, ResolvedChannel, YouTubeApiClient};
pub use youtube_rss::{parse_channel_feed, FeedVideo, YouTubeRssClient};
