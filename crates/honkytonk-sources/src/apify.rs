//! Apify dataset holding the scraped Top-30 list.

use crate::{error::SourceError, http::ensure_success, lenient};
use honkytonk_core::models::NewTop30Entry;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;

pub const TOP30_SIZE: i64 = 30;

/// Where the items live: a fixed dataset, or the dataset of an actor's last run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApifySource {
    Dataset(String),
    Actor(String),
}

impl ApifySource {
    /// A configured actor takes precedence over a dataset id.
    pub fn from_config(dataset_id: Option<&str>, actor_id: Option<&str>) -> Option<Self> {
        match (actor_id, dataset_id) {
            (Some(actor), _) => Some(ApifySource::Actor(actor.to_string())),
            (None, Some(dataset)) => Some(ApifySource::Dataset(dataset.to_string())),
            (None, None) => None,
        }
    }

    fn path(&self) -> String {
        match self {
            ApifySource::Dataset(id) => format!("/v2/datasets/{}/items", id),
            // Actor ids may be given as `user/actor`; the API expects `user~actor`.
            ApifySource::Actor(id) => {
                format!("/v2/acts/{}/runs/last/dataset/items", id.replace('/', "~"))
            }
        }
    }
}

/// One scraped row. Field names vary between scrapers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApifyItem {
    #[serde(default, deserialize_with = "lenient::int", alias = "rank", alias = "pos")]
    pub position: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text", alias = "song", alias = "track")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", alias = "artists")]
    pub artist: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient::int", alias = "plays")]
    pub spins: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int", alias = "change")]
    pub movement: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        alias = "imageUrl",
        alias = "image_url"
    )]
    pub image: Option<String>,
}

#[derive(Clone)]
pub struct ApifyClient {
    client: Client,
    base_url: String,
    token: String,
    source: ApifySource,
}

impl ApifyClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
        source: ApifySource,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            source,
        }
    }

    #[tracing::instrument(skip(self), fields(source = ?self.source))]
    pub async fn fetch_top30(&self) -> Result<Vec<ApifyItem>, SourceError> {
        let url = format!("{}{}", self.base_url, self.source.path());
        let response = self
            .client
            .get(&url)
            .query(&[("clean", "true"), ("format", "json")])
            .bearer_auth(&self.token)
            .send()
            .await?;

        let items: Vec<ApifyItem> = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Apify dataset items: {}", e)))?;

        tracing::debug!(items = items.len(), "Fetched Apify items");
        Ok(items)
    }
}

/// Rows with a position in `1..=30`, a title and an artist; first row wins per position.
pub fn normalize_top30(items: Vec<ApifyItem>) -> Vec<NewTop30Entry> {
    let mut seen = HashSet::new();
    let mut entries: Vec<NewTop30Entry> = items
        .into_iter()
        .filter_map(|item| {
            let position = item.position.filter(|p| (1..=TOP30_SIZE).contains(p))?;
            let title = item.title?;
            let artist = item.artist?;
            if !seen.insert(position) {
                return None;
            }
            Some(NewTop30Entry {
                position: position as i32,
                title,
                artist,
                label: item.label,
                spins: item.spins.and_then(|v| i32::try_from(v).ok()).filter(|v| *v >= 0),
                movement: item.movement.and_then(|v| i32::try_from(v).ok()),
                image_url: item
                    .image
                    .filter(|u| u.starts_with("http://") || u.starts_with("https://")),
            })
        })
        .collect();

    entries.sort_by_key(|e| e.position);
    entries
}
