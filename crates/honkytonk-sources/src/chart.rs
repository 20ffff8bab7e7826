//! Chart page fetching and validation of the rows extracted from it.

use crate::{
    error::SourceError,
    http::{ensure_success, BROWSER_USER_AGENT},
    lenient,
};
use chrono::NaiveDate;
use honkytonk_core::models::NewChartEntry;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;

/// A chart row as returned by the model, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawChartEntry {
    #[serde(default, deserialize_with = "lenient::int", alias = "rank")]
    pub position: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text", alias = "song")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub artist: Option<String>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub last_week: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int", alias = "peak")]
    pub peak_position: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int", alias = "weeks")]
    pub weeks_on_chart: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParsedChart {
    #[serde(default, deserialize_with = "lenient_date")]
    pub chart_date: Option<NaiveDate>,
    #[serde(default)]
    pub entries: Vec<RawChartEntry>,
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()))
}

#[derive(Clone)]
pub struct ChartPageClient {
    client: Client,
}

impl ChartPageClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_html(&self, url: &str) -> Result<String, SourceError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;
        let html = ensure_success(response).await?.text().await?;
        tracing::debug!(url, bytes = html.len(), "Fetched chart page");
        Ok(html)
    }
}

/// Keep rows with a title, an artist and a position in `1..=expected`; first row wins on a
/// duplicated position. Result is sorted by position.
pub fn validate_chart_entries(raw: Vec<RawChartEntry>, expected: usize) -> Vec<NewChartEntry> {
    let max_position = i64::try_from(expected).unwrap_or(i64::MAX);
    let mut seen = HashSet::new();
    let mut entries: Vec<NewChartEntry> = raw
        .into_iter()
        .filter_map(|row| {
            let position = row.position.filter(|p| (1..=max_position).contains(p))?;
            let title = row.title.filter(|t| !t.trim().is_empty())?;
            let artist = row.artist.filter(|a| !a.trim().is_empty())?;
            if !seen.insert(position) {
                return None;
            }
            Some(NewChartEntry {
                position: position as i32,
                title: title.trim().to_string(),
                artist: artist.trim().to_string(),
                last_week: small_positive(row.last_week),
                peak_position: small_positive(row.peak_position),
                weeks_on_chart: small_positive(row.weeks_on_chart),
            })
        })
        .collect();

    entries.sort_by_key(|e| e.position);
    entries
}

fn small_positive(value: Option<i64>) -> Option<i32> {
    value
        .filter(|v| *v > 0)
        .and_then(|v| i32::try_from(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(position: i64, title: &str, artist: &str) -> RawChartEntry {
        RawChartEntry {
            position: Some(position),
            title: Some(title.to_string()),
            artist: Some(artist.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_drops_invalid_rows_and_sorts() {
        let raw = vec![
            row(3, "Lies Lies Lies", "Morgan Wallen"),
            row(1, "A Bar Song (Tipsy)", "Shaboozey"),
            row(1, "Duplicate", "Someone"),
            row(0, "Zero", "Nobody"),
            row(51, "Too Low", "Nobody"),
            row(2, "  ", "No Title"),
            row(4, "No Artist", ""),
            RawChartEntry {
                position: None,
                title: Some("No Position".to_string()),
                artist: Some("Anyone".to_string()),
                ..Default::default()
            },
        ];

        let entries = validate_chart_entries(raw, 50);
        let positions: Vec<i32> = entries.iter().map(|e| e.position).collect();
        assert_eq!(positions, vec![1, 3]);
        assert_eq!(entries[0].title, "A Bar Song (Tipsy)");
    }

    #[test]
    fn test_parsed_chart_is_lenient() {
        let parsed: ParsedChart = serde_json::from_str(
            r#"{"chart_date":"2024-05-04","entries":[
                {"position":"1","title":"I Had Some Help","artist":["Post Malone","Morgan Wallen"],"last_week":"NEW","peak_position":1,"weeks_on_chart":"2"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(parsed.chart_date, NaiveDate::from_ymd_opt(2024, 5, 4));
        let entries = validate_chart_entries(parsed.entries, 50);
        assert_eq!(entries[0].artist, "Post Malone, Morgan Wallen");
        assert_eq!(entries[0].last_week, None);
        assert_eq!(entries[0].weeks_on_chart, Some(2));
    }

    #[test]
    fn test_bad_chart_date_becomes_none() {
        let parsed: ParsedChart =
            serde_json::from_str(r#"{"chart_date":"last week","entries":[]}"#).unwrap();
        assert_eq!(parsed.chart_date, None);
        let parsed: ParsedChart = serde_json::from_str(r#"{"chart_date":null}"#).unwrap();
        assert_eq!(parsed.chart_date, None);
    }
}
