use crate::{error::SyncError, jobs::SyncJob, report::SyncReport};
use async_trait::async_trait;
use honkytonk_core::models::{SyncJobKind, SyncStatus};
use honkytonk_db::ChartRepository;
use honkytonk_sources::{reduce_html, validate_chart_entries, ChartPageClient, OpenAiChartParser};
use serde_json::json;

/// Scrapes the chart page, has the LLM extract rows and replaces the stored chart.
#[derive(Clone)]
pub struct ChartSyncJob {
    page: ChartPageClient,
    parser: Option<OpenAiChartParser>,
    charts: ChartRepository,
    chart_url: String,
    chart_name: String,
    chart_size: usize,
    max_html_chars: usize,
}

impl ChartSyncJob {
    pub fn new(
        page: ChartPageClient,
        parser: Option<OpenAiChartParser>,
        charts: ChartRepository,
        chart_url: impl Into<String>,
        chart_name: impl Into<String>,
        chart_size: usize,
        max_html_chars: usize,
    ) -> Self {
        Self {
            page,
            parser,
            charts,
            chart_url: chart_url.into(),
            chart_name: chart_name.into(),
            chart_size,
            max_html_chars,
        }
    }
}

#[async_trait]
impl SyncJob for ChartSyncJob {
    fn kind(&self) -> SyncJobKind {
        SyncJobKind::Chart
    }

    #[tracing::instrument(skip(self), fields(sync.job = "chart", chart = %self.chart_name))]
    async fn run(&self) -> Result<SyncReport, SyncError> {
        let parser = self
            .parser
            .as_ref()
            .ok_or_else(|| SyncError::NotConfigured("OPENAI_API_KEY is not set".to_string()))?;

        let html = self.page.fetch_html(&self.chart_url).await?;
        let text = reduce_html(&html, self.max_html_chars);
        if text.is_empty() {
            return Err(SyncError::NoData(format!(
                "chart page {} has no visible text",
                self.chart_url
            )));
        }

        let parsed = parser.parse_chart(&text, self.chart_size).await?;
        let returned = parsed.entries.len();
        let entries = validate_chart_entries(parsed.entries, self.chart_size);
        if entries.is_empty() {
            tracing::warn!(returned, "No valid chart rows, keeping the stored chart");
            return Err(SyncError::NoData(format!(
                "no valid chart entries in {} returned rows",
                returned
            )));
        }

        let inserted = self
            .charts
            .replace_chart(&self.chart_name, parsed.chart_date, &entries)
            .await? as usize;

        tracing::info!(returned, valid = entries.len(), inserted, "Chart sync finished");

        Ok(SyncReport::new(SyncStatus::Success, returned, inserted).with_details(json!({
            "chart_name": self.chart_name,
            "chart_date": parsed.chart_date,
            "page_chars": text.chars().count(),
            "invalid_rows": returned - entries.len(),
        })))
    }
}
