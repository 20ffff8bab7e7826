use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One position on a scraped chart.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ChartEntry {
    pub id: Uuid,
    pub chart_name: String,
    pub position: i32,
    pub title: String,
    pub artist: String,
    pub last_week: Option<i32>,
    pub peak_position: Option<i32>,
    pub weeks_on_chart: Option<i32>,
    pub chart_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// A validated chart row ready to replace the stored chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChartEntry {
    pub position: i32,
    pub title: String,
    pub artist: String,
    pub last_week: Option<i32>,
    pub peak_position: Option<i32>,
    pub weeks_on_chart: Option<i32>,
}
