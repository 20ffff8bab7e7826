use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use honkytonk_core::models::ChartEntry;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChartQuery {
    /// Chart name; defaults to the configured chart
    pub name: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/chart",
    tag = "charts",
    params(ChartQuery),
    responses(
        (status = 200, description = "Current chart rows by position", body = Vec<ChartEntry>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChartQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let name = query
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| state.default_chart_name());

    let entries = state.repos.charts.list(name).await?;
    Ok(Json(entries))
}
