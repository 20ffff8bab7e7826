use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use honkytonk_core::models::{NewsArticle, Page, PageQuery};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NewsListQuery {
    /// Maximum number of articles (default 24, max 100)
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Only articles from this source (feed title or host)
    pub source: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/news",
    tag = "news",
    params(NewsListQuery),
    responses(
        (status = 200, description = "Articles, newest first", body = Page<NewsArticle>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_news"))]
pub async fn list_news(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NewsListQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let (limit, offset) = PageQuery {
        limit: query.limit,
        offset: query.offset,
    }
    .resolve();
    let source = query
        .source
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let items = state.repos.news.list(limit, offset, source).await?;
    let total = state.repos.news.count(source).await?;

    Ok(Json(Page {
        items,
        total,
        limit,
        offset,
    }))
}
