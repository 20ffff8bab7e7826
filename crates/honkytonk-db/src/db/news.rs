use chrono::{DateTime, Utc};
use honkytonk_core::{
    models::{NewNewsArticle, NewsArticle},
    AppError,
};
use sqlx::{PgPool, Postgres};
use std::collections::HashSet;

const NEWS_COLUMNS: &str =
    "id, url, title, summary, image_url, source, published_at, created_at";

/// Repository for RSS news articles
#[derive(Clone)]
pub struct NewsRepository {
    pool: PgPool,
}

impl NewsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Which of the given article URLs are already stored
    #[tracing::instrument(skip(self, urls), fields(db.table = "news_articles", db.operation = "select", candidates = urls.len()))]
    pub async fn existing_urls(&self, urls: &[String]) -> Result<HashSet<String>, AppError> {
        if urls.is_empty() {
            return Ok(HashSet::new());
        }

        let rows = sqlx::query_scalar::<Postgres, String>(
            "SELECT url FROM news_articles WHERE url = ANY($1)",
        )
        .bind(urls)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Insert articles, skipping URLs that already exist. Returns the number of rows written.
    #[tracing::instrument(skip(self, articles), fields(db.table = "news_articles", db.operation = "insert", count = articles.len()))]
    pub async fn insert_many(&self, articles: &[NewNewsArticle]) -> Result<u64, AppError> {
        if articles.is_empty() {
            return Ok(0);
        }

        let urls: Vec<String> = articles.iter().map(|a| a.url.clone()).collect();
        let titles: Vec<String> = articles.iter().map(|a| a.title.clone()).collect();
        let summaries: Vec<Option<String>> = articles.iter().map(|a| a.summary.clone()).collect();
        let images: Vec<Option<String>> = articles.iter().map(|a| a.image_url.clone()).collect();
        let sources: Vec<String> = articles.iter().map(|a| a.source.clone()).collect();
        let published: Vec<Option<DateTime<Utc>>> =
            articles.iter().map(|a| a.published_at).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO news_articles (url, title, summary, image_url, source, published_at)
            SELECT * FROM UNNEST(
                $1::text[], $2::text[], $3::text[], $4::text[], $5::text[], $6::timestamptz[]
            )
            ON CONFLICT (url) DO NOTHING
            "#,
        )
        .bind(&urls)
        .bind(&titles)
        .bind(&summaries)
        .bind(&images)
        .bind(&sources)
        .bind(&published)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Newest first; articles without a publish date sort last
    #[tracing::instrument(skip(self), fields(db.table = "news_articles", db.operation = "select"))]
    pub async fn list(
        &self,
        limit: i64,
        offset: i64,
        source: Option<&str>,
    ) -> Result<Vec<NewsArticle>, AppError> {
        let articles = sqlx::query_as::<Postgres, NewsArticle>(&format!(
            r#"
            SELECT {}
            FROM news_articles
            WHERE ($1::text IS NULL OR source = $1)
            ORDER BY published_at DESC NULLS LAST, created_at DESC, id ASC
            LIMIT $2 OFFSET $3
            "#,
            NEWS_COLUMNS
        ))
        .bind(source)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(articles)
    }

    #[tracing::instrument(skip(self), fields(db.table = "news_articles", db.operation = "count"))]
    pub async fn count(&self, source: Option<&str>) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<Postgres, i64>(
            "SELECT COUNT(*) FROM news_articles WHERE ($1::text IS NULL OR source = $1)",
        )
        .bind(source)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Delete articles published (or, when undated, stored) before `cutoff`
    #[tracing::instrument(skip(self), fields(db.table = "news_articles", db.operation = "delete"))]
    pub async fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM news_articles
            WHERE COALESCE(published_at, created_at) < $1
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
