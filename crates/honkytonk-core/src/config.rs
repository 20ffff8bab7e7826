//! Configuration module
//!
//! Configuration is read from the environment (with `.env` support via dotenvy) into
//! [`HubConfig`], grouped by concern: server/database basics, external sources, sync
//! schedule and the public site used for SEO metadata.

use std::env;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const HTTP_TIMEOUT_SECS: u64 = 20;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
const MIN_ADMIN_KEY_LEN: usize = 24;

const VIDEO_BATCH_SIZE: usize = 5;
const MAX_BATCH_SIZE: usize = 10;
const VIDEO_MAX_AGE_DAYS: i64 = 90;
/// Upper bound for day-count windows (about a century).
const MAX_WINDOW_DAYS: i64 = 36_500;
const CHART_SIZE: usize = 50;
const CHART_MAX_HTML_CHARS: usize = 60_000;
const NEWS_BATCH_SIZE: usize = 5;

const SYNC_VIDEOS_INTERVAL_MINS: u64 = 60;
const SYNC_CHART_INTERVAL_MINS: u64 = 720;
const SYNC_TOP30_INTERVAL_MINS: u64 = 720;
const SYNC_NEWS_INTERVAL_MINS: u64 = 30;

/// Server, database and security settings.
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// Maximum in-flight requests served by the API.
    pub http_concurrency_limit: usize,
    /// Shared secret for the admin endpoints. Only the API server requires it.
    pub admin_api_key: Option<String>,
}

/// Endpoints and credentials for every upstream data source.
#[derive(Clone, Debug)]
pub struct SourcesConfig {
    pub http_timeout_secs: u64,
    pub youtube_rss_base_url: String,
    pub youtube_api_base_url: String,
    pub youtube_api_key: Option<String>,
    pub chart_url: String,
    pub chart_name: String,
    pub chart_size: usize,
    pub chart_max_html_chars: usize,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub apify_token: Option<String>,
    pub apify_base_url: String,
    pub apify_dataset_id: Option<String>,
    pub apify_actor_id: Option<String>,
    pub news_feed_urls: Vec<String>,
}

/// Batching, retention and schedule for the sync jobs.
#[derive(Clone, Debug)]
pub struct SyncConfig {
    pub video_batch_size: usize,
    /// Videos published longer ago than this are ignored. 0 = no age limit.
    pub video_max_age_days: i64,
    pub news_batch_size: usize,
    /// News articles older than this are pruned after each news sync. 0 = keep forever.
    pub news_retention_days: i64,
    pub videos_interval_mins: u64,
    pub chart_interval_mins: u64,
    pub top30_interval_mins: u64,
    pub news_interval_mins: u64,
    pub sync_on_startup: bool,
}

/// Public site settings used when rendering the SPA shell.
#[derive(Clone, Debug)]
pub struct SiteConfig {
    pub spa_index_path: Option<String>,
    pub public_site_url: String,
    pub site_name: String,
}

#[derive(Clone, Debug)]
pub struct HubConfig {
    pub base: BaseConfig,
    pub sources: SourcesConfig,
    pub sync: SyncConfig,
    pub site: SiteConfig,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<HubConfig>);

impl Config {
    fn as_hub(&self) -> &HubConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = HubConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.as_hub().base.environment)
    }

    pub fn environment(&self) -> &str {
        &self.as_hub().base.environment
    }

    pub fn server_port(&self) -> u16 {
        self.as_hub().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_hub().base.cors_origins
    }

    pub fn database_url(&self) -> &str {
        &self.as_hub().base.database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_hub().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_hub().base.db_timeout_seconds
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.as_hub().base.http_concurrency_limit
    }

    pub fn admin_api_key(&self) -> Option<&str> {
        self.as_hub().base.admin_api_key.as_deref()
    }

    pub fn sources(&self) -> &SourcesConfig {
        &self.as_hub().sources
    }

    pub fn sync(&self) -> &SyncConfig {
        &self.as_hub().sync
    }

    pub fn site(&self) -> &SiteConfig {
        &self.as_hub().site
    }

    pub fn chart_name(&self) -> &str {
        &self.as_hub().sources.chart_name
    }
}

fn is_production_env(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl HubConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup (the environment in production,
    /// a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_empty(lookup(key));
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());
        let parse_or = |key: &str, default: u64| -> u64 {
            get(key).and_then(|s| s.parse().ok()).unwrap_or(default)
        };
        let days_or = |key: &str, default: u64| -> i64 {
            i64::try_from(parse_or(key, default)).unwrap_or(i64::MAX)
        };

        let environment = get("ENVIRONMENT")
            .or_else(|| get("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = get_or("CORS_ORIGINS", "*");
        if is_production_env(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let base = BaseConfig {
            server_port: get_or("PORT", &SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins: parse_list(&cors_origins_str),
            database_url: get("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", MAX_CONNECTIONS as u64) as u32,
            db_timeout_seconds: parse_or("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
            http_concurrency_limit: (parse_or(
                "HTTP_CONCURRENCY_LIMIT",
                HTTP_CONCURRENCY_LIMIT as u64,
            ) as usize)
                .max(1),
            admin_api_key: get("ADMIN_API_KEY"),
        };

        let sources = SourcesConfig {
            http_timeout_secs: parse_or("HTTP_TIMEOUT_SECS", HTTP_TIMEOUT_SECS),
            youtube_rss_base_url: get_or("YOUTUBE_RSS_BASE_URL", "https://www.youtube.com"),
            youtube_api_base_url: get_or("YOUTUBE_API_BASE_URL", "https://www.googleapis.com"),
            youtube_api_key: get("YOUTUBE_API_KEY"),
            chart_url: get_or(
                "CHART_URL",
                "https://www.billboard.com/charts/country-songs/",
            ),
            chart_name: get_or("CHART_NAME", "country-songs"),
            chart_size: parse_or("CHART_SIZE", CHART_SIZE as u64) as usize,
            chart_max_html_chars: parse_or("CHART_MAX_HTML_CHARS", CHART_MAX_HTML_CHARS as u64)
                as usize,
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get_or("OPENAI_BASE_URL", "https://api.openai.com"),
            openai_model: get_or("OPENAI_MODEL", "gpt-4o-mini"),
            apify_token: get("APIFY_TOKEN"),
            apify_base_url: get_or("APIFY_BASE_URL", "https://api.apify.com"),
            apify_dataset_id: get("APIFY_DATASET_ID"),
            apify_actor_id: get("APIFY_ACTOR_ID"),
            news_feed_urls: get("NEWS_FEED_URLS")
                .map(|s| parse_list(&s))
                .unwrap_or_default(),
        };

        let sync = SyncConfig {
            video_batch_size: (parse_or("VIDEO_BATCH_SIZE", VIDEO_BATCH_SIZE as u64) as usize)
                .clamp(1, MAX_BATCH_SIZE),
            video_max_age_days: days_or("VIDEO_MAX_AGE_DAYS", VIDEO_MAX_AGE_DAYS as u64),
            news_batch_size: (parse_or("NEWS_BATCH_SIZE", NEWS_BATCH_SIZE as u64) as usize)
                .clamp(1, MAX_BATCH_SIZE),
            news_retention_days: days_or("NEWS_RETENTION_DAYS", 0),
            videos_interval_mins: parse_or("SYNC_VIDEOS_INTERVAL_MINS", SYNC_VIDEOS_INTERVAL_MINS),
            chart_interval_mins: parse_or("SYNC_CHART_INTERVAL_MINS", SYNC_CHART_INTERVAL_MINS),
            top30_interval_mins: parse_or("SYNC_TOP30_INTERVAL_MINS", SYNC_TOP30_INTERVAL_MINS),
            news_interval_mins: parse_or("SYNC_NEWS_INTERVAL_MINS", SYNC_NEWS_INTERVAL_MINS),
            sync_on_startup: get_or("SYNC_ON_STARTUP", "false")
                .to_lowercase()
                .parse()
                .unwrap_or(false),
        };

        let site = SiteConfig {
            spa_index_path: get("SPA_INDEX_PATH"),
            public_site_url: get_or("PUBLIC_SITE_URL", "http://localhost:5173")
                .trim_end_matches('/')
                .to_string(),
            site_name: get_or("SITE_NAME", "Honkytonk Hub"),
        };

        let config = HubConfig {
            base,
            sources,
            sync,
            site,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.base.database_url.starts_with("postgres://")
            && !self.base.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if let Some(key) = &self.base.admin_api_key {
            if key.len() < MIN_ADMIN_KEY_LEN {
                return Err(anyhow::anyhow!(
                    "ADMIN_API_KEY must be at least {} characters long",
                    MIN_ADMIN_KEY_LEN
                ));
            }
        }

        for (name, days) in [
            ("VIDEO_MAX_AGE_DAYS", self.sync.video_max_age_days),
            ("NEWS_RETENTION_DAYS", self.sync.news_retention_days),
        ] {
            if !(0..=MAX_WINDOW_DAYS).contains(&days) {
                return Err(anyhow::anyhow!(
                    "{} must be between 0 and {} days",
                    name,
                    MAX_WINDOW_DAYS
                ));
            }
        }

        if self.sources.chart_size == 0 {
            return Err(anyhow::anyhow!("CHART_SIZE cannot be 0"));
        }

        if self.sources.apify_token.is_some()
            && self.sources.apify_dataset_id.is_none()
            && self.sources.apify_actor_id.is_none()
        {
            return Err(anyhow::anyhow!(
                "APIFY_TOKEN requires APIFY_DATASET_ID or APIFY_ACTOR_ID to be set"
            ));
        }

        Ok(())
    }
}
