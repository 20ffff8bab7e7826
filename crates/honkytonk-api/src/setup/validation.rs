//! Configuration validation
//!
//! Checks that only matter for the API server. Source-level checks live in
//! `HubConfig::validate` and run when the configuration is loaded.

use anyhow::Result;
use honkytonk_core::Config;

const MIN_ADMIN_KEY_LEN: usize = 24;

/// Fail fast on settings that would leave the server insecure or unusable.
pub fn validate_config(config: &Config) -> Result<()> {
    let is_production = config.is_production();

    if is_production && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Please set specific allowed origins via CORS_ORIGINS environment variable."
        ));
    }

    if config.db_max_connections() == 0 {
        return Err(anyhow::anyhow!("Database max connections cannot be 0"));
    }

    if config.db_timeout_seconds() == 0 {
        return Err(anyhow::anyhow!("Database timeout cannot be 0"));
    }

    match config.admin_api_key() {
        Some(key) if key.len() < MIN_ADMIN_KEY_LEN => {
            return Err(anyhow::anyhow!(
                "ADMIN_API_KEY must be at least {} characters long",
                MIN_ADMIN_KEY_LEN
            ));
        }
        Some(_) => {}
        None if is_production => {
            return Err(anyhow::anyhow!(
                "ADMIN_API_KEY must be set in production - set the ADMIN_API_KEY environment variable"
            ));
        }
        None => {
            tracing::warn!("ADMIN_API_KEY not set - admin endpoints will reject every request");
        }
    }

    if let Some(path) = config.site().spa_index_path.as_deref() {
        if !std::path::Path::new(path).is_file() {
            return Err(anyhow::anyhow!("SPA_INDEX_PATH does not point to a file: {}", path));
        }
    }

    let sources = config.sources();
    if sources.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set - chart sync will record failed runs");
    }
    if sources.apify_token.is_none() {
        tracing::warn!("APIFY_TOKEN not set - Top-30 sync will record failed runs");
    }
    if sources.news_feed_urls.is_empty() {
        tracing::warn!("NEWS_FEED_URLS is empty - news sync has nothing to fetch");
    }

    tracing::info!("Configuration validation passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use honkytonk_core::HubConfig;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let mut map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        map.entry("DATABASE_URL".to_string())
            .or_insert_with(|| "postgres://localhost/hub".to_string());
        let hub = HubConfig::from_lookup(|key| map.get(key).cloned()).expect("config");
        Config(Box::new(hub))
    }

    #[test]
    fn test_development_without_admin_key_passes() {
        assert!(validate_config(&config(&[])).is_ok());
    }

    #[test]
    fn test_production_requires_admin_key() {
        let err = validate_config(&config(&[
            ("ENVIRONMENT", "production"),
            ("CORS_ORIGINS", "https://honkytonkhub.example"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("ADMIN_API_KEY"));
    }

    #[test]
    fn test_zero_pool_size_rejected() {
        let err = validate_config(&config(&[("DB_MAX_CONNECTIONS", "0")])).unwrap_err();
        assert!(err.to_string().contains("max connections"));
    }

    #[test]
    fn test_missing_spa_index_rejected() {
        let err = validate_config(&config(&[("SPA_INDEX_PATH", "/nonexistent/index.html")]))
            .unwrap_err();
        assert!(err.to_string().contains("SPA_INDEX_PATH"));
    }
}
