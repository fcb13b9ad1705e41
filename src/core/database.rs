use crate::core::config::DatabaseConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

async fn create_pool(config: &DatabaseConfig, url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(url)
        .await
}

/// Pool for the CRM database (pending-record reads)
pub async fn create_crm_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    create_pool(config, &config.crm_url).await
}

/// Pool for the BR database (ticket-reference write-backs)
pub async fn create_br_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    create_pool(config, &config.br_url).await
}
