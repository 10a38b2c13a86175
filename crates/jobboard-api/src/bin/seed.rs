//! Insert sample job postings.
//!
//! Jobs are posted by the oldest employer or admin account, so register one
//! before running this.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use jobboard_api::ApiConfig;
use jobboard_db::{seed_sample_jobs, Database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ApiConfig::from_env()?;
    let db = Database::connect(&config.database)
        .await
        .with_context(|| format!("failed to open database at {}", config.database.url))?;

    let result = seed_sample_jobs(&db).await;
    db.close().await;

    let count = result.context("seeding sample jobs failed")?;
    info!(count, "Sample jobs created");
    Ok(())
}
