use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use reel_rank::api::{create_router, AppState};
use reel_rank::config::{Config, Strategy};
use reel_rank::models::Catalog;
use reel_rank::services::{PopularityScorer, PredictiveScorer, Scorer, SvdModel};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // A failed load is fatal: no partial catalog or model is ever served.
    let catalog = Catalog::from_path(&config.movies_csv)?;
    let scorer: Arc<dyn Scorer> = match config.strategy {
        Strategy::Predictive => Arc::new(PredictiveScorer::new(SvdModel::from_path(
            &config.model_path,
        )?)),
        Strategy::Popularity => Arc::new(PopularityScorer::from_path(&config.popularity_csv)?),
    };

    let state = AppState::new(catalog, scorer);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(strategy = ?config.strategy, %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
