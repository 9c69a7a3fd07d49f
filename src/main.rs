use tracing::info;

use phishguard::config::Config;
use phishguard::predictor;
use phishguard::router;
use phishguard::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    info!("[phishguard] Starting phishguard server");
    info!("[phishguard] Base URL: {}", config.base_url);

    let predictor = predictor::from_config(&config)?;
    info!("[phishguard] Check page predictor: {}", predictor.describe());

    let state = AppState::new(config.clone(), predictor);
    let app = router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("[phishguard] Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
