use parking_backend::{AppState, config::AppConfig, create_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parking_backend=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    if config.kakao.rest_api_key.is_empty() {
        tracing::warn!("KAKAO_REST_API_KEY not set, place search will fail");
    }
    if config.google.api_key.is_empty() {
        tracing::warn!("GOOGLE_MAP_API_KEY not set, transit routes will fail");
    }

    let state = AppState::from_config(&config)?;
    let app = create_router(state);

    let addr = config.bind_addr;
    tracing::info!("starting backend on http://{addr}");
    tracing::info!("API endpoints:");
    tracing::info!("  GET  /api/points - Parking points for map markers");
    tracing::info!("  GET  /api/places?query= - Kakao keyword search");
    tracing::info!("  GET  /api/geocode?query= - Naver address geocoding");
    tracing::info!("  POST /api/nearest - Nearest parking point to a coordinate");
    tracing::info!("  GET  /api/sessions/:id - Current session state");
    tracing::info!("  POST /api/sessions/:id/select - Pick start place and fetch route");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
