use axum::Router;
use fieldroute::cache::CachingGeocoder;
use fieldroute::config::Config;
use fieldroute::services::{ColumnDetector, NominatimClient, RouteBuilder};
use fieldroute::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fieldroute=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting fieldroute API server");
    tracing::info!(
        geocoder = %config.geocoder.base_url,
        concurrency = config.geocoder.concurrency,
        "Configuration loaded successfully"
    );

    // Initialize services
    let geocoder = CachingGeocoder::new(
        NominatimClient::new(&config.geocoder),
        config.geocode_cache_ttl,
        config.geocode_cache_max_entries,
    );
    let route_builder = RouteBuilder::new(Arc::new(geocoder), &config.geocoder);

    let state = Arc::new(AppState {
        column_detector: ColumnDetector::new(config.columns.clone()),
        route_builder,
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", fieldroute::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
