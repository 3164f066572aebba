use std::net::SocketAddr;
use std::sync::Arc;

use axum::middleware;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taxi_quote_backend::{
    clients::{nominatim::NominatimClient, osrm::OsrmClient},
    config::Config,
    distance::DistanceEstimator,
    error::handle_panic,
    middleware::rate_limit::log_request,
    routes,
    session::SessionStore,
    store::LocalStore,
    AppState,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taxi_quote_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    tracing::info!("Starting server at {}", config.server_addr());
    tracing::info!("Pricing policy: {:?}", config.pricing_policy);

    // Open the local key-value store (language preference + audit trail)
    let store = Arc::new(LocalStore::open(&config.store_path).expect("Failed to open local store"));

    // Upstream clients share the configured timeout so a hung request
    // cannot stall the fallback paths
    let geocoder = NominatimClient::new(&config);
    let estimator = DistanceEstimator::new(OsrmClient::new(&config));

    let state = AppState {
        config: config.clone(),
        geocoder,
        estimator,
        sessions: SessionStore::default(),
        store,
    };

    // Create router with middleware
    let app = routes::create_router(state)
        .layer(middleware::from_fn(log_request))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(CatchPanicLayer::custom(handle_panic));

    // Start server with socket address for rate limiting
    let addr: SocketAddr = config.server_addr().parse().expect("Invalid address");
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
