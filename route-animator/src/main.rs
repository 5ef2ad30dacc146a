use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use route_animator::geocode::{
    CachedGeocoder, GeocodeCache, GeocodeCacheConfig, Geocoder, GeocoderConfig, MemoConfig,
    NominatimClient, StaticGeocoder,
};
use route_animator::web::{AppState, create_router};

/// Default listen address.
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr: SocketAddr = std::env::var("ROUTE_ANIMATOR_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()
        .expect("ROUTE_ANIMATOR_ADDR must be host:port");

    // Fixture places for offline use; otherwise ask Nominatim
    if let Ok(path) = std::env::var("GEOCODER_FIXTURES") {
        let geocoder =
            StaticGeocoder::from_file(&path).expect("Failed to load geocoder fixtures");
        info!(path = %path, places = geocoder.len(), "Using fixture geocoder");
        serve(AppState::new(geocoder), addr).await;
        return;
    }

    let mut config = GeocoderConfig::new();
    if let Ok(url) = std::env::var("GEOCODER_BASE_URL") {
        config = config.with_base_url(url);
    }
    match std::env::var("GEOCODER_USER_AGENT") {
        Ok(agent) => config = config.with_user_agent(agent),
        Err(_) => warn!("GEOCODER_USER_AGENT not set; public Nominatim may reject requests"),
    }
    let client = NominatimClient::new(config).expect("Failed to create geocoder client");

    let cache_config = match std::env::var("GEOCODE_CACHE_PATH") {
        Ok(path) => GeocodeCacheConfig::new(path),
        Err(_) => GeocodeCacheConfig::default(),
    };
    let disk = GeocodeCache::open(cache_config);
    info!(path = %disk.path().display(), places = disk.len(), "Loaded geocode cache");

    let geocoder = CachedGeocoder::new(client, &MemoConfig::default()).with_disk_cache(disk);
    serve(AppState::new(geocoder), addr).await;
}

async fn serve<G: Geocoder + 'static>(state: AppState<G>, addr: SocketAddr) {
    let app = create_router(state);

    info!("Route animator listening on http://{addr}");
    info!("  GET  /health        - Health check");
    info!("  POST /api/timeline  - Build a route's schedule");
    info!("  POST /api/frames    - Sample animation frames");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
