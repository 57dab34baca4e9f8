use std::net::SocketAddr;
use std::time::Duration;

use route_server::network::SharedSnapshot;
use route_server::planner::PlannerConfig;
use route_server::web::{AppState, create_router};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_DATA_PATH: &str = "data/network.json";
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("route_server=info,tower_http=info")),
        )
        .init();

    let data_path =
        std::env::var("ROUTE_DATA_PATH").unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string());
    let addr: SocketAddr = std::env::var("ROUTE_LISTEN_ADDR")
        .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string())
        .parse()
        .expect("ROUTE_LISTEN_ADDR must be a socket address");

    // Load the network (fail fast if unavailable)
    let snapshot = SharedSnapshot::load(&data_path)
        .await
        .unwrap_or_else(|e| panic!("Failed to load network from {data_path}: {e}"));
    {
        let current = snapshot.current().await;
        info!(
            city = current.city(),
            stops = current.len(),
            path = %data_path,
            "loaded network"
        );
    }

    // Optionally re-read the network file in the background
    if let Ok(raw) = std::env::var("ROUTE_SNAPSHOT_REFRESH_SECS") {
        match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => spawn_refresh(snapshot.clone(), Duration::from_secs(secs)),
            _ => warn!(value = %raw, "ignoring invalid ROUTE_SNAPSHOT_REFRESH_SECS"),
        }
    }

    let state = AppState::new(snapshot, PlannerConfig::default());
    let app = create_router(state);

    info!("Route planner listening on http://{addr}");
    info!("  GET  /health       - Health check");
    info!("  GET  /stops        - List stops");
    info!("  POST /routes/plan  - Plan routes");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

fn spawn_refresh(snapshot: SharedSnapshot, period: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            match snapshot.reload().await {
                Ok(count) => info!(stops = count, "reloaded network"),
                Err(e) => error!(error = %e, "failed to reload network, keeping previous"),
            }
        }
    });
}
