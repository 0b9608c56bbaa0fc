//! Standalone simulator binary.
//!
//! Serves one simulator instance over HTTP. Credentials come from
//! `ARGUS_ACCESS_KEY`/`ARGUS_SECRET_KEY`, or are generated and logged so a
//! client under test can pick them up.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use argus_mock::{mock_router, Simulator, SimulatorConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = SimulatorConfig::from_env();
    tracing::info!(?config, "Simulator configuration");

    let simulator = Arc::new(Simulator::new(config));

    let account = match (
        std::env::var("ARGUS_ACCESS_KEY"),
        std::env::var("ARGUS_SECRET_KEY"),
    ) {
        (Ok(access_key), Ok(secret_key)) => simulator.register_account(access_key, secret_key),
        _ => simulator.register_random_account(),
    };
    tracing::info!(
        access_key = %account.access_key,
        secret_key = %account.secret_key,
        "Registered account"
    );

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    let app = mock_router(simulator);
    tracing::info!(%addr, "Listening");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "Failed to bind");
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
