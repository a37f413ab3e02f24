//! peerlink relay binary.
//!
//! Loads config, binds the listener, and runs the accept loop.

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use peerlink_relay::{app_state::AppState, config, transport};

const CONFIG_PATH: &str = "peerlink.yaml";

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cfg = config::load_or_default(CONFIG_PATH).expect("config load failed");
    let listen: SocketAddr = cfg
        .listen_addr()
        .parse()
        .expect("relay.listen must be a valid SocketAddr");

    let state = AppState::new(cfg);

    tracing::info!(%listen, "peerlink-relay starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .expect("failed to bind");

    transport::listener::run(listener, state).await;
}
