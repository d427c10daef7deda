use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{api, config::Config, error, types::PkceToken};

/// Routes of the OAuth callback server.
///
/// The shared PKCE state and the configuration reach the handlers as
/// `Extension`s on the router.
pub fn router(state: Arc<Mutex<Option<PkceToken>>>, config: Arc<Config>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .layer(Extension(state))
        .layer(Extension(config))
}

pub async fn start_api_server(state: Arc<Mutex<Option<PkceToken>>>, config: Arc<Config>) {
    let addr = match SocketAddr::from_str(&config.server_addr) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => error!("Failed to bind callback server to {}: {}", addr, e),
    };

    if let Err(e) = axum::serve(listener, router(state, config)).await {
        error!("Callback server stopped: {}", e);
    }
}
