mod api;
pub(crate) mod error;
mod params;
mod state;

use std::net::SocketAddr;

use axum::{http::HeaderValue, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::config::Config;

pub(crate) use self::state::WebState;

fn api_routes() -> Router<WebState> {
    Router::new()
        .route("/items", get(api::search_items))
        .route("/item/{id}/detail", get(api::item_detail))
        .route("/item/{id}/graph", get(api::item_graph))
        .fallback(api::route_not_found)
}

fn cors_layer(origin: &str) -> Option<CorsLayer> {
    match HeaderValue::from_str(origin) {
        Ok(origin) => Some(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods(Any)
                .allow_headers(Any),
        ),
        Err(e) => {
            warn!(origin, "ignoring invalid CORS_ORIGIN: {e}");
            None
        }
    }
}

/// The whole HTTP surface. With a static directory configured every non-api path is served
/// from it, unknown files falling back to `index.html` so the client router can take over.
pub(crate) fn app(state: WebState, config: &Config) -> Router {
    let app = Router::new().nest("/api", api_routes());
    let app = match &config.static_dir {
        Some(dir) => app.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        ),
        None => app.fallback(api::route_not_found),
    };
    let app = app
        .layer(TraceLayer::new_for_http())
        .with_state(state);
    match config.cors_origin.as_deref().and_then(cors_layer) {
        Some(cors) => app.layer(cors),
        None => app,
    }
}

pub(crate) async fn start_web(state: WebState, config: &Config) -> std::io::Result<()> {
    let app = app(state, config);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("ctrl-c received, shutting down"),
        Err(e) => {
            error!("unable to listen for ctrl-c {e}");
            std::future::pending::<()>().await
        }
    }
}
