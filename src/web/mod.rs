/// HTTP surface: the form page and a couple of JSON endpoints.
///
/// ```text
///   GET  /         form page
///   POST /irisf    form submit → page with species or error message
///   GET  /health   {status, source, samples}
///   GET  /labels   [{index, species}, ...]
/// ```
pub mod handlers;
pub mod page;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use log::info;
use tokio::net::TcpListener;

use crate::service::IrisService;
use handlers::AppState;

pub fn router(service: Arc<IrisService>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/irisf", post(handlers::predict))
        .route("/health", get(handlers::health))
        .route("/labels", get(handlers::labels))
        .with_state(AppState { service })
}

/// Serve until the listener fails.
pub async fn serve(listener: TcpListener, service: Arc<IrisService>) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("listening on http://{addr}");
    }
    axum::serve(listener, router(service)).await
}
