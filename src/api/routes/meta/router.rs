//! Router for service health and metadata

use std::sync::{Arc, RwLock};

use axum::{Router, response::Json};

use super::public;
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

async fn health_handler() -> Json<public::HealthResponse> {
    Json(public::HealthResponse {
        status: "ok".to_string(),
    })
}

async fn root_handler() -> Json<public::ServiceInfo> {
    Json(public::ServiceInfo {
        app: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "running".to_string(),
        endpoints: vec!["/health".to_string(), "/schedule-meeting".to_string()],
    })
}

/// Create the metadata router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", axum::routing::get(root_handler))
        .route("/health", axum::routing::get(health_handler))
}
