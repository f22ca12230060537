//! API routes module

pub mod meta;
pub mod schedule;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Service info and health probe
        .merge(meta::router())
        // Natural language meeting scheduling
        .merge(schedule::router())
}
