//! Test utilities for integration tests
use std::sync::{Arc, RwLock};

use axum::{Router, body::Body};
use chrono_tz::America::Chicago;

use slotbot::api::AppState;
use slotbot::api::app;
use slotbot::core::AppConfig;

/// Creates a test application router with every outbound hostname pointed
/// at the given mock server. The Google token endpoint, the Calendar API,
/// and the OpenAI API live on disjoint paths, so a single server can play
/// all three roles.
pub fn test_app(mock_url: &str) -> Router {
    let app_config = AppConfig {
        google_client_id: String::from("test_client_id"),
        google_client_secret: String::from("test_client_secret"),
        google_refresh_token: String::from("test_refresh_token"),
        google_token_uri: format!("{}/token", mock_url),
        google_api_base_url: String::from(mock_url),
        calendar_id: String::from("primary"),
        openai_api_hostname: String::from(mock_url),
        openai_api_key: String::from("test-api-key"),
        openai_model: String::from("gpt-4o-mini"),
        timezone: Chicago,
    };
    let app_state = AppState::new(app_config);
    app(Arc::new(RwLock::new(app_state)))
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("Response body was not valid utf-8")
}
