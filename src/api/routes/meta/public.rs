//! Public types for service metadata
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize, Deserialize)]
pub struct ServiceInfo {
    pub app: String,
    pub version: String,
    pub status: String,
    pub endpoints: Vec<String>,
}
