use crate::core::AppConfig;

/// Shared server state. Only configuration lives here; every request
/// builds its own short-lived clients from it.
pub struct AppState {
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}
