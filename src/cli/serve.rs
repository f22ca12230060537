use crate::api;
use crate::core::AppConfig;

/// Start the scheduling API server. Configuration is read eagerly, so a
/// missing Google or OpenAI credential panics before the listener binds.
pub async fn run(host: String, port: String) {
    let config = AppConfig::default();
    api::serve(host, port, config).await;
}
