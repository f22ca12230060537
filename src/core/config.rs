use std::env;

use chrono_tz::Tz;

/// Runtime configuration, read from the environment once at startup.
/// Required variables panic early with the variable name; everything else
/// has a workable default.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_refresh_token: String,
    pub google_token_uri: String,
    pub google_api_base_url: String,
    pub calendar_id: String,
    pub openai_api_hostname: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub timezone: Tz,
}

impl Default for AppConfig {
    fn default() -> Self {
        let google_client_id =
            env::var("GOOGLE_CLIENT_ID").expect("Missing env var GOOGLE_CLIENT_ID");
        let google_client_secret =
            env::var("GOOGLE_CLIENT_SECRET").expect("Missing env var GOOGLE_CLIENT_SECRET");
        let google_refresh_token =
            env::var("GOOGLE_REFRESH_TOKEN").expect("Missing env var GOOGLE_REFRESH_TOKEN");
        let google_token_uri = env::var("SLOTBOT_GOOGLE_TOKEN_URI")
            .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string());
        let google_api_base_url = env::var("SLOTBOT_GOOGLE_API_BASE_URL")
            .unwrap_or_else(|_| "https://www.googleapis.com/calendar/v3".to_string());
        let calendar_id =
            env::var("SLOTBOT_CALENDAR_ID").unwrap_or_else(|_| "primary".to_string());
        let openai_api_hostname = env::var("SLOTBOT_OPENAI_API_HOSTNAME")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        let openai_api_key = env::var("OPENAI_API_KEY").expect("Missing env var OPENAI_API_KEY");
        let openai_model =
            env::var("SLOTBOT_OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let timezone = env::var("SLOTBOT_TIMEZONE")
            .unwrap_or_else(|_| "America/Chicago".to_string())
            .parse::<Tz>()
            .expect("SLOTBOT_TIMEZONE is not a valid IANA timezone name");

        Self {
            google_client_id,
            google_client_secret,
            google_refresh_token,
            google_token_uri,
            google_api_base_url,
            calendar_id,
            openai_api_hostname,
            openai_api_key,
            openai_model,
            timezone,
        }
    }
}
