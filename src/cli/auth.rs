use std::io::{self, Write};

use anyhow::{Result, anyhow};

use crate::google::oauth::{consent_url, exchange_code_for_token};

/// One-time Google authorization. Walks through the consent screen and
/// prints the refresh token to put in the environment; there is no token
/// storage in this service.
pub async fn run() -> Result<()> {
    let client_id =
        std::env::var("GOOGLE_CLIENT_ID").expect("Set GOOGLE_CLIENT_ID in your environment");
    let client_secret = std::env::var("GOOGLE_CLIENT_SECRET")
        .expect("Set GOOGLE_CLIENT_SECRET in your environment");
    let redirect_uri = std::env::var("SLOTBOT_REDIRECT_URI")
        .unwrap_or_else(|_| "urn:ietf:wg:oauth:2.0:oob".to_string());
    let token_uri = std::env::var("SLOTBOT_GOOGLE_TOKEN_URI")
        .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string());

    let auth_url = consent_url(&client_id, &redirect_uri);
    println!(
        "\nPlease open the following URL in your browser and authorize access:\n\n{}\n",
        auth_url
    );
    print!("Paste the authorization code shown by Google here: ");
    io::stdout().flush().unwrap();
    let mut code = String::new();
    io::stdin()
        .read_line(&mut code)
        .expect("Failed to read code");
    let code = code.trim();

    let token =
        exchange_code_for_token(&token_uri, &client_id, &client_secret, code, &redirect_uri)
            .await?;
    let refresh_token = token
        .refresh_token
        .ok_or(anyhow!("No refresh token in response"))?;

    println!("\nAdd this to your environment (or .env file) to finish setup:\n");
    println!("GOOGLE_REFRESH_TOKEN={}", refresh_token);

    Ok(())
}
