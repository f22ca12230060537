use anyhow::Result;
use dotenv::dotenv;
use slotbot::cli;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    cli::run().await
}
