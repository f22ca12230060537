use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod auth;
pub mod schedule;
pub mod serve;

#[derive(Subcommand)]
enum Command {
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "5000")]
        port: String,
    },
    /// Perform Google OAuth authentication and print the refresh token
    Auth {},
    /// Schedule a meeting from a sentence without going through the server
    Schedule {
        /// The request, e.g. "meet john@email.com tomorrow at 3pm"
        text: String,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    // Handle each sub command
    match args.command {
        Some(Command::Serve { host, port }) => {
            serve::run(host, port).await;
        }
        Some(Command::Auth {}) => {
            auth::run().await?;
        }
        Some(Command::Schedule { text }) => {
            schedule::run(&text).await?;
        }
        None => {}
    }

    Ok(())
}
