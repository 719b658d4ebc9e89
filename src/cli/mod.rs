pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "portfolio-api")]
#[command(about = "Portfolio API - content backend with single-admin cookie auth")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on, overrides PORTFOLIO_API_PORT")]
        port: Option<u16>,
    },

    #[command(about = "Create the admin from ADMIN_EMAIL/ADMIN_PASSWORD if absent")]
    Seed,

    #[command(about = "Print the argon2id PHC hash of a password")]
    HashPassword {
        #[arg(help = "Plaintext password")]
        password: String,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => commands::serve::handle(port).await,
        Commands::Seed => commands::seed::handle(output_format).await,
        Commands::HashPassword { password } => commands::hash_password::handle(&password, output_format).await,
    }
}
