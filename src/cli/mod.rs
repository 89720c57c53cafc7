pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "vidshelf operator CLI - database bootstrap and server checks")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create database tables and indexes if missing")]
    Init,

    #[command(about = "Probe a running server's /health endpoint")]
    Health {
        #[arg(long, default_value = "http://127.0.0.1:3000", help = "Base URL of the server")]
        url: String,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Init => commands::init::handle().await,
        Commands::Health { url } => commands::health::handle(&url).await,
    }
}
