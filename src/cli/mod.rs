pub mod client;
pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

pub use client::RegistryClient;

#[derive(Parser)]
#[command(name = "registry")]
#[command(about = "Registry CLI - statistics, reports and location audits against a running server")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, env = "REGISTRY_URL", default_value = "http://localhost:3000", help = "Server base URL")]
    pub server: String,

    #[arg(long, global = true, env = "REGISTRY_TOKEN", hide_env_values = true, help = "Bearer token")]
    pub token: Option<String>,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Statistics for one level of the hierarchy")]
    Stats {
        #[arg(value_enum, help = "Hierarchy level")]
        level: commands::stats::LevelArg,
        #[arg(help = "Entity id (required except for system)")]
        id: Option<i64>,
    },

    #[command(about = "Composite report for a municipality")]
    Report {
        #[arg(help = "Municipality id")]
        municipality_id: i64,
    },

    #[command(about = "List residents whose cached location is stale")]
    AuditLocations {
        #[arg(long, help = "Resync every drifted resident after listing")]
        fix: bool,
    },

    #[command(about = "Check server health")]
    Health,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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
    let client = RegistryClient::new(&cli.server, cli.token.clone())?;

    match cli.command {
        Commands::Stats { level, id } => commands::stats::handle(&client, level, id, output_format).await,
        Commands::Report { municipality_id } => {
            commands::report::handle(&client, municipality_id, output_format).await
        }
        Commands::AuditLocations { fix } => commands::locations::handle(&client, fix, output_format).await,
        Commands::Health => commands::health::handle(&client, output_format).await,
    }
}
