pub mod commands;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "atrium")]
#[command(about = "Atrium CLI - plugin capability and navigation verification tools")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run boot verification against the built-in plugin set")]
    Verify,

    #[command(about = "Decide capability grants for a plugin manifest file")]
    Grants {
        #[arg(help = "Path to a plugin.yaml or manifest JSON file")]
        manifest: PathBuf,
    },

    #[command(about = "Boot and print the composed navigation for an entitlement context")]
    Nav {
        #[arg(long, default_value = "member", help = "Role recorded in the context")]
        role: String,

        #[arg(long, value_delimiter = ',', help = "Entitlement tokens, comma separated")]
        entitlements: Vec<String>,

        #[arg(long, default_value_t = 0, help = "Subscription tier level")]
        tier_level: u8,

        #[arg(long, help = "User belongs to more than one tenant")]
        multi_tenant: bool,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
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

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Verify => commands::verify::handle(output_format),
        Commands::Grants { manifest } => commands::grants::handle(&manifest, output_format),
        Commands::Nav { role, entitlements, tier_level, multi_tenant } => {
            commands::nav::handle(role, entitlements, tier_level, multi_tenant, output_format)
        }
    }
}
