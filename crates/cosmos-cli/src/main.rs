//! Cosmos CLI tool.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "cosmos")]
#[command(about = "Cosmos resource naming CLI", long_about = None)]
struct Cli {
    /// Hierarchy configuration file
    #[arg(long, global = true, env = "COSMOS_CONFIG", default_value = "cosmos.kdl")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a name from a pattern and a scope
    Resolve {
        /// Catalog pattern name (e.g. SOLAR_SYSTEM) or a literal template
        pattern: String,
        /// Scope path, e.g. Demo/Mgt/Dev or App:Demo/Mgt
        #[arg(long)]
        scope: Option<String>,
        /// Resource type label
        #[arg(long = "type")]
        ty: Option<String>,
        /// Extra parameter, overrides the config file
        #[arg(long = "param", value_name = "KEY=VALUE", value_parser = commands::parse_key_val)]
        params: Vec<(String, String)>,
    },
    /// List the pattern catalog
    Patterns {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a hierarchy configuration
    Validate,
    /// Print the canonical name of every scope
    Names {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            pattern,
            scope,
            ty,
            params,
        } => {
            commands::resolve(&cli.config, &pattern, scope.as_deref(), ty.as_deref(), &params)?;
        }
        Commands::Patterns { json } => {
            commands::patterns::list(json)?;
        }
        Commands::Validate => {
            commands::validate(&cli.config)?;
        }
        Commands::Names { json } => {
            commands::names(&cli.config, json)?;
        }
    }

    Ok(())
}
