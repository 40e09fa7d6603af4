//! Command-line interface for plantlore.

pub(crate) mod extract;
pub(crate) mod lookup;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use plantlore::Config;

const DEFAULT_LOG_FILTER: &str = "plantlore=info";

#[derive(Debug, Parser)]
#[command(name = "plantlore", version, about = "Find and look up plants mentioned in text")]
pub(crate) struct Cli {
    /// Config file (default: ~/.plantlore/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Print ranked plant mentions found in TEXT (no network)
    Extract {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        /// Print mentions as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report whether TEXT is about plants
    Check {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Search the plant API by name
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Maximum results to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Resolve a plant by name and print its profile
    Lookup {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
        /// Print the structured record as JSON instead of narrative text
        #[arg(long)]
        json: bool,
    },
}

/// Install the tracing subscriber. Logs go to stderr.
pub(crate) fn init_logging(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Load config from `path`, or from the default location.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            let mut config = Config::load_from_path(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            config.apply_env_overrides();
            config.validate().with_context(|| "Invalid configuration")?;
            Ok(config)
        }
        None => Config::load().with_context(|| "Failed to load configuration"),
    }
}

pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Extract { text, json } => extract::cmd_extract(&text.join(" "), json),
        Commands::Check { text } => {
            extract::cmd_check(&text.join(" "));
            Ok(())
        }
        Commands::Search { query, limit } => {
            let config = load_config(cli.config.as_deref())?;
            lookup::cmd_search(config, &query.join(" "), limit).await
        }
        Commands::Lookup { name, json } => {
            let config = load_config(cli.config.as_deref())?;
            lookup::cmd_lookup(config, &name.join(" "), json).await
        }
    }
}
