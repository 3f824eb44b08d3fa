use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_LOOKUP_CACHE, ENV_LOOKUP_CACHE_MAX_ENTRIES, ENV_LOOKUP_CACHE_TTL_SECS,
    ENV_NAME_SUFFIX, ENV_WEBAPI_TOKEN, ENV_WEBAPI_URL, ENV_WILDCARD,
};

#[derive(Parser)]
#[command(name = "tabula")]
#[command(version, about = "Filter-condition compiler for record grids", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Suffix of the text-searchable shadow attribute (e.g. owner -> ownername)
    #[arg(long, global = true, env = ENV_NAME_SUFFIX)]
    pub name_suffix: Option<String>,

    /// Wildcard marker wrapped around pattern values
    #[arg(long, global = true, env = ENV_WILDCARD)]
    pub wildcard: Option<String>,

    // Lookup options
    /// Enable or disable the lookup result cache
    #[arg(long, global = true, env = ENV_LOOKUP_CACHE)]
    pub lookup_cache: Option<bool>,

    /// Lookup cache TTL in seconds
    #[arg(long, global = true, env = ENV_LOOKUP_CACHE_TTL_SECS)]
    pub lookup_cache_ttl: Option<u64>,

    /// Maximum number of cached lookups
    #[arg(long, global = true, env = ENV_LOOKUP_CACHE_MAX_ENTRIES)]
    pub lookup_cache_max_entries: Option<u64>,

    /// Web API base url used to resolve lookup references
    #[arg(long, global = true, env = ENV_WEBAPI_URL)]
    pub webapi_url: Option<String>,

    /// Web API bearer token
    #[arg(long, global = true, env = ENV_WEBAPI_TOKEN, hide_env_values = true)]
    pub webapi_token: Option<String>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Print the editable conditions hydrated from a filter expression
    Inspect {
        /// Column descriptors (JSON array)
        #[arg(long)]
        columns: PathBuf,
        /// Filter expression (JSON)
        #[arg(long)]
        expression: PathBuf,
        /// Record fixture used to resolve lookup references
        #[arg(long)]
        records: Option<PathBuf>,
    },
    /// Re-emit a filter expression through the validation gate
    Normalize {
        /// Column descriptors (JSON array)
        #[arg(long)]
        columns: PathBuf,
        /// Filter expression (JSON)
        #[arg(long)]
        expression: PathBuf,
        /// Combine conditions with OR instead of AND
        #[arg(long)]
        or: bool,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub name_suffix: Option<String>,
    pub wildcard: Option<String>,
    pub lookup_cache: Option<bool>,
    pub lookup_cache_ttl: Option<u64>,
    pub lookup_cache_max_entries: Option<u64>,
    pub webapi_url: Option<String>,
    pub webapi_token: Option<String>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    let config = CliConfig {
        config: cli.config,
        name_suffix: cli.name_suffix,
        wildcard: cli.wildcard,
        lookup_cache: cli.lookup_cache,
        lookup_cache_ttl: cli.lookup_cache_ttl,
        lookup_cache_max_entries: cli.lookup_cache_max_entries,
        webapi_url: cli.webapi_url,
        webapi_token: cli.webapi_token,
    };
    (config, cli.command)
}
