use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;

use crate::constants::prefs::PREFS_FILE_NAME;
use crate::prefs::{Endpoint, Endpoints};

/// explorer-params - block explorer URL parameter codec
///
/// Encode filter state into explorer links, decode links back into typed
/// state, and check what a link update would do.
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug)]
#[command(name = "explorer-params")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Block explorer URL parameter codec", long_about = None)]
pub struct CliArgs {
    /// Route schema file (TOML); the built-in explorer routes when omitted
    #[arg(long, env = "EXPLORER_SCHEMA")]
    pub schema: Option<PathBuf>,

    /// Preferences file holding the selected endpoints
    #[arg(long, env = "EXPLORER_PREFS_PATH")]
    pub prefs_path: Option<PathBuf>,

    /// Data API endpoint used when none is selected
    #[arg(long, env = "EXPLORER_API_URL")]
    pub api_url: Option<String>,

    /// Node RPC endpoint used when none is selected
    #[arg(long, env = "EXPLORER_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Debug categories (comma-separated: codec, sync, router, prefs, all)
    #[arg(long, env = "EXPLORER_DEBUG")]
    pub debug: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List the routes of the schema with their path templates
    Routes,

    /// Build a link from field values
    Encode {
        /// Route name (see `routes`)
        route: String,
        /// Field values as FIELD=VALUE; lists use commas, dates RFC 3339
        #[arg(value_name = "FIELD=VALUE")]
        fields: Vec<String>,
    },

    /// Read a link back into the full, typed filter state
    Decode {
        route: String,
        /// Path and query, e.g. "/@alice?page=2"
        url: String,
    },

    /// Show whether changing fields on the current link needs a replace
    Sync {
        route: String,
        /// Current path and query
        url: String,
        #[arg(value_name = "FIELD=VALUE")]
        fields: Vec<String>,
    },

    /// Inspect or change the selected endpoints
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum PrefsAction {
    /// Print the endpoints in effect
    Show,
    /// Select an endpoint
    Set {
        #[arg(value_parser = clap::value_parser!(Endpoint))]
        endpoint: Endpoint,
        url: String,
    },
    /// Forget a selection
    Reset {
        #[arg(value_parser = clap::value_parser!(Endpoint))]
        endpoint: Endpoint,
    },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub schema_path: Option<PathBuf>,
    pub prefs_path: PathBuf,
    pub endpoints: Endpoints,
    pub debug: String,
}

/// Validate URL format (basic check)
pub fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }

    // Basic scheme validation
    if url.starts_with("ws://")
        || url.starts_with("wss://")
        || url.starts_with("http://")
        || url.starts_with("https://")
    {
        Ok(())
    } else {
        Err(anyhow!(
            "{name} must start with ws://, wss://, http://, or https://"
        ))
    }
}

fn default_prefs_path() -> PathBuf {
    env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from("."))
        .join(PREFS_FILE_NAME)
}

/// Load configuration from CLI args and environment variables
/// Priority: CLI args > Environment variables > Defaults
pub fn load() -> Result<(Config, Command)> {
    from_args(CliArgs::parse())
}

/// Resolve parsed arguments into a validated config
pub fn from_args(args: CliArgs) -> Result<(Config, Command)> {
    let defaults = Endpoints::default();

    let api = args.api_url.unwrap_or(defaults.api);
    validate_url(&api, "EXPLORER_API_URL")?;

    let rpc = args.rpc_url.unwrap_or(defaults.rpc);
    validate_url(&rpc, "EXPLORER_RPC_URL")?;

    let config = Config {
        schema_path: args.schema,
        prefs_path: args.prefs_path.unwrap_or_else(default_prefs_path),
        endpoints: Endpoints { api, rpc },
        debug: args.debug.unwrap_or_default(),
    };
    Ok((config, args.command))
}

/// Print current configuration (useful for debugging)
impl Config {
    pub fn print_summary(&self) {
        eprintln!("explorer-params Configuration:");
        match &self.schema_path {
            Some(path) => eprintln!("  Schema: {}", path.display()),
            None => eprintln!("  Schema: built-in"),
        }
        eprintln!("  Preferences: {}", self.prefs_path.display());
        eprintln!("  Fallback API: {}", self.endpoints.api);
        eprintln!("  Fallback RPC: {}", self.endpoints.rpc);
        if !self.debug.is_empty() {
            eprintln!("  Debug: {}", self.debug);
        }
    }
}
