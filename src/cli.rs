use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{PatchConfig, CONFIG_FILE};
use crate::error::Result;

#[derive(Parser)]
#[command(name = "site-patch")]
#[command(version)]
#[command(about = "One-shot content patches for the trade finance showcase site")]
pub struct Args {
    /// Site root the artifact paths are relative to (overrides the config file)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Config file with root / write settings
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Compute the patch but leave the artifact untouched
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Log every patch state transition
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Apply patches in order, stopping at the first failure
    Apply {
        /// Patch names (policy-cap, flow-items, mock-v2)
        #[arg(required = true)]
        patches: Vec<String>,
    },
    /// List the built-in patches and their targets
    List,
    /// Validate the content document and print derived values
    Check,
}

/// Load the config file and apply command-line overrides.
pub fn resolve_config(args: &Args) -> Result<PatchConfig> {
    let mut config = PatchConfig::load_or_default(&args.config)?;
    if let Some(root) = &args.root {
        config.root = root.clone();
    }
    Ok(config)
}

/// Default tracing filter for the chosen verbosity; `RUST_LOG` wins over it.
pub fn default_log_filter(verbose: bool) -> &'static str {
    if verbose {
        "site_patch=debug"
    } else {
        "site_patch=warn"
    }
}
