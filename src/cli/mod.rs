//! cli
//!
//! Command-line interface layer for Cask.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Resolve configuration (flags, environment, config file)
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, resolves the
//! explicit [`Config`] value, and dispatches to command handlers. All
//! container resolution and mutation flows through [`crate::core`].

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::Result;

use crate::core::config::{Config, Overrides};
use crate::ui::output::Verbosity;

/// Per-invocation execution context.
#[derive(Debug, Clone)]
pub struct Context {
    /// Resolved configuration.
    pub config: Config,
    /// Output verbosity from the quiet/debug flags.
    pub verbosity: Verbosity,
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let overrides = Overrides {
        address: cli.address.clone(),
        namespace: cli.namespace.clone(),
        data_root: cli.data_root.clone(),
    };
    let config = Config::resolve(overrides, cli.config.as_deref())?;

    let ctx = Context {
        config,
        verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
    };

    // Dispatch to command handler
    commands::dispatch(cli.command, &ctx)
}
