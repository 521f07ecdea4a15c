//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--address <url>` / `-a`: Runtime bridge address
//! - `--namespace <name>` / `-n`: Namespace for all lookups
//! - `--data-root <path>`: Root of the local data store
//! - `--config <path>`: Config file location
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cask - a CLI for identifying and managing containers
#[derive(Parser, Debug)]
#[command(name = "cask")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Runtime bridge address
    #[arg(short, long, global = true)]
    pub address: Option<String>,

    /// Namespace scoping all container lookups
    #[arg(short, long, global = true)]
    pub namespace: Option<String>,

    /// Root of the local data store
    #[arg(long, global = true, value_name = "PATH")]
    pub data_root: Option<PathBuf>,

    /// Config file location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Display detailed information on one or more containers
    #[command(
        name = "inspect",
        long_about = "Display detailed information on one or more containers.\n\n\
            Each CONTAINER may be a full container id, a unique id prefix, or a \
            container name. Every reference is attempted; failures are collected \
            and reported together after the successful results.\n\n\
            Hint: set `--mode=native` for the full runtime-native output.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Docker-compatible detail for one container (default mode)
    cask inspect web

    # Runtime-native detail
    cask inspect --mode=native web

    # Several containers at once; failures do not stop the batch
    cask inspect web db 8a9f2c"
    )]
    Inspect {
        /// Container references (id, id prefix, or name)
        #[arg(required = true, value_name = "CONTAINER")]
        containers: Vec<String>,

        /// Inspect mode: "dockercompat" or "native"
        #[arg(long, default_value = "dockercompat")]
        mode: String,

        /// Output format: "table" (pretty JSON array) or "json" (one
        /// document per line)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Rename a container
    #[command(
        name = "rename",
        long_about = "Rename a container.\n\n\
            CONTAINER may be a full container id, a unique id prefix, or a \
            container name; it must resolve to exactly one container. The new \
            name is written to the runtime's name label and to the container's \
            hosts metadata record, when one exists. Renaming to a name already \
            carried by another container in the namespace fails.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Rename by current name
    cask rename web frontend

    # Rename by id prefix
    cask rename 8a9f2c frontend"
    )]
    Rename {
        /// Container reference (id, id prefix, or name)
        #[arg(value_name = "CONTAINER")]
        container: String,

        /// New container name
        #[arg(value_name = "NEW_NAME")]
        new_name: String,
    },

    /// Restart one or more running containers
    #[command(
        name = "restart",
        long_about = "Restart one or more running containers.\n\n\
            Each container's task is stopped (waiting up to --time seconds \
            before killing it) and started again. Every reference is \
            attempted; failures are collected and reported together."
    )]
    Restart {
        /// Container references (id, id prefix, or name)
        #[arg(required = true, value_name = "CONTAINER")]
        containers: Vec<String>,

        /// Seconds to wait for stop before killing the task
        #[arg(short = 't', long = "time", default_value_t = 10)]
        time: u64,
    },

    /// Generate shell completion scripts
    #[command(name = "completion")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Shells supported by the completion command.
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn inspect_parses_multiple_references() {
        let cli = Cli::try_parse_from(["cask", "inspect", "web", "db"]).unwrap();
        match cli.command {
            Command::Inspect {
                containers, mode, ..
            } => {
                assert_eq!(containers, vec!["web", "db"]);
                assert_eq!(mode, "dockercompat");
            }
            other => panic!("expected inspect, got {other:?}"),
        }
    }

    #[test]
    fn inspect_requires_a_reference() {
        assert!(Cli::try_parse_from(["cask", "inspect"]).is_err());
    }

    #[test]
    fn rename_takes_two_positionals() {
        let cli = Cli::try_parse_from(["cask", "rename", "web", "frontend"]).unwrap();
        match cli.command {
            Command::Rename {
                container,
                new_name,
            } => {
                assert_eq!(container, "web");
                assert_eq!(new_name, "frontend");
            }
            other => panic!("expected rename, got {other:?}"),
        }
    }

    #[test]
    fn restart_default_grace_period() {
        let cli = Cli::try_parse_from(["cask", "restart", "web"]).unwrap();
        match cli.command {
            Command::Restart { time, .. } => assert_eq!(time, 10),
            other => panic!("expected restart, got {other:?}"),
        }
    }

    #[test]
    fn global_flags_apply_after_subcommand() {
        let cli =
            Cli::try_parse_from(["cask", "inspect", "web", "--namespace", "prod"]).unwrap();
        assert_eq!(cli.namespace.as_deref(), Some("prod"));
    }
}
