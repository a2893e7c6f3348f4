//! CLI argument definitions using clap.
//!
//! This module defines the command-line interface structure for all pardon
//! commands. It uses clap's derive API for declarative argument parsing.
//!
//! ## Commands
//!
//! - `scan`: Collect resolution directives from source comments
//! - `apply`: Reconcile directives with the persisted issue snapshot
//! - `init`: Initialize pardon configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Scan(cmd)) => cmd.common.verbose,
            Some(Command::Apply(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by scan and apply.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project root holding the configuration file
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Source code root directory (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct ScanCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ApplyCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Issue snapshot path (overrides config file)
    #[arg(long)]
    pub issues: Option<PathBuf>,

    /// Account directory path (overrides config file)
    #[arg(long)]
    pub accounts: Option<PathBuf>,

    /// Save the updated snapshot (default is dry-run)
    #[arg(long)]
    pub write: bool,

    /// Skip git blame author attribution
    #[arg(long)]
    pub no_blame: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Collect resolution directives from source comments
    Scan(ScanCommand),
    /// Reconcile directives with the persisted issue snapshot
    Apply(ApplyCommand),
    /// Initialize a new .pardonrc.json configuration file
    Init,
}
