//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{CompletionsCommand, FindCommand, LayoutCommand, ResolveCommand};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Resolve configuration and data directories from untrusted hints.
#[derive(Parser)]
#[command(name = "dirguard")]
#[command(
    version,
    about = "Resolve configuration and data directories from untrusted hints",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// YAML settings file for the resolver
    ///
    /// Settings can widen the allowed roots, so they are only taken from the
    /// command line and never from the environment.
    #[arg(long, value_name = "FILE", global = true)]
    pub settings: Option<PathBuf>,

    /// Application name used for layout and file lookup
    #[arg(long, value_name = "NAME", global = true, env = "DIRGUARD_APP_NAME")]
    pub app_name: Option<String>,

    /// Additional allowed root (repeatable)
    #[arg(long = "root", value_name = "PATH", global = true)]
    pub roots: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Resolve directory kinds from the environment
    Resolve(ResolveCommand),

    /// Show the application directory layout
    Layout(LayoutCommand),

    /// Find a configuration file, preferring the repository-local copy
    Find(FindCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
