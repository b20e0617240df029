//! Main entry point for the dirguard CLI.
//!
//! This is the command-line interface for the dirguard directory resolver.
//! It provides commands for inspecting resolution:
//! - `resolve`: Resolve config, data and cache directories
//! - `layout`: Show the application directory layout
//! - `find`: Find a configuration file
//! - `completions`: Generate shell completion scripts

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let logger = dirguard::init_logger(cli.verbose, cli.quiet);
    logger.install();

    let global = GlobalOptions {
        quiet: cli.quiet,
        settings: cli.settings,
        app_name: cli.app_name,
        roots: cli.roots,
        logger,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Resolve(cmd) => cmd.execute(&global),
        cli::Command::Layout(cmd) => cmd.execute(&global),
        cli::Command::Find(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
