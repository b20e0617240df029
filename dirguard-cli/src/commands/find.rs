//! Find command implementation.
//!
//! Looks for a configuration file first in the repository-local
//! `.<app>` directory (when run inside a git work tree), then in the
//! user's application config directory.

use crate::error::CliError;
use crate::utils::{load_context, GlobalOptions};
use clap::Args;
use dirguard::lookup::{local_config_dir, resolve_config_file};
use std::env;

/// Find a configuration file.
#[derive(Args)]
pub struct FindCommand {
    /// File name to look for
    #[arg(value_name = "FILENAME")]
    pub filename: String,

    /// Subdirectory of the config directories to search
    #[arg(long, value_name = "DIR", default_value = "")]
    pub subdir: String,

    /// Skip the repository-local config directory
    #[arg(long)]
    pub no_local: bool,
}

impl FindCommand {
    /// Execute the find command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let ctx = load_context(global)?;
        let layout = ctx.layout(global)?;

        let local = if self.no_local {
            None
        } else {
            local_config_dir(&env::current_dir()?, layout.app_name())?
        };

        let found = resolve_config_file(
            &self.filename,
            &self.subdir,
            local.as_deref(),
            layout.root(),
        )?;
        println!("{}", found.display());
        Ok(())
    }
}
