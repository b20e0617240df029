//! Layout command implementation.

use crate::error::CliError;
use crate::utils::{load_context, render, GlobalOptions, OutputFormat};
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Show the application directory layout.
#[derive(Args)]
pub struct LayoutCommand {
    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "human",
        env = "DIRGUARD_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct LayoutReport<'a> {
    app_name: &'a str,
    root: &'a Path,
    directories: Vec<DirectoryEntry>,
}

#[derive(Serialize)]
struct DirectoryEntry {
    name: &'static str,
    path: PathBuf,
}

impl LayoutCommand {
    /// Execute the layout command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let ctx = load_context(global)?;
        let layout = ctx.layout(global)?;

        match self.format {
            OutputFormat::Human => {
                println!("{:<8} {}", "root", ctx.display_path(layout.root()));
                for (name, path) in layout.entries() {
                    println!("{:<8} {}", name, ctx.display_path(&path));
                }
            }
            format => {
                let report = LayoutReport {
                    app_name: layout.app_name(),
                    root: layout.root(),
                    directories: layout
                        .entries()
                        .into_iter()
                        .map(|(name, path)| DirectoryEntry { name, path })
                        .collect(),
                };
                println!("{}", render(format, &report)?);
            }
        }

        Ok(())
    }
}
