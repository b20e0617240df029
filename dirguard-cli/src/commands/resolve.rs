//! Resolve command implementation.
//!
//! Prints the directory chosen for each requested kind together with the
//! verdict on its hint. Rejected hints still succeed (exit 0) because the
//! platform default is used; warnings go to stderr through the logger.

use crate::error::CliError;
use crate::utils::{format_resolution, load_context, render, GlobalOptions, OutputFormat};
use clap::Args;
use dirguard::config::ProcessEnv;
use dirguard::DirKind;

/// Resolve directory kinds from the environment.
#[derive(Args)]
pub struct ResolveCommand {
    /// Kinds to resolve (config, data, cache); all when omitted
    #[arg(value_name = "KIND", value_parser = DirKind::parse)]
    pub kinds: Vec<DirKind>,

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

impl ResolveCommand {
    /// Execute the resolve command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let ctx = load_context(global)?;

        let mut kinds: Vec<DirKind> = Vec::new();
        for kind in self.kinds {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        if kinds.is_empty() {
            kinds = DirKind::ALL.to_vec();
        }

        let resolutions = ctx
            .resolver()
            .resolve_kinds(&kinds, &ProcessEnv, &global.logger)?;

        match self.format {
            OutputFormat::Human => {
                for resolution in &resolutions {
                    println!("{}", format_resolution(&ctx, resolution));
                }
            }
            format => println!("{}", render(format, &resolutions)?),
        }

        Ok(())
    }
}
