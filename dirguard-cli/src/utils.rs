//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including settings loading, resolver construction and output formatting.

use crate::error::CliError;
use clap::ValueEnum;
use dirguard::config::{ProcessEnv, ResolverConfigBuilder};
use dirguard::lookup::git_workdir;
use dirguard::path::display::shorten_for_display;
use dirguard::{
    AllowedRoots, AppLayout, DirKind, Logger, Resolution, Resolver, ResolverConfig, SystemFacts,
};
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Suppress non-essential output.
    pub quiet: bool,

    /// YAML settings file.
    pub settings: Option<PathBuf>,

    /// Application name.
    pub app_name: Option<String>,

    /// Extra allowed roots.
    pub roots: Vec<PathBuf>,

    /// Diagnostic sink for resolution warnings.
    pub logger: Logger,
}

/// Output format shared by the reporting commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned plain text
    Human,
    /// JSON
    Json,
    /// YAML
    Yaml,
}

/// Everything a command needs to run the resolver.
pub struct Context {
    /// Validated resolver settings.
    pub config: ResolverConfig,
    /// Host facts captured at startup.
    pub facts: SystemFacts,
    /// Allowed roots derived from the facts and settings.
    pub roots: AllowedRoots,
}

impl Context {
    /// A resolver borrowing this context's roots.
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self.config.clone(), self.facts.clone(), &self.roots)
    }

    /// Resolve the config directory and derive the application layout.
    pub fn layout(&self, global: &GlobalOptions) -> Result<AppLayout, CliError> {
        let app_name = self.app_name()?;
        let resolution = self
            .resolver()
            .resolve(DirKind::Config, &ProcessEnv, &global.logger)?;
        Ok(AppLayout::from_resolution(&resolution, app_name)?)
    }

    /// The configured application name.
    pub fn app_name(&self) -> Result<&str, CliError> {
        self.config.app_name.as_deref().ok_or_else(|| {
            CliError::InvalidArguments(
                "no application name (use --app-name or set app_name in settings)".to_string(),
            )
        })
    }

    /// Shorten a path for display relative to the git root or home.
    pub fn display_path(&self, path: &Path) -> String {
        let git_root = env::current_dir().ok().and_then(|cwd| git_workdir(&cwd));
        shorten_for_display(path, git_root.as_deref(), self.facts.home())
    }
}

/// Load settings and capture host facts.
///
/// Settings are layered with precedence:
/// 1. Command-line options (highest priority)
/// 2. The settings file
/// 3. Built-in defaults (lowest priority)
pub fn load_context(global: &GlobalOptions) -> Result<Context, CliError> {
    let mut builder = ResolverConfigBuilder::new();
    if let Some(settings) = &global.settings {
        if !settings.is_file() {
            return Err(CliError::Config(format!(
                "settings file not found: {}",
                settings.display()
            )));
        }
        builder = builder.settings_file(settings);
    }
    if let Some(app_name) = &global.app_name {
        builder = builder.app_name(app_name.clone());
    }
    for root in &global.roots {
        builder = builder.extra_root(root.clone());
    }
    let config = builder.build()?;

    let facts = SystemFacts::discover();
    let roots = AllowedRoots::discover(&facts, &config);
    Ok(Context {
        config,
        facts,
        roots,
    })
}

/// Serialize `value` for the machine-readable formats.
pub fn render<T: Serialize + ?Sized>(format: OutputFormat, value: &T) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| CliError::InvalidArguments(format!("cannot render JSON: {e}"))),
        OutputFormat::Yaml => serde_yaml::to_string(value)
            .map(|s| s.trim_end().to_string())
            .map_err(|e| CliError::InvalidArguments(format!("cannot render YAML: {e}"))),
        OutputFormat::Human => Err(CliError::InvalidArguments(
            "human output is rendered by the command".to_string(),
        )),
    }
}

/// One human-readable line per resolution.
pub fn format_resolution(ctx: &Context, resolution: &Resolution) -> String {
    let mut line = format!(
        "{:<6} {}  [{}]",
        resolution.kind,
        ctx.display_path(&resolution.resolved_path),
        resolution.verdict
    );
    if resolution.unvalidated {
        line.push_str(" (unvalidated)");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirguard::config::MapEnv;
    use dirguard::diagnostics::NullSink;
    use dirguard::Platform;

    fn context(home: &Path) -> Context {
        let config = ResolverConfig::default();
        let facts = SystemFacts::new(Some(home.to_path_buf()), Platform::Xdg);
        let roots = AllowedRoots::from_paths([("home", home)]);
        Context {
            config,
            facts,
            roots,
        }
    }

    #[test]
    fn test_format_resolution_shortens_home() {
        let home = tempfile::tempdir().unwrap();
        let ctx = context(home.path());
        let resolution = ctx
            .resolver()
            .resolve(DirKind::Config, &MapEnv::new(), &NullSink)
            .unwrap();

        let line = format_resolution(&ctx, &resolution);
        assert!(line.starts_with("config ~/.config"));
        assert!(line.ends_with("[no_hint_provided]"));
    }

    #[test]
    fn test_missing_app_name_is_invalid_arguments() {
        let home = tempfile::tempdir().unwrap();
        let ctx = context(home.path());
        assert!(matches!(ctx.app_name(), Err(CliError::InvalidArguments(_))));
    }

    #[test]
    fn test_render_json() {
        let rendered = render(OutputFormat::Json, &["a", "b"]).unwrap();
        assert!(rendered.contains("\"a\""));
    }
}
