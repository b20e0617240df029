//! Builder for [`ResolverConfig`].

use std::path::{Path, PathBuf};

use crate::config::{ConfigLoader, ConfigValidator, ResolverConfig};
use crate::error::Result;
use crate::fallback::DirKind;

/// Builds a validated [`ResolverConfig`].
///
/// Starts from defaults, optionally layers a YAML settings file, then applies
/// programmatic overrides. Later calls win.
///
/// # Examples
///
/// ```
/// use dirguard::config::ResolverConfigBuilder;
/// use dirguard::DirKind;
///
/// let config = ResolverConfigBuilder::new()
///     .hint_var(DirKind::Config, "MYAPP_CONFIG_DIR")
///     .extra_root("/srv/myapp")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.hint_var(DirKind::Config), "MYAPP_CONFIG_DIR");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResolverConfigBuilder {
    settings_file: Option<PathBuf>,
    base: Option<ResolverConfig>,
    hint_vars: Vec<(DirKind, String)>,
    override_var: Option<String>,
    permit_override: Option<bool>,
    include_temp_roots: Option<bool>,
    extra_roots: Vec<PathBuf>,
    max_symlink_depth: Option<usize>,
    app_name: Option<String>,
}

impl ResolverConfigBuilder {
    /// A builder starting from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a YAML file before applying overrides.
    #[must_use]
    pub fn settings_file(mut self, path: impl AsRef<Path>) -> Self {
        self.settings_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Start from an existing configuration instead of the defaults.
    #[must_use]
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.base = Some(config);
        self
    }

    /// Use `name` as the hint variable for `kind`.
    #[must_use]
    pub fn hint_var(mut self, kind: DirKind, name: impl Into<String>) -> Self {
        self.hint_vars.push((kind, name.into()));
        self
    }

    /// Use `name` as the override toggle variable.
    #[must_use]
    pub fn override_var(mut self, name: impl Into<String>) -> Self {
        self.override_var = Some(name.into());
        self
    }

    /// Allow or forbid override mode for this process.
    #[must_use]
    pub fn permit_override(mut self, permit: bool) -> Self {
        self.permit_override = Some(permit);
        self
    }

    /// Include or exclude `/tmp` and `/var/tmp` as allowed roots.
    #[must_use]
    pub fn include_temp_roots(mut self, include: bool) -> Self {
        self.include_temp_roots = Some(include);
        self
    }

    /// Add an allowed root.
    #[must_use]
    pub fn extra_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.extra_roots.push(root.into());
        self
    }

    /// Set the maximum number of symlinks followed per hint.
    #[must_use]
    pub fn max_symlink_depth(mut self, depth: usize) -> Self {
        self.max_symlink_depth = Some(depth);
        self
    }

    /// Set the application name.
    #[must_use]
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Assemble and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be read or parsed, or if
    /// the resulting configuration fails validation.
    pub fn build(self) -> Result<ResolverConfig> {
        let mut config = match (self.base, &self.settings_file) {
            (Some(base), _) => base,
            (None, Some(path)) => ConfigLoader::load_file(path)?,
            (None, None) => ResolverConfig::default(),
        };

        for (kind, name) in self.hint_vars {
            match kind {
                DirKind::Config => config.config_var = name,
                DirKind::Data => config.data_var = name,
                DirKind::Cache => config.cache_var = name,
            }
        }
        if let Some(name) = self.override_var {
            config.override_var = name;
        }
        if let Some(permit) = self.permit_override {
            config.permit_override = permit;
        }
        if let Some(include) = self.include_temp_roots {
            config.include_temp_roots = include;
        }
        config.extra_roots.extend(self.extra_roots);
        if let Some(depth) = self.max_symlink_depth {
            config.max_symlink_depth = depth;
        }
        if let Some(name) = self.app_name {
            config.app_name = Some(name);
        }

        ConfigValidator::validate(&config)?;
        Ok(config)
    }
}
