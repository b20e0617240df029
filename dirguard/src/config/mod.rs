//! Resolver configuration.
//!
//! This module provides:
//! - [`ResolverConfig`], the serde-backed settings of a resolver
//! - [`ResolverConfigBuilder`] for programmatic construction with validation
//! - [`ConfigLoader`] for YAML settings files
//! - [`EnvSource`] and its implementations for reading hints and the
//!   override toggle
//!
//! # Examples
//!
//! Defaults:
//!
//! ```
//! use dirguard::config::ResolverConfig;
//! use dirguard::DirKind;
//!
//! let config = ResolverConfig::default();
//! assert_eq!(config.hint_var(DirKind::Config), "XDG_CONFIG_HOME");
//! assert_eq!(config.override_var, "DIRGUARD_ALLOW_CUSTOM_PATHS");
//! assert!(config.permit_override);
//! ```
//!
//! Programmatic configuration:
//!
//! ```
//! use dirguard::config::ResolverConfigBuilder;
//!
//! let config = ResolverConfigBuilder::new()
//!     .override_var("MYAPP_ALLOW_CUSTOM_PATHS")
//!     .app_name("myapp")
//!     .permit_override(false)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.app_name.as_deref(), Some("myapp"));
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod validator;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::fallback::DirKind;
use crate::path::canonicalize::DEFAULT_MAX_SYMLINK_DEPTH;

pub use builder::ResolverConfigBuilder;
pub use environment::{parse_bool, EnvSource, MapEnv, ProcessEnv};
pub use loader::ConfigLoader;
pub use validator::ConfigValidator;

/// Default name of the override toggle variable.
pub const DEFAULT_OVERRIDE_VAR: &str = "DIRGUARD_ALLOW_CUSTOM_PATHS";

/// Settings of a [`crate::Resolver`].
///
/// Every field has a default, so a settings file only needs the fields it
/// changes.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Hint variable for the config directory.
    pub config_var: String,

    /// Hint variable for the data directory.
    pub data_var: String,

    /// Hint variable for the cache directory.
    pub cache_var: String,

    /// Toggle variable that enables override mode.
    pub override_var: String,

    /// Whether this process permits override mode at all.
    ///
    /// When false the toggle variable is ignored (with a warning).
    pub permit_override: bool,

    /// Whether `/tmp` and `/var/tmp` are allowed roots on Unix.
    pub include_temp_roots: bool,

    /// Additional allowed roots.
    pub extra_roots: Vec<PathBuf>,

    /// Maximum number of symlinks followed while canonicalizing a hint.
    pub max_symlink_depth: usize,

    /// Application name used for per-app layout and lookups.
    pub app_name: Option<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            config_var: DirKind::Config.default_hint_var().to_string(),
            data_var: DirKind::Data.default_hint_var().to_string(),
            cache_var: DirKind::Cache.default_hint_var().to_string(),
            override_var: DEFAULT_OVERRIDE_VAR.to_string(),
            permit_override: true,
            include_temp_roots: true,
            extra_roots: Vec::new(),
            max_symlink_depth: DEFAULT_MAX_SYMLINK_DEPTH,
            app_name: None,
        }
    }
}

impl ResolverConfig {
    /// The hint variable consulted for `kind`.
    #[must_use]
    pub fn hint_var(&self, kind: DirKind) -> &str {
        match kind {
            DirKind::Config => &self.config_var,
            DirKind::Data => &self.data_var,
            DirKind::Cache => &self.cache_var,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.hint_var(DirKind::Data), "XDG_DATA_HOME");
        assert_eq!(config.hint_var(DirKind::Cache), "XDG_CACHE_HOME");
        assert_eq!(config.max_symlink_depth, 40);
        assert!(config.include_temp_roots);
        assert!(config.extra_roots.is_empty());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: ResolverConfig =
            serde_yaml::from_str("config_var: MYAPP_CONFIG\npermit_override: false\n").unwrap();
        assert_eq!(config.hint_var(DirKind::Config), "MYAPP_CONFIG");
        assert_eq!(config.data_var, "XDG_DATA_HOME");
        assert!(!config.permit_override);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: std::result::Result<ResolverConfig, _> =
            serde_yaml::from_str("allow_everything: true\n");
        assert!(result.is_err());
    }
}
