//! Settings file loading.

use std::fs;
use std::path::Path;

use crate::config::ResolverConfig;
use crate::error::Result;

/// Loads [`ResolverConfig`] values from YAML files.
///
/// # Examples
///
/// ```no_run
/// use dirguard::config::ConfigLoader;
/// use std::path::Path;
///
/// let config = ConfigLoader::load_file(Path::new("dirguard.yaml")).unwrap();
/// println!("override toggle: {}", config.override_var);
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and parse a settings file.
    ///
    /// Fields missing from the file keep their defaults. The result is not
    /// validated; use [`crate::config::ResolverConfigBuilder`] for that.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and
    /// `Error::Configuration` if it is not valid YAML for the schema.
    pub fn load_file(path: &Path) -> Result<ResolverConfig> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Load a settings file if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_optional(path: &Path) -> Result<Option<ResolverConfig>> {
        if !path.is_file() {
            return Ok(None);
        }
        Self::load_file(path).map(Some)
    }

    /// Parse settings from YAML text. An empty document yields defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` for invalid YAML or unknown fields.
    pub fn parse(contents: &str) -> Result<ResolverConfig> {
        if contents.trim().is_empty() {
            return Ok(ResolverConfig::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }
}
