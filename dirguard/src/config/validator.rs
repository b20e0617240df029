//! Configuration validation.
//!
//! Ensures variable names are usable, the override toggle cannot be confused
//! with a hint, and configured roots cannot widen the allowlist to the whole
//! filesystem.

use std::path::Path;

use crate::config::ResolverConfig;
use crate::error::{Error, Result};
use crate::fallback::DirKind;
use crate::path::canonicalize::canonicalize_trusted;
use crate::path::sanitize::validate_name;

/// Upper bound for `max_symlink_depth`.
pub const MAX_SYMLINK_DEPTH_LIMIT: usize = 255;

/// Validates a [`ResolverConfig`].
///
/// # Examples
///
/// ```
/// use dirguard::config::{ConfigValidator, ResolverConfig};
///
/// ConfigValidator::validate(&ResolverConfig::default()).unwrap();
///
/// let clash = ResolverConfig {
///     override_var: "XDG_CONFIG_HOME".to_string(),
///     ..Default::default()
/// };
/// assert!(ConfigValidator::validate(&clash).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for the first invalid field, or
    /// `Error::InvalidName` for an unsafe application name.
    pub fn validate(config: &ResolverConfig) -> Result<()> {
        Self::validate_var_name("config_var", &config.config_var)?;
        Self::validate_var_name("data_var", &config.data_var)?;
        Self::validate_var_name("cache_var", &config.cache_var)?;
        Self::validate_var_name("override_var", &config.override_var)?;

        if let Some(kind) = DirKind::ALL
            .into_iter()
            .find(|kind| config.hint_var(*kind) == config.override_var)
        {
            return Err(Error::Validation {
                field: "override_var".into(),
                message: format!(
                    "must differ from the {kind} hint variable '{}'",
                    config.override_var
                ),
            });
        }

        if config.max_symlink_depth == 0 || config.max_symlink_depth > MAX_SYMLINK_DEPTH_LIMIT {
            return Err(Error::Validation {
                field: "max_symlink_depth".into(),
                message: format!(
                    "must be between 1 and {MAX_SYMLINK_DEPTH_LIMIT}, got {}",
                    config.max_symlink_depth
                ),
            });
        }

        for root in &config.extra_roots {
            Self::validate_extra_root(root)?;
        }

        if let Some(ref app_name) = config.app_name {
            validate_name(app_name)?;
        }

        Ok(())
    }

    /// Environment variable names: non-empty, no `=`, no NUL, no whitespace.
    fn validate_var_name(field: &str, value: &str) -> Result<()> {
        if value.is_empty() {
            return Err(Error::Validation {
                field: field.into(),
                message: "Cannot be empty".into(),
            });
        }

        if let Some(c) = value
            .chars()
            .find(|c| *c == '=' || *c == '\0' || c.is_whitespace() || c.is_control())
        {
            return Err(Error::Validation {
                field: field.into(),
                message: format!("Invalid character {c:?} in variable name"),
            });
        }

        if value.len() > 255 {
            return Err(Error::Validation {
                field: field.into(),
                message: "Cannot exceed 255 characters".into(),
            });
        }

        Ok(())
    }

    fn validate_extra_root(root: &Path) -> Result<()> {
        if !root.is_absolute() {
            return Err(Error::Validation {
                field: "extra_roots".into(),
                message: format!("root must be absolute: {}", root.display()),
            });
        }

        // A root that does not exist yet is skipped later, when roots are built.
        let resolved = canonicalize_trusted(root).unwrap_or_else(|_| root.to_path_buf());
        if resolved.parent().is_none() {
            return Err(Error::Validation {
                field: "extra_roots".into(),
                message: format!("filesystem root cannot be an allowed root: {}", root.display()),
            });
        }

        Ok(())
    }
}
