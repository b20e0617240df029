//! Environment sources for hints and the override toggle.
//!
//! The resolver never reads `std::env` directly; it is handed an
//! [`EnvSource`] so tests (and embedders) can supply a fixed environment.

use std::collections::HashMap;
use std::env;
use std::ffi::{OsStr, OsString};

use crate::error::{Error, Result};

/// A read-only view of environment variables.
pub trait EnvSource: Send + Sync {
    /// The raw value of `name`, if set.
    fn var_os(&self, name: &str) -> Option<OsString>;
}

/// The environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var_os(&self, name: &str) -> Option<OsString> {
        env::var_os(name)
    }
}

/// A fixed, in-memory environment.
///
/// # Examples
///
/// ```
/// use dirguard::config::{EnvSource, MapEnv};
///
/// let env = MapEnv::new()
///     .with("XDG_CONFIG_HOME", "/tmp/cfg")
///     .with("DIRGUARD_ALLOW_CUSTOM_PATHS", "1");
/// assert_eq!(env.var_os("XDG_CONFIG_HOME").unwrap(), "/tmp/cfg");
/// assert!(env.var_os("XDG_DATA_HOME").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: HashMap<String, OsString>,
}

impl MapEnv {
    /// An empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, returning the updated environment.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a variable in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<OsString>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Remove a variable.
    pub fn remove(&mut self, name: &str) {
        self.vars.remove(name);
    }
}

impl EnvSource for MapEnv {
    fn var_os(&self, name: &str) -> Option<OsString> {
        self.vars.get(name).cloned()
    }
}

/// Parse a boolean value from a string.
///
/// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
///
/// # Errors
///
/// Returns `Error::Validation` naming `field` for any other value.
///
/// # Examples
///
/// ```
/// use dirguard::config::parse_bool;
///
/// assert!(parse_bool("DIRGUARD_ALLOW_CUSTOM_PATHS", "Yes").unwrap());
/// assert!(!parse_bool("DIRGUARD_ALLOW_CUSTOM_PATHS", "0").unwrap());
/// assert!(parse_bool("DIRGUARD_ALLOW_CUSTOM_PATHS", "maybe").is_err());
/// ```
pub fn parse_bool(field: &str, s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(Error::Validation {
            field: field.into(),
            message: format!("Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"),
        }),
    }
}

/// Read a boolean toggle, treating an unset or empty variable as false.
///
/// # Errors
///
/// Returns `Error::Validation` if the value is not valid Unicode or not a
/// recognised boolean.
pub fn read_toggle(env: &dyn EnvSource, name: &str) -> Result<bool> {
    match env.var_os(name) {
        None => Ok(false),
        Some(value) if value.is_empty() => Ok(false),
        Some(value) => parse_bool(name, os_str_to_str(name, &value)?),
    }
}

fn os_str_to_str<'a>(name: &str, value: &'a OsStr) -> Result<&'a str> {
    value.to_str().ok_or_else(|| Error::Validation {
        field: name.into(),
        message: format!("value is not valid Unicode: {}", value.to_string_lossy()),
    })
}
