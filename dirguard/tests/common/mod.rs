//! Common test utilities for integration tests.
//!
//! This module provides a sandboxed home directory and resolver fixtures for
//! testing the dirguard library without touching the real environment.

use std::fs;
use std::path::{Path, PathBuf};

use dirguard::config::MapEnv;
use dirguard::{AllowedRoots, Platform, Resolver, ResolverConfig, SystemFacts};
use tempfile::TempDir;

/// Name of the default override toggle.
#[allow(dead_code)]
pub const OVERRIDE_VAR: &str = "DIRGUARD_ALLOW_CUSTOM_PATHS";

/// A fake home directory with an allowed-roots set covering only it, plus a
/// second directory that lies outside every root.
pub struct Sandbox {
    pub home: TempDir,
    pub outside: TempDir,
    pub roots: AllowedRoots,
}

#[allow(dead_code)]
impl Sandbox {
    /// Creates a new sandbox.
    pub fn new() -> Self {
        let home = tempfile::tempdir().expect("create home");
        let outside = tempfile::tempdir().expect("create outside dir");
        let roots = AllowedRoots::from_paths([("home", home.path())]);
        Self {
            home,
            outside,
            roots,
        }
    }

    /// Canonical home directory.
    pub fn home_path(&self) -> PathBuf {
        fs::canonicalize(self.home.path()).expect("canonicalize home")
    }

    /// Canonical outside directory.
    pub fn outside_path(&self) -> PathBuf {
        fs::canonicalize(self.outside.path()).expect("canonicalize outside")
    }

    /// Facts pointing at the sandbox home.
    pub fn facts(&self) -> SystemFacts {
        SystemFacts::new(Some(self.home.path().to_path_buf()), Platform::Xdg)
    }

    /// A resolver with default configuration.
    pub fn resolver(&self) -> Resolver<'_> {
        self.resolver_with(ResolverConfig::default())
    }

    /// A resolver with the given configuration.
    pub fn resolver_with(&self, config: ResolverConfig) -> Resolver<'_> {
        Resolver::new(config, self.facts(), &self.roots)
    }

    /// The XDG default for the config kind under the sandbox home.
    pub fn default_config_dir(&self) -> PathBuf {
        self.home_path().join(".config")
    }

    /// Create a directory (and parents) under the sandbox home.
    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let path = self.home.path().join(relative);
        fs::create_dir_all(&path).expect("create directory");
        path
    }
}

/// An environment holding a single hint.
#[allow(dead_code)]
pub fn env_with_hint(var: &str, value: impl AsRef<Path>) -> MapEnv {
    MapEnv::new().with(var, value.as_ref().as_os_str())
}
