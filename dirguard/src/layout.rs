//! Per-application directory layout.
//!
//! An [`AppLayout`] names the subdirectories an application keeps beneath
//! its resolved config root. Nothing is created on disk.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;
use crate::path::sanitize::validate_name;
use crate::resolver::Resolution;

/// Subdirectory names, in display order.
pub const SUBDIRS: [&str; 7] = ["config", "toolset", "state", "logs", "data", "bin", "cache"];

/// Directories of one application.
///
/// # Examples
///
/// ```
/// use dirguard::AppLayout;
/// use std::path::Path;
///
/// let layout = AppLayout::new(Path::new("/home/alice/.config"), "myapp").unwrap();
/// assert_eq!(layout.root(), Path::new("/home/alice/.config/myapp"));
/// assert_eq!(layout.logs_dir(), Path::new("/home/alice/.config/myapp/logs"));
/// assert!(AppLayout::new(Path::new("/home/alice/.config"), "../escape").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppLayout {
    app_name: String,
    root: PathBuf,
}

impl AppLayout {
    /// Lay out `app_name` beneath `config_root`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` if `app_name` is not a safe single component.
    pub fn new(config_root: &Path, app_name: &str) -> Result<Self> {
        validate_name(app_name)?;
        Ok(Self {
            app_name: app_name.to_string(),
            root: config_root.join(app_name),
        })
    }

    /// Lay out `app_name` beneath a resolved directory.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` if `app_name` is not a safe single component.
    pub fn from_resolution(resolution: &Resolution, app_name: &str) -> Result<Self> {
        Self::new(&resolution.resolved_path, app_name)
    }

    /// The application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// `<config root>/<app>`.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Daemon configuration files.
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.root.join("config")
    }

    /// Tool definitions.
    #[must_use]
    pub fn toolset_dir(&self) -> PathBuf {
        self.root.join("toolset")
    }

    /// PIDs, sockets and other runtime state.
    #[must_use]
    pub fn state_dir(&self) -> PathBuf {
        self.root.join("state")
    }

    /// Log files.
    #[must_use]
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Databases and other persistent data.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    /// Binaries staged before installation.
    #[must_use]
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    /// Disposable downloads and build artifacts.
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.root.join("cache")
    }

    /// Every subdirectory with its name, in [`SUBDIRS`] order.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, PathBuf)> {
        SUBDIRS
            .iter()
            .map(|name| (*name, self.root.join(name)))
            .collect()
    }
}
