//! Platform-conventional default directories.
//!
//! The fallback never reads the hint variables: it is derived only from the
//! home directory and the platform, so a hostile hint cannot steer it.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::path::canonicalize::{canonicalize_existing, canonicalize_trusted};
use crate::path::CanonicalPath;

/// The kind of directory being resolved.
///
/// # Examples
///
/// ```
/// use dirguard::DirKind;
///
/// assert_eq!(DirKind::Config.default_hint_var(), "XDG_CONFIG_HOME");
/// assert_eq!(DirKind::parse("cache").unwrap(), DirKind::Cache);
/// assert_eq!(DirKind::Data.to_string(), "data");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirKind {
    /// Configuration files.
    Config,
    /// Persistent application data.
    Data,
    /// Disposable cached data.
    Cache,
}

impl DirKind {
    /// Every kind, in resolution order.
    pub const ALL: [Self; 3] = [Self::Config, Self::Data, Self::Cache];

    /// The XDG base-directory variable conventionally naming this kind.
    #[must_use]
    pub const fn default_hint_var(self) -> &'static str {
        match self {
            Self::Config => "XDG_CONFIG_HOME",
            Self::Data => "XDG_DATA_HOME",
            Self::Cache => "XDG_CACHE_HOME",
        }
    }

    /// Lowercase name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Data => "data",
            Self::Cache => "cache",
        }
    }

    /// Parses a kind from a string (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not recognized.
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "config" => Ok(Self::Config),
            "data" => Ok(Self::Data),
            "cache" => Ok(Self::Cache),
            _ => Err(format!("invalid directory kind: {s}")),
        }
    }
}

impl fmt::Display for DirKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directory conventions of the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Linux and other Unix systems following the XDG base-directory layout.
    Xdg,
    /// macOS (`~/Library/...`).
    MacOs,
    /// Windows (`%USERPROFILE%\AppData\...`).
    Windows,
}

impl Platform {
    /// The platform this binary was built for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(windows) {
            Self::Windows
        } else {
            Self::Xdg
        }
    }

    /// The conventional directory for `kind`, relative to the home directory.
    #[must_use]
    pub fn relative_dir(self, kind: DirKind) -> PathBuf {
        let parts: &[&str] = match (self, kind) {
            (Self::Xdg, DirKind::Config) => &[".config"],
            (Self::Xdg, DirKind::Data) => &[".local", "share"],
            (Self::Xdg, DirKind::Cache) => &[".cache"],
            (Self::MacOs, DirKind::Config | DirKind::Data) => &["Library", "Application Support"],
            (Self::MacOs, DirKind::Cache) => &["Library", "Caches"],
            (Self::Windows, DirKind::Config | DirKind::Data) => &["AppData", "Roaming"],
            (Self::Windows, DirKind::Cache) => &["AppData", "Local"],
        };
        parts.iter().collect()
    }
}

/// Facts about the host captured once at startup.
///
/// # Examples
///
/// ```
/// use dirguard::{Platform, SystemFacts};
/// use std::path::PathBuf;
///
/// let facts = SystemFacts::new(Some(PathBuf::from("/home/alice")), Platform::Xdg);
/// assert_eq!(facts.platform(), Platform::Xdg);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemFacts {
    home: Option<PathBuf>,
    platform: Platform,
}

impl SystemFacts {
    /// Create facts from explicit values.
    #[must_use]
    pub fn new(home: Option<PathBuf>, platform: Platform) -> Self {
        let home = home.filter(|h| h.is_absolute());
        Self { home, platform }
    }

    /// Discover the home directory and platform of the running process.
    #[must_use]
    pub fn discover() -> Self {
        Self::new(home::home_dir(), Platform::current())
    }

    /// The home directory, if one could be determined.
    #[must_use]
    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// The host platform.
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }
}

/// The conventional (not yet canonicalized) default for `kind`.
///
/// # Errors
///
/// Returns `FallbackUnavailable` if no home directory is known.
///
/// # Examples
///
/// ```
/// use dirguard::fallback::conventional_dir;
/// use dirguard::{DirKind, Platform, SystemFacts};
/// use std::path::PathBuf;
///
/// let facts = SystemFacts::new(Some(PathBuf::from("/home/alice")), Platform::Xdg);
/// assert_eq!(
///     conventional_dir(DirKind::Data, &facts).unwrap(),
///     PathBuf::from("/home/alice/.local/share")
/// );
/// ```
pub fn conventional_dir(kind: DirKind, facts: &SystemFacts) -> Result<PathBuf> {
    let home = facts.home().ok_or_else(|| Error::FallbackUnavailable {
        kind,
        reason: "home directory could not be determined".to_string(),
    })?;
    Ok(home.join(facts.platform().relative_dir(kind)))
}

/// The platform default directory for `kind`, canonicalized.
///
/// The directory itself need not exist; its existing ancestors are resolved
/// and the missing remainder is appended.
///
/// # Errors
///
/// Returns `FallbackUnavailable` if the home directory is unknown or cannot
/// be resolved on disk. This is the one fatal resolution error.
pub fn default_dir(kind: DirKind, facts: &SystemFacts) -> Result<CanonicalPath> {
    let conventional = conventional_dir(kind, facts)?;
    let unavailable = |reason: String| Error::FallbackUnavailable { kind, reason };

    if let Some(home) = facts.home() {
        canonicalize_trusted(home)
            .map_err(|e| unavailable(format!("home directory is not usable: {e}")))?;
    }

    let (existing, remainder) = canonicalize_existing(&conventional)
        .map_err(|e| unavailable(format!("default directory is not usable: {e}")))?;
    let exists = remainder.is_none();
    let path = match remainder {
        Some(rest) => existing.join(rest),
        None => existing,
    };

    CanonicalPath::new(path, Vec::new(), exists).map_err(|e| unavailable(e.to_string()))
}
