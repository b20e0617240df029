//! Core types for path handling.
//!
//! Each stage of resolution produces a new value from the previous one:
//! [`RawHint`] → [`PathCandidate`] → [`SanitizedCandidate`] →
//! [`CanonicalPath`]. None of these types can be mutated once built.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

/// An unvalidated value read from an environment source.
///
/// Absence of the variable (`value == None`) is distinct from an empty
/// value, although both end up as "no hint provided".
///
/// # Examples
///
/// ```
/// use dirguard::path::RawHint;
///
/// let hint = RawHint::new("XDG_CONFIG_HOME", Some("/tmp/config".into()));
/// assert_eq!(hint.source(), "XDG_CONFIG_HOME");
/// assert!(hint.is_present());
///
/// let absent = RawHint::absent("XDG_CONFIG_HOME");
/// assert!(!absent.is_present());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHint {
    source: String,
    value: Option<OsString>,
}

impl RawHint {
    /// Create a hint read from `source`.
    #[must_use]
    pub fn new(source: impl Into<String>, value: Option<OsString>) -> Self {
        Self {
            source: source.into(),
            value,
        }
    }

    /// Create a hint for a variable that is not set.
    #[must_use]
    pub fn absent(source: impl Into<String>) -> Self {
        Self::new(source, None)
    }

    /// The name of the variable this hint came from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The raw value, if the variable was set.
    #[must_use]
    pub fn value(&self) -> Option<&OsString> {
        self.value.as_ref()
    }

    /// Whether the variable was set at all (possibly to an empty string).
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }

    /// Lossy rendering of the raw value for diagnostics.
    #[must_use]
    pub fn display_value(&self) -> Option<String> {
        self.value
            .as_ref()
            .map(|v| v.to_string_lossy().escape_debug().to_string())
    }

    pub(crate) fn into_parts(self) -> (String, Option<OsString>) {
        (self.source, self.value)
    }
}

/// A parsed, not-yet-validated path.
///
/// Built only by [`crate::path::hint::parse`]; never contains a null byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCandidate {
    source: String,
    raw: String,
    root: PathBuf,
    segments: Vec<String>,
}

impl PathCandidate {
    pub(crate) fn new(source: String, raw: String, root: PathBuf, segments: Vec<String>) -> Self {
        Self {
            source,
            raw,
            root,
            segments,
        }
    }

    /// The variable the candidate was parsed from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The raw hint text.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The root of the path (prefix and root directory).
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The ordered path segments below the root.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether the candidate is anchored at a filesystem root.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.root.is_absolute()
    }

    /// Reassemble the candidate into a path without touching the filesystem.
    #[must_use]
    pub fn to_path_buf(&self) -> PathBuf {
        let mut path = self.root.clone();
        path.extend(&self.segments);
        path
    }
}

/// A candidate that passed the traversal sanitizer.
///
/// Only the sanitizer constructs this type, so the canonicalizer can never be
/// handed an unchecked candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedCandidate(PathCandidate);

impl SanitizedCandidate {
    pub(crate) fn new(candidate: PathCandidate) -> Self {
        Self(candidate)
    }

    /// The underlying candidate.
    #[must_use]
    pub fn candidate(&self) -> &PathCandidate {
        &self.0
    }

    /// Consume into the underlying candidate.
    #[must_use]
    pub fn into_candidate(self) -> PathCandidate {
        self.0
    }
}

/// One followed symlink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymlinkHop {
    /// The symlink that was encountered.
    pub link: PathBuf,
    /// The raw target stored in the symlink.
    pub target: PathBuf,
}

/// A fully resolved absolute path with no `.`, `..` or symlink components.
///
/// The path either exists as a directory, or its parent exists as a directory
/// and only the final component is missing (a target not created yet).
///
/// # Examples
///
/// ```no_run
/// use dirguard::path::{canonicalize, hint, sanitize, RawHint};
///
/// let raw = RawHint::new("XDG_CONFIG_HOME", Some("/tmp".into()));
/// let candidate = hint::parse(raw).unwrap().unwrap();
/// let sanitized = sanitize::sanitize(candidate).unwrap();
/// let canonical = canonicalize::canonicalize(sanitized, 40).unwrap();
/// assert!(canonical.as_path().is_absolute());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalPath {
    path: PathBuf,
    hops: Vec<SymlinkHop>,
    exists: bool,
}

impl CanonicalPath {
    /// Build a canonical path, checking the structural invariants.
    ///
    /// # Errors
    ///
    /// Returns `PathNotResolvable` if the path is relative or contains `.` or
    /// `..` components.
    pub(crate) fn new(path: PathBuf, hops: Vec<SymlinkHop>, exists: bool) -> Result<Self> {
        if !path.is_absolute() {
            return Err(Error::PathNotResolvable {
                path,
                reason: "resolved path is not absolute".to_string(),
            });
        }
        if path
            .components()
            .any(|c| matches!(c, Component::CurDir | Component::ParentDir))
        {
            return Err(Error::PathNotResolvable {
                path,
                reason: "resolved path still contains relative components".to_string(),
            });
        }
        Ok(Self { path, hops, exists })
    }

    /// Get a reference to the resolved path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Symlinks followed while resolving, in order.
    #[must_use]
    pub fn hops(&self) -> &[SymlinkHop] {
        &self.hops
    }

    /// Whether the final component exists on disk.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Convert into the underlying `PathBuf`.
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.path
    }
}
