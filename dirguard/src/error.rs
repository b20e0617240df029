//! Error types for the dirguard library.
//!
//! This module provides the error taxonomy for directory resolution, using
//! `thiserror` for ergonomic error handling. Most members describe a hostile
//! or broken hint and are recovered by the resolver; only
//! [`Error::FallbackUnavailable`] is fatal to a resolution.

use std::path::PathBuf;

use thiserror::Error;

use crate::fallback::DirKind;

/// Result type alias for operations that may fail with a dirguard error.
///
/// # Examples
///
/// ```
/// use dirguard::{Error, Result};
///
/// fn example_operation() -> Result<&'static str> {
///     Ok("/home/user/.config")
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the dirguard library.
#[derive(Debug, Error)]
pub enum Error {
    /// A hint could not be parsed into a path candidate.
    #[error("malformed hint in {source_var}: {reason}")]
    MalformedHint {
        /// The environment variable the hint came from.
        source_var: String,
        /// Why the hint was rejected.
        reason: String,
    },

    /// A path segment looks like an attempt to escape its directory.
    #[error("traversal attempt at segment {index} ('{segment}'): {reason}")]
    TraversalAttempt {
        /// Zero-based index of the offending segment.
        index: usize,
        /// The offending segment, escaped for display.
        segment: String,
        /// What the sanitizer matched.
        reason: String,
    },

    /// A path could not be resolved against the filesystem.
    #[error("path not resolvable {}: {reason}", path.display())]
    PathNotResolvable {
        /// The path (or portion of it) that failed to resolve.
        path: PathBuf,
        /// The reason resolution failed.
        reason: String,
    },

    /// A resolved path lies outside every allowed root.
    #[error("{reason}")]
    RejectedOutsideAllowlist {
        /// The canonical path that was rejected.
        path: PathBuf,
        /// Why no root contains it.
        reason: String,
    },

    /// Even the platform default directory could not be established.
    #[error("fallback {kind} directory unavailable: {reason}")]
    FallbackUnavailable {
        /// The directory kind being resolved.
        kind: DirKind,
        /// Why the default could not be determined.
        reason: String,
    },

    /// A single path component (application name, filename) is unsafe.
    #[error("invalid name '{name}': {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// The reason the name is invalid.
        reason: String,
    },

    /// A symlink loop was detected.
    #[error("symlink loop detected: {}", path.display())]
    SymlinkLoop {
        /// The path where the loop was detected.
        path: PathBuf,
    },

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },
}

impl Error {
    /// Check if the resolver recovers from this error by falling back.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirguard::{DirKind, Error};
    /// use std::path::PathBuf;
    ///
    /// let err = Error::RejectedOutsideAllowlist {
    ///     path: PathBuf::from("/etc"),
    ///     reason: "/etc is outside every allowed root".to_string(),
    /// };
    /// assert!(err.is_recoverable());
    ///
    /// let err = Error::FallbackUnavailable {
    ///     kind: DirKind::Config,
    ///     reason: "no home directory".to_string(),
    /// };
    /// assert!(!err.is_recoverable());
    /// ```
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MalformedHint { .. }
                | Self::TraversalAttempt { .. }
                | Self::PathNotResolvable { .. }
                | Self::RejectedOutsideAllowlist { .. }
                | Self::SymlinkLoop { .. }
        )
    }

    /// Check if error indicates a traversal attempt.
    #[must_use]
    pub fn is_traversal(&self) -> bool {
        matches!(self, Self::TraversalAttempt { .. })
    }
}
