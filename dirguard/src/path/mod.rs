//! Path handling for untrusted directory hints.
//!
//! A hint moves through three stages, each consuming the previous value:
//!
//! 1. [`hint::parse`] turns a [`RawHint`] into a [`PathCandidate`] (purely
//!    syntactic; empty or unset hints yield `None`).
//! 2. [`sanitize::sanitize`] rejects `..` and its encoded or look-alike forms,
//!    producing a [`SanitizedCandidate`].
//! 3. [`canonicalize::canonicalize`] resolves symlinks against the filesystem,
//!    recording each hop, producing a [`CanonicalPath`].
//!
//! Containment against allowed roots is decided separately by
//! [`crate::policy`].
//!
//! # Examples
//!
//! ```no_run
//! use dirguard::path::{canonicalize, hint, sanitize, RawHint};
//!
//! let raw = RawHint::new("XDG_CONFIG_HOME", Some("/tmp/app-config".into()));
//! let candidate = hint::parse(raw).unwrap().expect("hint was set");
//! let sanitized = sanitize::sanitize(candidate).unwrap();
//! let canonical =
//!     canonicalize::canonicalize(sanitized, canonicalize::DEFAULT_MAX_SYMLINK_DEPTH).unwrap();
//! println!("{}", canonical.as_path().display());
//! ```

pub mod canonicalize;
pub mod display;
pub mod hint;
pub mod relationship;
pub mod sanitize;
mod types;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use relationship::PathRelationship;
pub use types::{CanonicalPath, PathCandidate, RawHint, SanitizedCandidate, SymlinkHop};
