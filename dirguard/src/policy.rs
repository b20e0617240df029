//! Containment policy: deciding whether a canonical path is acceptable.
//!
//! In [`TrustMode::Default`] a path must be one of the [`AllowedRoots`] or lie
//! beneath one. [`TrustMode::ExplicitOverride`] bypasses containment but the
//! verdict says so, so callers can tell a deliberately risky run apart.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::config::ResolverConfig;
use crate::diagnostics::Verdict;
use crate::fallback::{conventional_dir, DirKind, SystemFacts};
use crate::path::canonicalize::canonicalize_trusted;
use crate::path::{CanonicalPath, PathRelationship};

/// Trust level of one resolution run.
///
/// Set from a toggle that is separate from the path hint; a hint alone can
/// never select [`TrustMode::ExplicitOverride`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustMode {
    /// Containment is enforced.
    #[default]
    Default,
    /// Containment is bypassed; accepted paths are marked unvalidated.
    ExplicitOverride,
}

impl fmt::Display for TrustMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::ExplicitOverride => write!(f, "explicit-override"),
        }
    }
}

/// A base directory considered safe by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllowedRoot {
    label: String,
    path: PathBuf,
}

impl AllowedRoot {
    /// What the root stands for (`home`, `tmp`, `config-default`, ...).
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The canonical root directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Ordered set of canonical allowed roots.
///
/// Built once at startup and then only read; pass it by reference into each
/// resolution.
///
/// # Examples
///
/// ```no_run
/// use dirguard::{AllowedRoots, ResolverConfig, SystemFacts};
///
/// let facts = SystemFacts::discover();
/// let roots = AllowedRoots::discover(&facts, &ResolverConfig::default());
/// for root in roots.iter() {
///     println!("{}: {}", root.label(), root.path().display());
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AllowedRoots {
    roots: Vec<AllowedRoot>,
}

impl AllowedRoots {
    /// Build the default root set from system facts and configuration.
    ///
    /// Includes the home directory, the platform default directory of every
    /// kind, `/tmp` and `/var/tmp` on Unix (unless disabled), and configured
    /// extra roots. Roots that do not exist are skipped.
    #[must_use]
    pub fn discover(facts: &SystemFacts, config: &ResolverConfig) -> Self {
        let mut candidates: Vec<(String, PathBuf)> = Vec::new();

        if let Some(home) = facts.home() {
            candidates.push(("home".to_string(), home.to_path_buf()));
        }
        for kind in DirKind::ALL {
            if let Ok(dir) = conventional_dir(kind, facts) {
                candidates.push((format!("{kind}-default"), dir));
            }
        }
        if cfg!(unix) && config.include_temp_roots {
            candidates.push(("tmp".to_string(), PathBuf::from("/tmp")));
            candidates.push(("var-tmp".to_string(), PathBuf::from("/var/tmp")));
        }
        for extra in &config.extra_roots {
            candidates.push(("configured".to_string(), extra.clone()));
        }

        Self::from_paths(candidates)
    }

    /// Build a root set from labelled paths, canonicalizing each one.
    ///
    /// Paths that cannot be canonicalized are skipped; duplicates (after
    /// canonicalization) keep their first label. A path that canonicalizes to
    /// a filesystem root (`/`, `C:\`) is refused with a warning, whatever it
    /// was spelled as: `/tmp/..` or a symlink to `/` never widens the set to
    /// the whole filesystem.
    #[must_use]
    pub fn from_paths<L, P>(paths: impl IntoIterator<Item = (L, P)>) -> Self
    where
        L: Into<String>,
        P: AsRef<Path>,
    {
        let mut roots: Vec<AllowedRoot> = Vec::new();
        for (label, path) in paths {
            let path = path.as_ref();
            match canonicalize_trusted(path) {
                Ok(canonical) if canonical.parent().is_none() => log::warn!(
                    "Refusing allowed root {}: it resolves to the filesystem root {}",
                    path.display(),
                    canonical.display()
                ),
                Ok(canonical) => {
                    if roots.iter().all(|r| r.path != canonical) {
                        roots.push(AllowedRoot {
                            label: label.into(),
                            path: canonical,
                        });
                    }
                }
                Err(e) => log::debug!("Skipping allowed root {}: {e}", path.display()),
            }
        }
        Self { roots }
    }

    /// Iterate over the roots in order.
    pub fn iter(&self) -> impl Iterator<Item = &AllowedRoot> {
        self.roots.iter()
    }

    /// Number of roots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Whether there are no roots (everything is rejected by default).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// The first root that contains `path`.
    #[must_use]
    pub fn find_container(&self, path: &Path) -> Option<&AllowedRoot> {
        self.roots
            .iter()
            .find(|root| PathRelationship::between(&root.path, path).permits_containment())
    }
}

/// Result of the containment decision, with its reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyVerdict {
    /// The path is an allowed root or lies beneath one.
    Accepted {
        /// The containing root.
        root: PathBuf,
        /// Why the path was accepted.
        reason: String,
    },
    /// The path still carries an escape sequence.
    RejectedTraversal {
        /// Why the path was rejected.
        reason: String,
    },
    /// The path lies outside every allowed root.
    RejectedOutsideAllowlist {
        /// Why the path was rejected.
        reason: String,
    },
    /// Containment was skipped at the caller's explicit request.
    AcceptedUnsafeOverride {
        /// Why the path was accepted without validation.
        reason: String,
    },
}

impl PolicyVerdict {
    /// The reason string for logging.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::Accepted { reason, .. }
            | Self::RejectedTraversal { reason }
            | Self::RejectedOutsideAllowlist { reason }
            | Self::AcceptedUnsafeOverride { reason } => reason,
        }
    }

    /// Whether the path may be used.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(
            self,
            Self::Accepted { .. } | Self::AcceptedUnsafeOverride { .. }
        )
    }

    /// The diagnostic category of this verdict.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        match self {
            Self::Accepted { .. } => Verdict::Accepted,
            Self::RejectedTraversal { .. } => Verdict::TraversalAttempt,
            Self::RejectedOutsideAllowlist { .. } => Verdict::RejectedOutsideAllowlist,
            Self::AcceptedUnsafeOverride { .. } => Verdict::AcceptedUnsafeOverride,
        }
    }
}

/// Decide whether `path` is acceptable under `mode`.
///
/// # Examples
///
/// ```no_run
/// use dirguard::policy::{evaluate, AllowedRoots, PolicyVerdict, TrustMode};
/// # fn demo(canonical: dirguard::path::CanonicalPath) {
/// let roots = AllowedRoots::from_paths([("tmp", "/tmp")]);
/// let verdict = evaluate(&canonical, TrustMode::Default, &roots);
/// if let PolicyVerdict::RejectedOutsideAllowlist { reason } = &verdict {
///     eprintln!("{reason}");
/// }
/// # }
/// ```
#[must_use]
pub fn evaluate(path: &CanonicalPath, mode: TrustMode, roots: &AllowedRoots) -> PolicyVerdict {
    let path = path.as_path();

    if let Some(index) = path
        .components()
        .position(|c| matches!(c, Component::CurDir | Component::ParentDir))
    {
        return PolicyVerdict::RejectedTraversal {
            reason: format!(
                "component {index} of {} is a relative reference",
                path.display()
            ),
        };
    }

    if mode == TrustMode::ExplicitOverride {
        return PolicyVerdict::AcceptedUnsafeOverride {
            reason: format!(
                "{} accepted without containment checks (explicit override); path is unvalidated",
                path.display()
            ),
        };
    }

    if let Some(reason) = forbidden_prefix(path) {
        return PolicyVerdict::RejectedOutsideAllowlist {
            reason: format!("{}: {reason}", path.display()),
        };
    }

    match roots.find_container(path) {
        Some(root) => PolicyVerdict::Accepted {
            root: root.path.clone(),
            reason: format!(
                "{} is within allowed root {} ({})",
                path.display(),
                root.path.display(),
                root.label
            ),
        },
        None => PolicyVerdict::RejectedOutsideAllowlist {
            reason: format!("{} is outside every allowed root", path.display()),
        },
    }
}

/// UNC shares and device namespaces are never acceptable by default.
fn forbidden_prefix(path: &Path) -> Option<&'static str> {
    #[cfg(windows)]
    {
        use std::path::Prefix;

        if let Some(Component::Prefix(prefix)) = path.components().next() {
            return match prefix.kind() {
                Prefix::UNC(..) | Prefix::VerbatimUNC(..) => Some("UNC paths are not allowed"),
                Prefix::DeviceNS(..) | Prefix::Verbatim(..) => {
                    Some("device paths are not allowed")
                }
                Prefix::Disk(..) | Prefix::VerbatimDisk(..) => None,
            };
        }
    }
    #[cfg(not(windows))]
    let _ = path;
    None
}
