//! Path canonicalization functions.
//!
//! This module resolves paths against the real filesystem, with support for:
//! - Segment-by-segment resolution of untrusted candidates, recording every
//!   symlink that is followed
//! - Symlink loop detection through a depth limit
//! - Partial canonicalization for trusted paths that do not exist yet

use std::collections::VecDeque;
use std::ffi::OsString;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::path::sanitize;
use crate::path::types::{CanonicalPath, SanitizedCandidate, SymlinkHop};

/// Default maximum number of symlinks followed during one resolution.
pub const DEFAULT_MAX_SYMLINK_DEPTH: usize = 40;

/// Resolve a sanitized candidate against the filesystem.
///
/// Every segment is inspected with `symlink_metadata`; symlinks are read and
/// their targets spliced into the remaining segments, so each hop is recorded.
/// Symlink targets go through the same traversal checks as the hint itself.
///
/// The target must exist as a directory, or only its final component may be
/// missing and the parent must be a directory.
///
/// # Errors
///
/// Returns an error if:
/// - A symlink target contains an escape sequence (`TraversalAttempt`)
/// - More than `max_depth` symlinks are followed (`SymlinkLoop`)
/// - An intermediate component is missing, the result is not a directory,
///   or an I/O error such as permission denied occurs (`PathNotResolvable`)
///
/// # Examples
///
/// ```no_run
/// use dirguard::path::canonicalize::{canonicalize, DEFAULT_MAX_SYMLINK_DEPTH};
/// use dirguard::path::{hint, sanitize, RawHint};
///
/// let raw = RawHint::new("XDG_DATA_HOME", Some("/tmp/new-data".into()));
/// let sanitized = sanitize::sanitize(hint::parse(raw).unwrap().unwrap()).unwrap();
/// let canonical = canonicalize(sanitized, DEFAULT_MAX_SYMLINK_DEPTH).unwrap();
/// assert!(!canonical.exists());
/// ```
pub fn canonicalize(sanitized: SanitizedCandidate, max_depth: usize) -> Result<CanonicalPath> {
    let candidate = sanitized.into_candidate();
    let mut resolved = candidate.root().to_path_buf();
    let mut pending: VecDeque<OsString> =
        candidate.segments().iter().map(OsString::from).collect();
    let mut hops = Vec::new();
    let mut missing = None;

    while let Some(segment) = pending.pop_front() {
        let next = resolved.join(&segment);
        match fs::symlink_metadata(&next) {
            Ok(meta) if meta.file_type().is_symlink() => {
                if hops.len() >= max_depth {
                    return Err(Error::SymlinkLoop { path: next });
                }
                let target = fs::read_link(&next).map_err(|e| io_failure(&next, &e))?;
                check_symlink_target(&next, &target)?;

                if target.is_absolute() {
                    resolved = anchor_of(&target);
                }
                for component in target.components().rev() {
                    if let Component::Normal(part) = component {
                        pending.push_front(part.to_os_string());
                    }
                }
                hops.push(SymlinkHop { link: next, target });
            }
            Ok(_) => resolved = next,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if !pending.is_empty() {
                    return Err(Error::PathNotResolvable {
                        path: next,
                        reason: "parent directory does not exist".to_string(),
                    });
                }
                missing = Some(segment);
            }
            Err(e) => return Err(io_failure(&next, &e)),
        }
    }

    if !is_directory(&resolved)? {
        return Err(Error::PathNotResolvable {
            path: resolved,
            reason: if missing.is_some() {
                "parent is not a directory".to_string()
            } else {
                "not a directory".to_string()
            },
        });
    }

    let exists = missing.is_none();
    let path = match missing {
        Some(leaf) => resolved.join(leaf),
        None => resolved,
    };

    ensure_no_escape(&path)?;
    CanonicalPath::new(path, hops, exists)
}

/// Canonicalize a trusted path with the standard library.
///
/// Used for paths derived from system facts (home directory, temp roots),
/// never for hints.
///
/// # Errors
///
/// Returns `PathNotResolvable` if the path does not exist, permission is
/// denied, or another I/O error occurs.
///
/// # Examples
///
/// ```no_run
/// use dirguard::path::canonicalize::canonicalize_trusted;
/// use std::path::Path;
///
/// let canonical = canonicalize_trusted(Path::new("/tmp")).unwrap();
/// assert!(canonical.is_absolute());
/// ```
pub fn canonicalize_trusted(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path)
        .map(strip_verbatim_disk)
        .map_err(|e| io_failure(path, &e))
}

/// `fs::canonicalize` on Windows returns `\\?\C:\...`; the walker builds
/// plain `C:\...` paths, so both sides are compared in the plain form.
#[cfg(windows)]
fn strip_verbatim_disk(path: PathBuf) -> PathBuf {
    use std::path::{Component, Prefix};

    let mut components = path.components();
    if let Some(Component::Prefix(prefix)) = components.next() {
        if let Prefix::VerbatimDisk(letter) = prefix.kind() {
            let mut plain = PathBuf::from(format!("{}:\\", char::from(letter)));
            plain.extend(components.filter(|c| !matches!(c, Component::RootDir)));
            return plain;
        }
    }
    path
}

#[cfg(not(windows))]
fn strip_verbatim_disk(path: PathBuf) -> PathBuf {
    path
}

/// Canonicalize the existing portion of a trusted path.
///
/// For non-existent paths, this function finds the longest existing ancestor
/// and canonicalizes it, returning the non-existent components separately.
///
/// # Errors
///
/// Returns an error if:
/// - No existing ancestor can be found
/// - Canonicalization of the existing portion fails
///
/// # Examples
///
/// ```no_run
/// use dirguard::path::canonicalize::canonicalize_existing;
/// use std::path::{Path, PathBuf};
///
/// // For a path where /tmp exists but /tmp/nonexistent/file does not:
/// let (canonical, remainder) =
///     canonicalize_existing(Path::new("/tmp/nonexistent/file")).unwrap();
/// // canonical will be the canonicalized /tmp
/// // remainder will be Some(PathBuf::from("nonexistent/file"))
/// ```
pub fn canonicalize_existing(path: &Path) -> Result<(PathBuf, Option<PathBuf>)> {
    if let Ok(canonical) = canonicalize_trusted(path) {
        return Ok((canonical, None));
    }

    let mut current = path.to_path_buf();
    let mut non_existent = Vec::new();

    loop {
        if current.exists() {
            let canonical = canonicalize_trusted(&current)?;

            let remainder = if non_existent.is_empty() {
                None
            } else {
                non_existent.reverse();
                Some(non_existent.into_iter().collect())
            };

            return Ok((canonical, remainder));
        }

        match current.file_name() {
            Some(name) => {
                non_existent.push(name.to_os_string());
                current.pop();
            }
            None => {
                return Err(Error::PathNotResolvable {
                    path: path.to_path_buf(),
                    reason: "cannot find any existing portion of path".to_string(),
                });
            }
        }
    }
}

/// Reject symlink targets that reintroduce escape sequences.
fn check_symlink_target(link: &Path, target: &Path) -> Result<()> {
    let segments: Vec<String> = target
        .components()
        .filter_map(|component| match component {
            Component::ParentDir => Some("..".to_string()),
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    sanitize::check_segments(segments.iter().map(String::as_str)).map_err(|e| match e {
        Error::TraversalAttempt {
            index,
            segment,
            reason,
        } => Error::TraversalAttempt {
            index,
            segment,
            reason: format!(
                "symlink {} -> {}: {reason}",
                link.display(),
                target.display()
            ),
        },
        other => other,
    })
}

/// Re-check a resolved path for escape segments.
fn ensure_no_escape(path: &Path) -> Result<()> {
    let segments: Vec<String> = path
        .components()
        .filter_map(|component| match component {
            Component::CurDir => Some(".".to_string()),
            Component::ParentDir => Some("..".to_string()),
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if let Some(index) = segments.iter().position(|s| s == "." || s == "..") {
        return Err(Error::TraversalAttempt {
            index,
            segment: segments[index].clone(),
            reason: "relative component survived resolution".to_string(),
        });
    }
    sanitize::check_segments(segments.iter().map(String::as_str))
}

/// The prefix and root directory of an absolute path.
fn anchor_of(path: &Path) -> PathBuf {
    path.components()
        .take_while(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
        .collect()
}

fn is_directory(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.is_dir()),
        Err(e) => Err(io_failure(path, &e)),
    }
}

fn io_failure(path: &Path, e: &io::Error) -> Error {
    let reason = match e.kind() {
        ErrorKind::NotFound => "path does not exist".to_string(),
        ErrorKind::PermissionDenied => "permission denied".to_string(),
        _ => e.to_string(),
    };
    Error::PathNotResolvable {
        path: path.to_path_buf(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::types::RawHint;
    use crate::path::{hint, sanitize};
    use std::fs;
    use tempfile::tempdir;

    fn sanitized(path: &Path) -> SanitizedCandidate {
        let raw = RawHint::new("XDG_CONFIG_HOME", Some(path.as_os_str().to_os_string()));
        sanitize::sanitize(hint::parse(raw).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn test_canonicalize_existing_directory() {
        let dir = tempdir().unwrap();
        let canonical = canonicalize(sanitized(dir.path()), DEFAULT_MAX_SYMLINK_DEPTH).unwrap();
        assert_eq!(canonical.as_path(), fs::canonicalize(dir.path()).unwrap());
        assert!(canonical.exists());
    }

    #[test]
    fn test_canonicalize_missing_leaf_with_parent() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("not-yet");
        let canonical = canonicalize(sanitized(&target), DEFAULT_MAX_SYMLINK_DEPTH).unwrap();
        assert_eq!(
            canonical.as_path(),
            fs::canonicalize(dir.path()).unwrap().join("not-yet")
        );
        assert!(!canonical.exists());
    }

    #[test]
    fn test_canonicalize_missing_parent_fails() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("a").join("b");
        let err = canonicalize(sanitized(&target), DEFAULT_MAX_SYMLINK_DEPTH).unwrap_err();
        assert!(matches!(err, Error::PathNotResolvable { .. }));
    }

    #[test]
    fn test_canonicalize_file_is_not_a_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file");
        fs::write(&file, "x").unwrap();
        let err = canonicalize(sanitized(&file), DEFAULT_MAX_SYMLINK_DEPTH).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_canonicalize_existing_full_path_exists() {
        let dir = tempdir().unwrap();
        let (canonical, remainder) = canonicalize_existing(dir.path()).unwrap();
        assert_eq!(canonical, fs::canonicalize(dir.path()).unwrap());
        assert!(remainder.is_none());
    }

    #[test]
    fn test_canonicalize_existing_partial() {
        let dir = tempdir().unwrap();
        let full = dir.path().join("nonexistent").join("path");

        let (canonical, remainder) = canonicalize_existing(&full).unwrap();
        assert_eq!(canonical, fs::canonicalize(dir.path()).unwrap());
        assert_eq!(remainder, Some(PathBuf::from("nonexistent").join("path")));
    }

    #[test]
    fn test_canonicalize_trusted_nonexistent() {
        let result = canonicalize_trusted(Path::new("/nonexistent/path/xyz"));
        assert!(matches!(result, Err(Error::PathNotResolvable { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_canonicalize_records_symlink_hops() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let target = dir.path().join("target");
        let link = dir.path().join("link");
        fs::create_dir(&target).unwrap();
        symlink(&target, &link).unwrap();

        let canonical = canonicalize(sanitized(&link), DEFAULT_MAX_SYMLINK_DEPTH).unwrap();
        assert_eq!(canonical.as_path(), fs::canonicalize(&target).unwrap());
        assert!(canonical
            .hops()
            .iter()
            .any(|hop| hop.link.ends_with("link") && hop.target == target));
    }

    #[cfg(unix)]
    #[test]
    fn test_canonicalize_relative_symlink() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("real").join("inner")).unwrap();
        symlink("real/inner", dir.path().join("short")).unwrap();

        let canonical =
            canonicalize(sanitized(&dir.path().join("short")), DEFAULT_MAX_SYMLINK_DEPTH)
                .unwrap();
        assert_eq!(
            canonical.as_path(),
            fs::canonicalize(dir.path().join("real").join("inner")).unwrap()
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_canonicalize_rejects_parent_in_symlink_target() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("inner")).unwrap();
        symlink("../../..", dir.path().join("inner").join("escape")).unwrap();

        let err = canonicalize(
            sanitized(&dir.path().join("inner").join("escape")),
            DEFAULT_MAX_SYMLINK_DEPTH,
        )
        .unwrap_err();
        assert!(err.is_traversal());
        assert!(err.to_string().contains("symlink"));
    }

    #[cfg(unix)]
    #[test]
    fn test_canonicalize_dangling_symlink_leaf() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let target = dir.path().join("missing");
        let link = dir.path().join("dangling");
        symlink(&target, &link).unwrap();

        let canonical = canonicalize(sanitized(&link), DEFAULT_MAX_SYMLINK_DEPTH).unwrap();
        assert!(canonical.as_path().ends_with("missing"));
        assert!(!canonical.exists());
        assert!(canonical
            .hops()
            .last()
            .is_some_and(|hop| hop.link.ends_with("dangling")));
    }

    #[cfg(unix)]
    #[test]
    fn test_canonicalize_detects_loop() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let link1 = dir.path().join("link1");
        let link2 = dir.path().join("link2");
        symlink(&link2, &link1).unwrap();
        symlink(&link1, &link2).unwrap();

        let err = canonicalize(sanitized(&link1), DEFAULT_MAX_SYMLINK_DEPTH).unwrap_err();
        assert!(matches!(err, Error::SymlinkLoop { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_canonicalize_respects_max_depth() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let base = fs::canonicalize(dir.path()).unwrap();
        let mut current = base.join("target");
        fs::create_dir(&current).unwrap();

        for i in 0..5 {
            let link = base.join(format!("link{i}"));
            symlink(&current, &link).unwrap();
            current = link;
        }

        assert!(canonicalize(sanitized(&current), 10).is_ok());
        assert!(canonicalize(sanitized(&current), 2).is_err());
    }
}
