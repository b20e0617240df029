//! Component-wise containment between a root and a candidate path.
//!
//! Paths are compared as sequences of components, never as strings:
//! `/home/user2` is not inside `/home/user`, and a trailing separator does
//! not change the answer. On Windows components are compared
//! case-insensitively, matching the filesystem.

use std::ffi::OsStr;
use std::path::{Component, Path};

/// How a root relates to a candidate path.
///
/// # Examples
///
/// ```
/// use dirguard::path::PathRelationship;
/// use std::path::Path;
///
/// let root = Path::new("/home/user");
///
/// let rel = PathRelationship::between(root, Path::new("/home/user/.config"));
/// assert_eq!(rel, PathRelationship::Ancestor);
///
/// let rel = PathRelationship::between(root, Path::new("/home"));
/// assert_eq!(rel, PathRelationship::Descendant);
///
/// let rel = PathRelationship::between(root, Path::new("/home/user/"));
/// assert_eq!(rel, PathRelationship::Same);
///
/// let rel = PathRelationship::between(root, Path::new("/home/user2"));
/// assert_eq!(rel, PathRelationship::Unrelated);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathRelationship {
    /// The root lies above the candidate.
    Ancestor,
    /// The root lies below the candidate.
    Descendant,
    /// Both name the same location.
    Same,
    /// The paths diverge.
    Unrelated,
}

impl PathRelationship {
    /// Relationship of `root` to `candidate`.
    #[must_use]
    pub fn between(root: &Path, candidate: &Path) -> Self {
        let mut root_parts = root.components().filter(|c| !matches!(c, Component::CurDir));
        let mut candidate_parts = candidate
            .components()
            .filter(|c| !matches!(c, Component::CurDir));

        loop {
            match (root_parts.next(), candidate_parts.next()) {
                (None, None) => return Self::Same,
                (None, Some(_)) => return Self::Ancestor,
                (Some(_), None) => return Self::Descendant,
                (Some(a), Some(b)) if same_component(a, b) => {}
                (Some(_), Some(_)) => return Self::Unrelated,
            }
        }
    }

    /// Whether a root in this relationship contains the candidate.
    ///
    /// Only `Same` and `Ancestor` qualify: a candidate that is a prefix of
    /// the root (`/` against `/home/user`) is never contained.
    #[must_use]
    pub fn permits_containment(self) -> bool {
        matches!(self, Self::Ancestor | Self::Same)
    }

    /// Whether `path` equals or lies below `directory`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirguard::path::PathRelationship;
    /// use std::path::Path;
    ///
    /// let dir = Path::new("/home/user/.config/app");
    /// assert!(PathRelationship::is_within(&dir.join("settings.yaml"), dir));
    /// assert!(!PathRelationship::is_within(Path::new("/home/user"), dir));
    /// ```
    #[must_use]
    pub fn is_within(path: &Path, directory: &Path) -> bool {
        Self::between(directory, path).permits_containment()
    }
}

fn same_component(a: Component<'_>, b: Component<'_>) -> bool {
    if cfg!(windows) {
        fold_case(a.as_os_str()) == fold_case(b.as_os_str())
    } else {
        a == b
    }
}

fn fold_case(part: &OsStr) -> String {
    part.to_string_lossy().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(root: &str, candidate: &str) -> PathRelationship {
        PathRelationship::between(Path::new(root), Path::new(candidate))
    }

    #[test]
    fn test_filesystem_root_is_ancestor_of_everything() {
        assert_eq!(rel("/", "/home/user"), PathRelationship::Ancestor);
        assert_eq!(rel("/", "/"), PathRelationship::Same);
    }

    #[test]
    fn test_candidate_above_root_is_descendant() {
        assert_eq!(rel("/a/b/c/d", "/a/b"), PathRelationship::Descendant);
        assert!(!rel("/home/user", "/").permits_containment());
    }

    #[test]
    fn test_trailing_separator_and_curdir_are_ignored() {
        assert_eq!(rel("/a/", "/a"), PathRelationship::Same);
        assert_eq!(rel("/a", "/a/./b"), PathRelationship::Ancestor);
    }

    #[test]
    fn test_shared_string_prefix_is_unrelated() {
        assert_eq!(rel("/home/user", "/home/user2"), PathRelationship::Unrelated);
        assert_eq!(rel("/tmp", "/tmpfiles/x"), PathRelationship::Unrelated);
    }

    #[test]
    fn test_parent_component_is_not_collapsed() {
        // Lexical `..` is compared as a literal component; callers canonicalize first.
        assert_eq!(rel("/a", "/a/../etc"), PathRelationship::Ancestor);
        assert_eq!(rel("/a/b", "/a/../a/b"), PathRelationship::Unrelated);
    }

    #[test]
    fn test_is_within() {
        assert!(PathRelationship::is_within(Path::new("/a/b"), Path::new("/a")));
        assert!(PathRelationship::is_within(Path::new("/a"), Path::new("/a")));
        assert!(!PathRelationship::is_within(Path::new("/a"), Path::new("/a/b")));
        assert!(!PathRelationship::is_within(Path::new("/a"), Path::new("/b")));
    }

    #[cfg(windows)]
    #[test]
    fn test_windows_components_fold_case() {
        assert_eq!(
            rel(r"C:\Users\Alice", r"c:\users\alice\AppData"),
            PathRelationship::Ancestor
        );
    }
}
