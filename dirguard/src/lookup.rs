//! Configuration file lookup.
//!
//! Files are searched in a git-local directory (`<workdir>/.<app>`) first,
//! then in the user directory. A file is only returned if its canonical
//! path stays inside the canonical search directory, so a symlink cannot
//! redirect a lookup elsewhere.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::path::canonicalize::canonicalize_trusted;
use crate::path::sanitize::validate_name;
use crate::path::PathRelationship;

/// Find the work tree of the git repository containing `start`.
///
/// Returns `None` outside a repository and for bare repositories.
///
/// # Examples
///
/// ```no_run
/// use dirguard::lookup::git_workdir;
/// use std::path::Path;
///
/// if let Some(root) = git_workdir(Path::new(".")) {
///     println!("repository root: {}", root.display());
/// }
/// ```
#[must_use]
pub fn git_workdir(start: &Path) -> Option<PathBuf> {
    let (repo_path, _trust) = gix::discover::upwards(start).ok()?;
    let (git_dir, work_tree) = repo_path.into_repository_and_work_tree_directories();
    let work_tree = work_tree?;
    log::debug!(
        "Discovered git repository {} with work tree {}",
        git_dir.display(),
        work_tree.display()
    );
    canonicalize_trusted(&work_tree).ok()
}

/// The git-local configuration directory `<workdir>/.<app_name>`.
///
/// The directory need not exist.
///
/// # Errors
///
/// Returns `InvalidName` if `app_name` is not a safe single component.
pub fn local_config_dir(start: &Path, app_name: &str) -> Result<Option<PathBuf>> {
    validate_name(app_name)?;
    Ok(git_workdir(start).map(|root| root.join(format!(".{app_name}"))))
}

/// Resolve `filename` inside `base/subdir`.
///
/// Returns the canonical file path only if the file exists and its
/// canonical form stays within the canonical `base/subdir`. An empty
/// `subdir` searches `base` itself.
///
/// # Examples
///
/// ```no_run
/// use dirguard::lookup::resolve_in_dir;
/// use std::path::Path;
///
/// let found = resolve_in_dir(Path::new("/home/alice/.config/myapp"), "toolset", "core.json");
/// ```
#[must_use]
pub fn resolve_in_dir(base: &Path, subdir: &str, filename: &str) -> Option<PathBuf> {
    let search_dir = if subdir.is_empty() {
        base.to_path_buf()
    } else {
        base.join(subdir)
    };

    let canonical_file = canonicalize_trusted(&search_dir.join(filename)).ok()?;
    let canonical_dir = canonicalize_trusted(&search_dir).ok()?;

    if !PathRelationship::is_within(&canonical_file, &canonical_dir) {
        log::warn!(
            "Ignoring {}: resolves to {} outside {}",
            search_dir.join(filename).display(),
            canonical_file.display(),
            canonical_dir.display()
        );
        return None;
    }

    canonical_file.is_file().then_some(canonical_file)
}

/// Resolve a configuration file with local-over-user precedence.
///
/// Searches `local/subdir/filename` (when a local directory is given), then
/// `user/subdir/filename`.
///
/// # Errors
///
/// Returns `InvalidName` for an unsafe `filename` or `subdir`, and
/// `NotFound` listing every searched path if no candidate qualifies.
///
/// # Examples
///
/// ```no_run
/// use dirguard::lookup::resolve_config_file;
/// use std::path::Path;
///
/// let path = resolve_config_file(
///     "settings.toml",
///     "",
///     Some(Path::new("/work/repo/.myapp")),
///     Path::new("/home/alice/.config/myapp"),
/// )
/// .unwrap();
/// ```
pub fn resolve_config_file(
    filename: &str,
    subdir: &str,
    local: Option<&Path>,
    user: &Path,
) -> Result<PathBuf> {
    validate_name(filename)?;
    if !subdir.is_empty() {
        validate_name(subdir)?;
    }

    let mut searched = Vec::new();
    for base in local.into_iter().chain(std::iter::once(user)) {
        let display = if subdir.is_empty() {
            base.join(filename)
        } else {
            base.join(subdir).join(filename)
        };
        searched.push(display.display().to_string());

        if let Some(path) = resolve_in_dir(base, subdir, filename) {
            return Ok(path);
        }
    }

    Err(Error::NotFound {
        resource: format!("'{filename}' (searched: {})", searched.join(", ")),
    })
}
