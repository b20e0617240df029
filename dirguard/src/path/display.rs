//! Shortening paths for human-readable output.

use std::path::Path;

/// Display a path in the most concise unambiguous form.
///
/// In order of preference:
/// 1. Relative to the git root, if the path is inside it
/// 2. Relative to the home directory as `~/...`
/// 3. The absolute path
///
/// # Examples
///
/// ```
/// use dirguard::path::display::shorten_for_display;
/// use std::path::Path;
///
/// let home = Some(Path::new("/home/alice"));
///
/// let path = Path::new("/home/alice/project/src/main.rs");
/// let git_root = Some(Path::new("/home/alice/project"));
/// assert_eq!(shorten_for_display(path, git_root, home), "src/main.rs");
///
/// let path = Path::new("/home/alice/.config/app");
/// assert_eq!(shorten_for_display(path, None, home), "~/.config/app");
///
/// let path = Path::new("/usr/local/bin/tool");
/// assert_eq!(shorten_for_display(path, None, home), "/usr/local/bin/tool");
/// ```
#[must_use]
pub fn shorten_for_display(path: &Path, git_root: Option<&Path>, home: Option<&Path>) -> String {
    if let Some(root) = git_root {
        if let Ok(relative) = path.strip_prefix(root) {
            if !relative.as_os_str().is_empty() {
                return relative.display().to_string();
            }
        }
    }

    if let Some(home) = home {
        if let Ok(relative) = path.strip_prefix(home) {
            if relative.as_os_str().is_empty() {
                return "~".to_string();
            }
            return format!("~/{}", relative.display());
        }
    }

    path.display().to_string()
}
