//! Parsing raw hints into path candidates.
//!
//! Parsing is purely syntactic: nothing here touches the filesystem.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::path::types::{PathCandidate, RawHint};

/// Parse a raw hint into a path candidate.
///
/// Returns `Ok(None)` when the variable is unset or empty: no hint was
/// provided, which is not an error.
///
/// # Errors
///
/// Returns `MalformedHint` if the value:
/// - is not valid Unicode
/// - contains a null byte or other control character
/// - is not an absolute path
///
/// # Examples
///
/// ```
/// use dirguard::path::{hint, RawHint};
///
/// assert!(hint::parse(RawHint::absent("XDG_CONFIG_HOME")).unwrap().is_none());
/// assert!(hint::parse(RawHint::new("XDG_CONFIG_HOME", Some("".into()))).unwrap().is_none());
/// assert!(hint::parse(RawHint::new("XDG_CONFIG_HOME", Some("relative".into()))).is_err());
/// ```
pub fn parse(hint: RawHint) -> Result<Option<PathCandidate>> {
    let (source, value) = hint.into_parts();
    let Some(value) = value else {
        return Ok(None);
    };
    if value.is_empty() {
        return Ok(None);
    }

    let Some(text) = value.to_str() else {
        return Err(malformed(&source, "value is not valid Unicode"));
    };
    if text.contains('\0') {
        return Err(malformed(&source, "value contains a null byte"));
    }
    if text.chars().any(char::is_control) {
        return Err(malformed(&source, "value contains control characters"));
    }

    let path = Path::new(text);
    if !path.is_absolute() {
        return Err(malformed(
            &source,
            &format!("'{text}' is not an absolute path"),
        ));
    }

    let mut root = PathBuf::new();
    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => root.push(prefix.as_os_str()),
            Component::RootDir => root.push(component),
            Component::CurDir => {}
            Component::ParentDir => segments.push("..".to_string()),
            Component::Normal(segment) => {
                // The whole value is valid UTF-8, so every segment is too.
                segments.push(segment.to_string_lossy().into_owned());
            }
        }
    }

    Ok(Some(PathCandidate::new(
        source,
        text.to_string(),
        root,
        segments,
    )))
}

fn malformed(source: &str, reason: &str) -> Error {
    Error::MalformedHint {
        source_var: source.to_string(),
        reason: reason.to_string(),
    }
}
