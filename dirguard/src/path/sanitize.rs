//! Static traversal checks on path segments.
//!
//! The sanitizer runs before any filesystem access. Canonicalization follows
//! symlinks an attacker may control, so escape sequences are rejected here on
//! syntax alone, including encoded and look-alike spellings of `..`.

use crate::error::{Error, Result};
use crate::path::types::{PathCandidate, SanitizedCandidate};

/// Rounds of percent-decoding applied when looking for hidden traversal.
const MAX_DECODE_ROUNDS: usize = 3;

/// Windows reserved device names that cannot be used as filenames.
const RESERVED_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Check every segment of a candidate for escape sequences.
///
/// # Errors
///
/// Returns `TraversalAttempt` with the index of the first offending segment.
///
/// # Examples
///
/// ```
/// use dirguard::path::{hint, sanitize, RawHint};
///
/// let ok = hint::parse(RawHint::new("XDG_CONFIG_HOME", Some("/tmp/config".into())))
///     .unwrap()
///     .unwrap();
/// assert!(sanitize::sanitize(ok).is_ok());
///
/// let bad = hint::parse(RawHint::new("XDG_CONFIG_HOME", Some("/tmp/%2e%2e/etc".into())))
///     .unwrap()
///     .unwrap();
/// assert!(sanitize::sanitize(bad).is_err());
/// ```
pub fn sanitize(candidate: PathCandidate) -> Result<SanitizedCandidate> {
    check_segments(candidate.segments().iter().map(String::as_str))?;
    Ok(SanitizedCandidate::new(candidate))
}

/// Check a sequence of segments, reporting the index of the first bad one.
///
/// # Errors
///
/// Returns `TraversalAttempt` for the first segment that fails
/// [`inspect_segment`].
pub fn check_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> Result<()> {
    for (index, segment) in segments.into_iter().enumerate() {
        if let Some(reason) = inspect_segment(segment) {
            return Err(Error::TraversalAttempt {
                index,
                segment: segment.escape_debug().to_string(),
                reason: reason.to_string(),
            });
        }
    }
    Ok(())
}

/// Inspect one segment, returning why it is unsafe (if it is).
///
/// # Examples
///
/// ```
/// use dirguard::path::sanitize::inspect_segment;
///
/// assert!(inspect_segment("config").is_none());
/// assert!(inspect_segment("..").is_some());
/// assert!(inspect_segment("%2E%2E").is_some());
/// assert!(inspect_segment("\u{FF0E}\u{FF0E}").is_some());
/// ```
#[must_use]
pub fn inspect_segment(segment: &str) -> Option<&'static str> {
    if segment == ".." {
        return Some("parent directory reference");
    }
    if is_dot_run(segment) {
        return Some("segment consists only of dots");
    }
    if has_parent_part(segment) {
        return Some("embedded parent directory reference");
    }

    let folded = fold_lookalikes(segment);
    if folded != segment && (has_parent_part(&folded) || is_dot_run(&folded)) {
        return Some("look-alike parent directory reference");
    }

    let mut decoded = folded;
    for _ in 0..MAX_DECODE_ROUNDS {
        let Some(next) = percent_decode(&decoded) else {
            break;
        };
        decoded = fold_lookalikes(&next);
        if decoded == "." || is_dot_run(&decoded) || has_parent_part(&decoded) {
            return Some("percent-encoded dot segment");
        }
        if decoded.contains(['/', '\\']) {
            return Some("percent-encoded path separator");
        }
    }

    if cfg!(windows) {
        if segment.contains(':') {
            return Some("alternate data stream or drive marker");
        }
        if is_reserved_device_name(segment) {
            return Some("reserved device name");
        }
    }

    None
}

/// Validate a single path component such as an application name or filename.
///
/// Rules:
/// 1. Not empty or whitespace-only
/// 2. No path separators (`/` or `\`)
/// 3. No parent directory references or encoded escapes
/// 4. No null bytes or control characters
/// 5. No leading `.` (hidden files)
/// 6. Not a Windows reserved device name
///
/// # Errors
///
/// Returns `InvalidName` describing the first rule that failed.
///
/// # Examples
///
/// ```
/// use dirguard::path::sanitize::validate_name;
///
/// assert!(validate_name("myapp").is_ok());
/// assert!(validate_name("settings.toml").is_ok());
/// assert!(validate_name("../etc/passwd").is_err());
/// assert!(validate_name(".hidden").is_err());
/// ```
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidName {
        name: name.escape_debug().to_string(),
        reason: reason.to_string(),
    };

    if name.trim().is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.contains(['/', '\\']) {
        return Err(invalid("name contains a path separator"));
    }
    if name.chars().any(char::is_control) {
        return Err(invalid("name contains control characters"));
    }
    if name.starts_with('.') {
        return Err(invalid("name starts with a dot"));
    }
    if let Some(reason) = inspect_segment(name) {
        return Err(invalid(reason));
    }
    if is_reserved_device_name(name) {
        return Err(invalid("reserved device name"));
    }
    Ok(())
}

fn is_dot_run(s: &str) -> bool {
    s.len() >= 2 && s.chars().all(|c| c == '.')
}

fn has_parent_part(s: &str) -> bool {
    s.contains(['/', '\\']) && s.split(['/', '\\']).any(|part| part == ".." || is_dot_run(part))
}

fn is_reserved_device_name(s: &str) -> bool {
    let stem = s.split('.').next().unwrap_or(s).trim_end();
    RESERVED_DEVICE_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(stem))
}

/// Map Unicode characters that render like `.`, `/` or `\` to their ASCII form.
fn fold_lookalikes(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{2024}' | '\u{FE52}' | '\u{FF0E}' | '\u{3002}' | '\u{FF61}' => '.',
            '\u{2215}' | '\u{2044}' | '\u{FF0F}' | '\u{29F8}' => '/',
            '\u{FF3C}' | '\u{29F5}' | '\u{29F9}' | '\u{FE68}' => '\\',
            other => other,
        })
        .collect::<String>()
        .replace('\u{2025}', "..")
}

/// Decode `%XX` escapes once; `None` if there was nothing to decode.
fn percent_decode(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut changed = false;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(value) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(value);
                changed = true;
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    changed.then(|| String::from_utf8_lossy(&out).into_owned())
}
