//! Property-based tests for hint parsing, sanitizing and containment.

use super::hint::parse;
use super::relationship::PathRelationship;
use super::sanitize::{inspect_segment, sanitize, validate_name};
use super::RawHint;
use proptest::prelude::*;
use std::path::PathBuf;

// Strategy for generating path-like strings
fn path_component_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,20}"
}

fn absolute_path_strategy() -> impl Strategy<Value = PathBuf> {
    prop::collection::vec(path_component_strategy(), 1..8).prop_map(|parts| {
        let mut path = PathBuf::from("/");
        for part in parts {
            path.push(part);
        }
        path
    })
}

// Spellings of a parent reference that must never pass the sanitizer.
fn escape_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "..",
        "...",
        "%2e%2e",
        "%2E%2E",
        "%252e%252e",
        ".%2e",
        "\u{FF0E}\u{FF0E}",
        "\u{2024}\u{2024}",
        "\u{FE52}\u{FE52}",
        "..\\",
        "a\\..\\b",
        "%2f",
        "%5c",
    ])
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        max_shrink_iters: 2000,
        .. ProptestConfig::default()
    })]

    // Plain alphanumeric paths always parse and sanitize
    #[test]
    #[cfg(unix)]
    fn plain_paths_pass(path in absolute_path_strategy()) {
        let hint = RawHint::new("XDG_CONFIG_HOME", Some(path.clone().into_os_string()));
        let candidate = parse(hint).unwrap().unwrap();
        prop_assert_eq!(candidate.to_path_buf(), path);
        prop_assert!(sanitize(candidate).is_ok());
    }

    // An escape anywhere in the path is rejected at that segment
    #[test]
    #[cfg(unix)]
    fn escapes_are_rejected(
        prefix in prop::collection::vec(path_component_strategy(), 0..4),
        escape in escape_strategy(),
        suffix in prop::collection::vec(path_component_strategy(), 0..4),
    ) {
        let mut raw = String::from("/");
        raw.push_str(&prefix.join("/"));
        if !prefix.is_empty() {
            raw.push('/');
        }
        raw.push_str(escape);
        if !suffix.is_empty() {
            raw.push('/');
            raw.push_str(&suffix.join("/"));
        }

        let hint = RawHint::new("XDG_DATA_HOME", Some(raw.clone().into()));
        let result = parse(hint).and_then(|c| match c {
            Some(candidate) => sanitize(candidate).map(|_| ()),
            None => Ok(()),
        });
        prop_assert!(result.is_err(), "accepted {}", raw);
    }

    // Segments the sanitizer flags are never valid names
    #[test]
    fn flagged_segments_are_invalid_names(segment in "[a-z.%/\\\\]{1,8}") {
        if inspect_segment(&segment).is_some() {
            prop_assert!(validate_name(&segment).is_err());
        }
    }

    // Path relationship is reflexive: path is always identical to itself
    #[test]
    fn path_relationship_reflexive(path in absolute_path_strategy()) {
        let rel = PathRelationship::between(&path, &path);
        prop_assert_eq!(rel, PathRelationship::Same);
    }

    // Containment is transitive (if A contains B and B contains C, then A contains C)
    #[test]
    fn path_containment_transitive(base in absolute_path_strategy(), parts1 in 1..5usize, parts2 in 1..5usize) {
        let mut path_b = base.clone();
        for i in 0..parts1 {
            path_b.push(format!("sub{i}"));
        }

        let mut path_c = path_b.clone();
        for i in 0..parts2 {
            path_c.push(format!("deep{i}"));
        }

        prop_assert!(PathRelationship::is_within(&path_b, &base));
        prop_assert!(PathRelationship::is_within(&path_c, &path_b));
        prop_assert!(PathRelationship::is_within(&path_c, &base));
    }

    // A sibling sharing a string prefix is never contained
    #[test]
    fn shared_prefix_sibling_not_contained(base in absolute_path_strategy(), suffix in "[a-z0-9]{1,5}") {
        let sibling = PathBuf::from(format!("{}{suffix}", base.display()));
        prop_assert!(!PathRelationship::is_within(&sibling, &base));
    }

    // A strict ancestor of a root is never contained by it
    #[test]
    fn ancestor_not_contained(path in absolute_path_strategy()) {
        if let Some(parent) = path.parent() {
            prop_assert!(!PathRelationship::is_within(parent, &path));
        }
    }
}
