//! Resolution against the real process environment.
//!
//! These tests mutate process-wide environment variables, so every test is
//! serialized with `serial_test`.

mod common;

use std::env;

use common::{Sandbox, OVERRIDE_VAR};
use dirguard::config::ProcessEnv;
use dirguard::diagnostics::MemorySink;
use dirguard::{DirKind, TrustMode, Verdict};
use serial_test::serial;

/// Sets variables for the duration of `f`, restoring previous values after.
fn with_vars<T>(vars: &[(&str, Option<&std::ffi::OsStr>)], f: impl FnOnce() -> T) -> T {
    let saved: Vec<_> = vars
        .iter()
        .map(|(name, _)| (name.to_string(), env::var_os(name)))
        .collect();

    for (name, value) in vars {
        match value {
            Some(v) => env::set_var(name, v),
            None => env::remove_var(name),
        }
    }

    let result = f();

    for (name, value) in saved {
        match value {
            Some(v) => env::set_var(&name, v),
            None => env::remove_var(&name),
        }
    }
    result
}

#[test]
#[serial]
fn process_env_hint_is_used() {
    let sandbox = Sandbox::new();
    let target = sandbox.mkdir("from-env");

    let resolution = with_vars(
        &[
            ("XDG_DATA_HOME", Some(target.as_os_str())),
            (OVERRIDE_VAR, None),
        ],
        || {
            sandbox
                .resolver()
                .resolve(DirKind::Data, &ProcessEnv, &MemorySink::new())
                .unwrap()
        },
    );

    assert_eq!(resolution.verdict, Verdict::Accepted);
    assert_eq!(resolution.source, "XDG_DATA_HOME");
}

#[test]
#[serial]
fn process_env_toggle_enables_override() {
    let sandbox = Sandbox::new();

    let resolution = with_vars(
        &[
            ("XDG_CONFIG_HOME", Some(sandbox.outside.path().as_os_str())),
            (OVERRIDE_VAR, Some("ON".as_ref())),
        ],
        || {
            sandbox
                .resolver()
                .resolve(DirKind::Config, &ProcessEnv, &MemorySink::new())
                .unwrap()
        },
    );

    assert_eq!(resolution.verdict, Verdict::AcceptedUnsafeOverride);
    assert_eq!(resolution.trust_mode, TrustMode::ExplicitOverride);
}

#[test]
#[serial]
fn process_env_false_toggle_keeps_default_mode() {
    let sandbox = Sandbox::new();

    let resolution = with_vars(
        &[
            ("XDG_CONFIG_HOME", Some(sandbox.outside.path().as_os_str())),
            (OVERRIDE_VAR, Some("0".as_ref())),
        ],
        || {
            sandbox
                .resolver()
                .resolve(DirKind::Config, &ProcessEnv, &MemorySink::new())
                .unwrap()
        },
    );

    assert_eq!(resolution.verdict, Verdict::RejectedOutsideAllowlist);
    assert_eq!(resolution.trust_mode, TrustMode::Default);
}

#[test]
#[serial]
fn process_env_unset_variables_fall_back() {
    let sandbox = Sandbox::new();

    let resolutions = with_vars(
        &[
            ("XDG_CONFIG_HOME", None),
            ("XDG_DATA_HOME", None),
            ("XDG_CACHE_HOME", None),
            (OVERRIDE_VAR, None),
        ],
        || {
            sandbox
                .resolver()
                .resolve_all(&ProcessEnv, &MemorySink::new())
                .unwrap()
        },
    );

    assert_eq!(resolutions.len(), 3);
    assert!(resolutions
        .iter()
        .all(|r| r.verdict == Verdict::NoHintProvided));
    assert!(resolutions[2].resolved_path.ends_with(".cache"));
}
