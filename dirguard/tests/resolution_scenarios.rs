//! End-to-end resolution scenarios.
//!
//! These tests drive the full pipeline (parse, sanitize, canonicalize,
//! policy, fallback) through `Resolver::resolve` with a fixed environment
//! and check both the verdict and the diagnostics emitted.

mod common;

use std::fs;
use std::path::PathBuf;

use common::{env_with_hint, Sandbox, OVERRIDE_VAR};
use dirguard::config::MapEnv;
use dirguard::diagnostics::MemorySink;
use dirguard::{
    AllowedRoots, DirKind, Platform, Resolver, ResolverConfig, Severity, SystemFacts, TrustMode,
    Verdict,
};

// =============================================================================
// Reference scenarios
// =============================================================================

#[test]
fn scenario_a_traversal_falls_back_to_default() {
    let sandbox = Sandbox::new();
    let env = MapEnv::new().with("XDG_CONFIG_HOME", "/tmp/../../etc");
    let sink = MemorySink::new();

    let resolution = sandbox
        .resolver()
        .resolve(DirKind::Config, &env, &sink)
        .unwrap();

    assert!(matches!(
        resolution.verdict,
        Verdict::TraversalAttempt | Verdict::RejectedOutsideAllowlist
    ));
    assert_eq!(resolution.resolved_path, sandbox.default_config_dir());

    let warnings = sink.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].severity, Severity::Warning);
    assert!(warnings[0].reason.contains("'..'"));
}

#[test]
#[cfg(unix)]
fn scenario_b_existing_dir_under_tmp_is_accepted() {
    let home = tempfile::tempdir().unwrap();
    let facts = SystemFacts::new(Some(home.path().to_path_buf()), Platform::Xdg);
    let config = ResolverConfig::default();
    let roots = AllowedRoots::discover(&facts, &config);
    let resolver = Resolver::new(config, facts, &roots);

    let target = tempfile::Builder::new()
        .prefix("test_dirguard_config")
        .tempdir_in("/tmp")
        .unwrap();
    let env = env_with_hint("XDG_CONFIG_HOME", target.path());

    let sink = MemorySink::new();
    let resolution = resolver.resolve(DirKind::Config, &env, &sink).unwrap();

    assert_eq!(resolution.verdict, Verdict::Accepted);
    assert_eq!(
        resolution.resolved_path,
        fs::canonicalize(target.path()).unwrap()
    );
    assert!(sink.warnings().is_empty());
}

#[test]
#[cfg(unix)]
fn scenario_c_override_accepts_etc_as_unvalidated() {
    let sandbox = Sandbox::new();
    let env = MapEnv::new()
        .with("XDG_CONFIG_HOME", "/etc")
        .with(OVERRIDE_VAR, "1");
    let sink = MemorySink::new();

    let resolution = sandbox
        .resolver()
        .resolve(DirKind::Config, &env, &sink)
        .unwrap();

    assert_eq!(resolution.verdict, Verdict::AcceptedUnsafeOverride);
    assert_eq!(resolution.resolved_path, fs::canonicalize("/etc").unwrap());
    assert!(resolution.unvalidated);
    assert_eq!(resolution.trust_mode, TrustMode::ExplicitOverride);

    let warnings = sink.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].severity, Severity::Unsafe);
    assert!(warnings[0].reason.contains("unvalidated"));
}

#[test]
#[cfg(unix)]
fn scenario_d_nonexistent_path_falls_back() {
    let sandbox = Sandbox::new();
    let env = MapEnv::new().with("XDG_CONFIG_HOME", "/nonexistent/path/that/does/not/exist");
    let sink = MemorySink::new();

    let resolution = sandbox
        .resolver()
        .resolve(DirKind::Config, &env, &sink)
        .unwrap();

    assert_eq!(resolution.verdict, Verdict::PathNotResolvable);
    assert_eq!(resolution.resolved_path, sandbox.default_config_dir());
    assert_eq!(sink.warnings().len(), 1);
}

#[test]
fn scenario_e_no_hint_is_silent_fallback() {
    let sandbox = Sandbox::new();
    let sink = MemorySink::new();

    let resolution = sandbox
        .resolver()
        .resolve(DirKind::Config, &MapEnv::new(), &sink)
        .unwrap();

    assert_eq!(resolution.verdict, Verdict::NoHintProvided);
    assert_eq!(resolution.resolved_path, sandbox.default_config_dir());
    assert!(resolution.raw_hint.is_none());
    assert!(sink.warnings().is_empty());
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn parent_segments_are_never_accepted_without_override() {
    let sandbox = Sandbox::new();
    let inside = sandbox.mkdir("a/b");
    let hints = [
        format!("{}/..", inside.display()),
        format!("{}/../b", inside.display()),
        format!("{}/%2e%2e", inside.display()),
        format!("{}/\u{FF0E}\u{FF0E}/b", inside.display()),
        format!("{}/...", inside.display()),
    ];

    for hint in hints {
        let env = MapEnv::new().with("XDG_DATA_HOME", hint.as_str());
        let resolution = sandbox
            .resolver()
            .resolve(DirKind::Data, &env, &MemorySink::new())
            .unwrap();
        assert!(
            matches!(
                resolution.verdict,
                Verdict::TraversalAttempt | Verdict::RejectedOutsideAllowlist
            ),
            "{hint} gave {:?}",
            resolution.verdict
        );
    }
}

#[test]
fn malformed_hint_warning_names_the_escaped_value() {
    let sandbox = Sandbox::new();
    let env = MapEnv::new().with("XDG_CONFIG_HOME", "/tmp/evil\x07dir");
    let sink = MemorySink::new();

    let resolution = sandbox
        .resolver()
        .resolve(DirKind::Config, &env, &sink)
        .unwrap();
    assert_eq!(resolution.verdict, Verdict::MalformedHint);
    assert_eq!(resolution.resolved_path, sandbox.default_config_dir());

    let warnings = sink.warnings();
    assert_eq!(warnings.len(), 1);
    let line = warnings[0].to_string();
    assert!(line.contains("XDG_CONFIG_HOME"), "{line}");
    assert!(line.contains("/tmp/evil\\u{7}dir"), "{line}");
    assert!(!line.contains('\x07'));
}

#[test]
fn outside_paths_always_resolve_to_fallback() {
    let sandbox = Sandbox::new();
    let nested = sandbox.outside.path().join("nested");
    fs::create_dir(&nested).unwrap();

    for hint in [sandbox.outside.path().to_path_buf(), nested] {
        let env = env_with_hint("XDG_CACHE_HOME", &hint);
        let resolution = sandbox
            .resolver()
            .resolve(DirKind::Cache, &env, &MemorySink::new())
            .unwrap();
        assert_eq!(resolution.verdict, Verdict::RejectedOutsideAllowlist);
        assert_eq!(
            resolution.resolved_path,
            sandbox.home_path().join(".cache")
        );
    }
}

#[test]
fn resolving_twice_gives_the_same_answer() {
    let sandbox = Sandbox::new();
    let resolver = sandbox.resolver();
    let envs = [
        MapEnv::new(),
        env_with_hint("XDG_CONFIG_HOME", sandbox.mkdir("cfg")),
        env_with_hint("XDG_CONFIG_HOME", sandbox.outside.path()),
        MapEnv::new().with("XDG_CONFIG_HOME", "relative"),
    ];

    for env in &envs {
        let first = resolver
            .resolve(DirKind::Config, env, &MemorySink::new())
            .unwrap();
        let second = resolver
            .resolve(DirKind::Config, env, &MemorySink::new())
            .unwrap();
        assert_eq!(first.verdict, second.verdict);
        assert_eq!(first.resolved_path, second.resolved_path);
    }
}

#[test]
fn unsafe_hint_alone_never_enables_override() {
    let sandbox = Sandbox::new();
    let hints: [PathBuf; 2] = [sandbox.outside_path(), PathBuf::from("/")];

    for hint in hints {
        // Hint variables are not the toggle, whatever their value.
        let env = env_with_hint("XDG_CONFIG_HOME", &hint).with("XDG_DATA_HOME", "1");
        let resolution = sandbox
            .resolver()
            .resolve(DirKind::Config, &env, &MemorySink::new())
            .unwrap();
        assert_ne!(resolution.verdict, Verdict::AcceptedUnsafeOverride);
        assert_eq!(resolution.trust_mode, TrustMode::Default);
    }
}

#[test]
fn renamed_variables_are_honoured() {
    let sandbox = Sandbox::new();
    let config = dirguard::ResolverConfigBuilder::new()
        .hint_var(DirKind::Config, "MYAPP_CONFIG_DIR")
        .override_var("MYAPP_UNSAFE")
        .build()
        .unwrap();
    let resolver = sandbox.resolver_with(config);

    let env = env_with_hint("MYAPP_CONFIG_DIR", sandbox.outside.path())
        .with(OVERRIDE_VAR, "1");
    let resolution = resolver
        .resolve(DirKind::Config, &env, &MemorySink::new())
        .unwrap();
    assert_eq!(resolution.source, "MYAPP_CONFIG_DIR");
    assert_eq!(resolution.verdict, Verdict::RejectedOutsideAllowlist);

    let env = env.with("MYAPP_UNSAFE", "on");
    let resolution = resolver
        .resolve(DirKind::Config, &env, &MemorySink::new())
        .unwrap();
    assert_eq!(resolution.verdict, Verdict::AcceptedUnsafeOverride);
}

#[test]
fn kinds_resolve_independently_across_threads() {
    let sandbox = Sandbox::new();
    let resolver = sandbox.resolver();
    let env = env_with_hint("XDG_DATA_HOME", sandbox.mkdir("data"))
        .with("XDG_CACHE_HOME", sandbox.outside.path().as_os_str());

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = DirKind::ALL
            .into_iter()
            .map(|kind| {
                let resolver = &resolver;
                let env = &env;
                scope.spawn(move || resolver.resolve(kind, env, &MemorySink::new()).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results[0].verdict, Verdict::NoHintProvided);
    assert_eq!(results[1].verdict, Verdict::Accepted);
    assert_eq!(results[2].verdict, Verdict::RejectedOutsideAllowlist);
}
