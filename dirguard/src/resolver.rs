//! Resolution orchestration.
//!
//! The [`Resolver`] drives one hint through the stages
//! `Start → Parsed → Sanitized → Canonicalized → Decided → Resolved`,
//! reporting each transition to a [`DiagnosticSink`]. Any failure jumps to
//! `Decided` with a rejection verdict and resolves to the platform default.
//! Only [`Error::FallbackUnavailable`] reaches the caller.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::environment::read_toggle;
use crate::config::{EnvSource, ResolverConfig};
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink, Severity, Stage, Verdict};
use crate::error::{Error, Result};
use crate::fallback::{default_dir, DirKind, SystemFacts};
use crate::path::canonicalize::canonicalize;
use crate::path::sanitize::{sanitize, validate_name};
use crate::path::{hint, CanonicalPath, RawHint, SymlinkHop};
use crate::policy::{evaluate, AllowedRoots, PolicyVerdict, TrustMode};

/// The trust mode read from the environment, with any warning to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustSelection {
    /// The selected mode.
    pub mode: TrustMode,
    /// Why the toggle was ignored, if it was.
    pub warning: Option<String>,
}

impl TrustMode {
    /// Read the override toggle named by `config.override_var`.
    ///
    /// The toggle only takes effect if `config.permit_override` is set.
    /// Unrecognised values are treated as unset. In both cases the returned
    /// selection carries a warning.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirguard::config::{MapEnv, ResolverConfig};
    /// use dirguard::TrustMode;
    ///
    /// let config = ResolverConfig::default();
    /// let env = MapEnv::new().with("DIRGUARD_ALLOW_CUSTOM_PATHS", "true");
    /// assert_eq!(TrustMode::from_env(&config, &env).mode, TrustMode::ExplicitOverride);
    ///
    /// let locked = ResolverConfig { permit_override: false, ..Default::default() };
    /// let selection = TrustMode::from_env(&locked, &env);
    /// assert_eq!(selection.mode, TrustMode::Default);
    /// assert!(selection.warning.is_some());
    /// ```
    #[must_use]
    pub fn from_env(config: &ResolverConfig, env: &dyn EnvSource) -> TrustSelection {
        let var = &config.override_var;
        match read_toggle(env, var) {
            Ok(false) => TrustSelection {
                mode: Self::Default,
                warning: None,
            },
            Ok(true) if config.permit_override => TrustSelection {
                mode: Self::ExplicitOverride,
                warning: None,
            },
            Ok(true) => TrustSelection {
                mode: Self::Default,
                warning: Some(format!(
                    "{var} is set but override mode is not permitted in this process; ignoring it"
                )),
            },
            Err(e) => TrustSelection {
                mode: Self::Default,
                warning: Some(format!("{e}; treating {var} as unset")),
            },
        }
    }
}

/// The outcome of resolving one directory kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// The kind that was resolved.
    pub kind: DirKind,
    /// The hint variable consulted.
    pub source: String,
    /// The raw hint, escaped for display, if the variable was set.
    pub raw_hint: Option<String>,
    /// The verdict on the hint.
    pub verdict: Verdict,
    /// Why the verdict was reached.
    pub reason: String,
    /// The directory to use.
    pub resolved_path: PathBuf,
    /// Whether `resolved_path` skipped containment checks.
    pub unvalidated: bool,
    /// Whether `resolved_path` already exists.
    pub exists: bool,
    /// Symlinks followed while resolving the hint.
    pub hops: Vec<SymlinkHop>,
    /// The trust mode of the run.
    pub trust_mode: TrustMode,
}

impl Resolution {
    /// Whether the platform default was used instead of the hint.
    #[must_use]
    pub fn used_fallback(&self) -> bool {
        !self.verdict.is_accepted()
    }

    /// The per-application directory beneath the resolved path.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` if `app_name` is not a safe single component.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirguard::config::ProcessEnv;
    /// use dirguard::diagnostics::LogSink;
    /// use dirguard::{AllowedRoots, DirKind, Resolver, ResolverConfig, SystemFacts};
    ///
    /// let config = ResolverConfig::default();
    /// let facts = SystemFacts::discover();
    /// let roots = AllowedRoots::discover(&facts, &config);
    /// let resolver = Resolver::new(config, facts, &roots);
    ///
    /// let resolution = resolver.resolve(DirKind::Config, &ProcessEnv, &LogSink).unwrap();
    /// let app_dir = resolution.app_dir("myapp").unwrap();
    /// ```
    pub fn app_dir(&self, app_name: &str) -> Result<PathBuf> {
        validate_name(app_name)?;
        Ok(self.resolved_path.join(app_name))
    }
}

/// Outcome of validating a hint, before the final directory is chosen.
enum Outcome {
    Use {
        path: CanonicalPath,
        verdict: PolicyVerdict,
    },
    Fallback {
        verdict: Verdict,
        reason: String,
        path: Option<PathBuf>,
    },
}

/// Resolves directory kinds from untrusted hints.
///
/// The allowed roots are borrowed; build them once and share them between
/// resolvers and threads.
///
/// # Examples
///
/// ```no_run
/// use dirguard::config::ProcessEnv;
/// use dirguard::diagnostics::LogSink;
/// use dirguard::{AllowedRoots, Resolver, ResolverConfig, SystemFacts};
///
/// let config = ResolverConfig::default();
/// let facts = SystemFacts::discover();
/// let roots = AllowedRoots::discover(&facts, &config);
/// let resolver = Resolver::new(config, facts, &roots);
///
/// for resolution in resolver.resolve_all(&ProcessEnv, &LogSink).unwrap() {
///     println!("{}: {}", resolution.kind, resolution.resolved_path.display());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Resolver<'r> {
    config: ResolverConfig,
    facts: SystemFacts,
    roots: &'r AllowedRoots,
}

impl<'r> Resolver<'r> {
    /// Create a resolver.
    #[must_use]
    pub fn new(config: ResolverConfig, facts: SystemFacts, roots: &'r AllowedRoots) -> Self {
        Self {
            config,
            facts,
            roots,
        }
    }

    /// The resolver configuration.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The system facts the fallback is derived from.
    #[must_use]
    pub fn facts(&self) -> &SystemFacts {
        &self.facts
    }

    /// The allowed roots.
    #[must_use]
    pub fn roots(&self) -> &'r AllowedRoots {
        self.roots
    }

    /// Resolve `kind`, reading its hint and the override toggle from `env`.
    ///
    /// # Errors
    ///
    /// Returns `FallbackUnavailable` if the hint is not used and the platform
    /// default cannot be determined.
    pub fn resolve(
        &self,
        kind: DirKind,
        env: &dyn EnvSource,
        sink: &dyn DiagnosticSink,
    ) -> Result<Resolution> {
        let selection = TrustMode::from_env(&self.config, env);
        self.report_selection(kind, &selection, sink);
        self.resolve_from_env(kind, env, selection.mode, sink)
    }

    /// Resolve config, data and cache, in that order.
    ///
    /// The toggle is read once for all three.
    ///
    /// # Errors
    ///
    /// Stops at the first `FallbackUnavailable`.
    pub fn resolve_all(
        &self,
        env: &dyn EnvSource,
        sink: &dyn DiagnosticSink,
    ) -> Result<Vec<Resolution>> {
        self.resolve_kinds(&DirKind::ALL, env, sink)
    }

    /// Resolve each of `kinds` in order, reading the toggle once.
    ///
    /// A toggle warning is reported against the first kind only.
    ///
    /// # Errors
    ///
    /// Stops at the first `FallbackUnavailable`.
    pub fn resolve_kinds(
        &self,
        kinds: &[DirKind],
        env: &dyn EnvSource,
        sink: &dyn DiagnosticSink,
    ) -> Result<Vec<Resolution>> {
        let selection = TrustMode::from_env(&self.config, env);
        if let Some(&first) = kinds.first() {
            self.report_selection(first, &selection, sink);
        }
        kinds
            .iter()
            .map(|&kind| self.resolve_from_env(kind, env, selection.mode, sink))
            .collect()
    }

    /// Resolve `kind` from an explicit hint and trust mode.
    ///
    /// # Errors
    ///
    /// Returns `FallbackUnavailable` if the hint is not used and the platform
    /// default cannot be determined.
    pub fn resolve_hint(
        &self,
        kind: DirKind,
        hint: RawHint,
        mode: TrustMode,
        sink: &dyn DiagnosticSink,
    ) -> Result<Resolution> {
        let source = hint.source().to_string();
        let raw_hint = hint.display_value();

        sink.emit(&DiagnosticEvent::trace(
            kind,
            Stage::Start,
            format!(
                "reading {source} ({}; trust mode {mode})",
                if hint.is_present() { "set" } else { "unset" }
            ),
        ));

        match self.evaluate_hint(kind, hint, mode, sink) {
            Outcome::Use { path, verdict } => {
                let unvalidated = matches!(verdict, PolicyVerdict::AcceptedUnsafeOverride { .. });
                let severity = if unvalidated {
                    Severity::Unsafe
                } else {
                    Severity::Trace
                };
                sink.emit(
                    &DiagnosticEvent::trace(kind, Stage::Decided, verdict.reason())
                        .with_verdict(verdict.verdict())
                        .with_path(path.as_path())
                        .with_severity(severity),
                );
                sink.emit(
                    &DiagnosticEvent::trace(kind, Stage::Resolved, "using hinted directory")
                        .with_verdict(verdict.verdict())
                        .with_path(path.as_path()),
                );

                Ok(Resolution {
                    kind,
                    source,
                    raw_hint,
                    verdict: verdict.verdict(),
                    reason: verdict.reason().to_string(),
                    unvalidated,
                    exists: path.exists(),
                    hops: path.hops().to_vec(),
                    resolved_path: path.into_path_buf(),
                    trust_mode: mode,
                })
            }
            Outcome::Fallback {
                verdict,
                reason,
                path,
            } => {
                let severity = if verdict.is_rejection() {
                    Severity::Warning
                } else {
                    Severity::Trace
                };
                let mut decided = DiagnosticEvent::trace(kind, Stage::Decided, reason.clone())
                    .with_verdict(verdict)
                    .with_severity(severity);
                if let Some(path) = path {
                    decided = decided.with_path(path);
                }
                sink.emit(&decided);

                let fallback = default_dir(kind, &self.facts)?;
                sink.emit(
                    &DiagnosticEvent::trace(kind, Stage::Resolved, "using platform default")
                        .with_verdict(verdict)
                        .with_path(fallback.as_path()),
                );

                Ok(Resolution {
                    kind,
                    source,
                    raw_hint,
                    verdict,
                    reason,
                    unvalidated: false,
                    exists: fallback.exists(),
                    hops: Vec::new(),
                    resolved_path: fallback.into_path_buf(),
                    trust_mode: mode,
                })
            }
        }
    }

    fn resolve_from_env(
        &self,
        kind: DirKind,
        env: &dyn EnvSource,
        mode: TrustMode,
        sink: &dyn DiagnosticSink,
    ) -> Result<Resolution> {
        let var = self.config.hint_var(kind);
        let hint = RawHint::new(var, env.var_os(var));
        self.resolve_hint(kind, hint, mode, sink)
    }

    fn report_selection(
        &self,
        kind: DirKind,
        selection: &TrustSelection,
        sink: &dyn DiagnosticSink,
    ) {
        if let Some(warning) = &selection.warning {
            sink.emit(
                &DiagnosticEvent::trace(kind, Stage::Start, warning.clone())
                    .with_severity(Severity::Warning),
            );
        }
    }

    fn evaluate_hint(
        &self,
        kind: DirKind,
        hint: RawHint,
        mode: TrustMode,
        sink: &dyn DiagnosticSink,
    ) -> Outcome {
        let offered = hint.display_value().map(PathBuf::from);
        let candidate = match hint::parse(hint) {
            Ok(Some(candidate)) => candidate,
            Ok(None) => {
                return Outcome::Fallback {
                    verdict: Verdict::NoHintProvided,
                    reason: "hint variable is unset or empty".to_string(),
                    path: None,
                }
            }
            Err(e) => return Self::rejected(&e, offered),
        };
        let written = candidate.to_path_buf();
        sink.emit(
            &DiagnosticEvent::trace(
                kind,
                Stage::Parsed,
                format!("parsed {} segment(s)", candidate.segments().len()),
            )
            .with_path(&written),
        );

        let sanitized = match sanitize(candidate) {
            Ok(sanitized) => sanitized,
            Err(e) => return Self::rejected(&e, Some(written)),
        };
        sink.emit(
            &DiagnosticEvent::trace(kind, Stage::Sanitized, "no traversal sequences found")
                .with_path(&written),
        );

        let canonical = match canonicalize(sanitized, self.config.max_symlink_depth) {
            Ok(canonical) => canonical,
            Err(e) => return Self::rejected(&e, Some(written)),
        };
        sink.emit(
            &DiagnosticEvent::trace(
                kind,
                Stage::Canonicalized,
                format!("followed {} symlink(s)", canonical.hops().len()),
            )
            .with_path(canonical.as_path()),
        );

        match evaluate(&canonical, mode, self.roots) {
            PolicyVerdict::RejectedOutsideAllowlist { reason } => {
                let path = canonical.into_path_buf();
                let error = Error::RejectedOutsideAllowlist {
                    path: path.clone(),
                    reason,
                };
                Self::rejected(&error, Some(path))
            }
            verdict if verdict.is_accepted() => Outcome::Use {
                path: canonical,
                verdict,
            },
            verdict => Outcome::Fallback {
                verdict: verdict.verdict(),
                reason: verdict.reason().to_string(),
                path: Some(canonical.into_path_buf()),
            },
        }
    }

    fn rejected(error: &Error, path: Option<PathBuf>) -> Outcome {
        Outcome::Fallback {
            verdict: Verdict::from_error(error).unwrap_or(Verdict::PathNotResolvable),
            reason: error.to_string(),
            path,
        }
    }
}
