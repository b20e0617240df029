//! Structured events describing how a directory was resolved.
//!
//! The resolver reports every stage transition to a [`DiagnosticSink`].
//! Rejected hints produce one [`Severity::Warning`] event and accepted
//! overrides one [`Severity::Unsafe`] event; an absent hint produces neither.

use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::Serialize;

use crate::error::Error;
use crate::fallback::DirKind;

/// Outcome category of one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The hint passed every check and was used.
    Accepted,
    /// The hint was used without containment checks.
    AcceptedUnsafeOverride,
    /// The hint variable was unset or empty.
    NoHintProvided,
    /// The hint could not be parsed as an absolute path.
    MalformedHint,
    /// The hint (or a symlink it crossed) tried to escape its directory.
    TraversalAttempt,
    /// The hint could not be resolved on disk.
    PathNotResolvable,
    /// The hint resolved outside every allowed root.
    RejectedOutsideAllowlist,
}

impl Verdict {
    /// Whether the hinted path was used.
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted | Self::AcceptedUnsafeOverride)
    }

    /// Whether the hint was present but refused.
    #[must_use]
    pub const fn is_rejection(self) -> bool {
        !self.is_accepted() && !matches!(self, Self::NoHintProvided)
    }

    /// The category a recoverable error falls into.
    ///
    /// Returns `None` for errors the resolver does not recover from.
    #[must_use]
    pub fn from_error(error: &Error) -> Option<Self> {
        match error {
            Error::MalformedHint { .. } => Some(Self::MalformedHint),
            Error::TraversalAttempt { .. } => Some(Self::TraversalAttempt),
            Error::PathNotResolvable { .. } | Error::SymlinkLoop { .. } => {
                Some(Self::PathNotResolvable)
            }
            Error::RejectedOutsideAllowlist { .. } => Some(Self::RejectedOutsideAllowlist),
            _ => None,
        }
    }

    /// Stable snake_case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::AcceptedUnsafeOverride => "accepted_unsafe_override",
            Self::NoHintProvided => "no_hint_provided",
            Self::MalformedHint => "malformed_hint",
            Self::TraversalAttempt => "traversal_attempt",
            Self::PathNotResolvable => "path_not_resolvable",
            Self::RejectedOutsideAllowlist => "rejected_outside_allowlist",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage of the resolution state machine an event was emitted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// The hint was read.
    Start,
    /// The hint was parsed into a candidate.
    Parsed,
    /// The candidate passed the sanitizer.
    Sanitized,
    /// The candidate was resolved on disk.
    Canonicalized,
    /// A verdict was reached.
    Decided,
    /// The final directory was chosen.
    Resolved,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Parsed => "parsed",
            Self::Sanitized => "sanitized",
            Self::Canonicalized => "canonicalized",
            Self::Decided => "decided",
            Self::Resolved => "resolved",
        };
        f.write_str(name)
    }
}

/// How loudly an event should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Routine progress.
    Trace,
    /// A hint was refused and the default is used instead.
    Warning,
    /// A path was accepted without validation.
    Unsafe,
}

/// One structured diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticEvent {
    /// Directory kind being resolved.
    pub kind: DirKind,
    /// Stage that emitted the event.
    pub stage: Stage,
    /// Verdict, once one has been reached.
    pub verdict: Option<Verdict>,
    /// Human-readable explanation.
    pub reason: String,
    /// Path involved, if any.
    pub path: Option<PathBuf>,
    /// Reporting severity.
    pub severity: Severity,
}

impl DiagnosticEvent {
    /// A routine progress event.
    #[must_use]
    pub fn trace(kind: DirKind, stage: Stage, reason: impl Into<String>) -> Self {
        Self {
            kind,
            stage,
            verdict: None,
            reason: reason.into(),
            path: None,
            severity: Severity::Trace,
        }
    }

    /// Attach a path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach a verdict.
    #[must_use]
    pub fn with_verdict(mut self, verdict: Verdict) -> Self {
        self.verdict = Some(verdict);
        self
    }

    /// Change the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}]", self.kind, self.stage)?;
        if let Some(verdict) = self.verdict {
            write!(f, " {verdict}:")?;
        }
        write!(f, " {}", self.reason)?;
        if let Some(path) = &self.path {
            write!(f, " ({})", path.display())?;
        }
        Ok(())
    }
}

/// Receiver of resolution diagnostics.
///
/// Implementations must be safe to share between threads.
pub trait DiagnosticSink: Send + Sync {
    /// Record one event.
    fn emit(&self, event: &DiagnosticEvent);
}

/// Forwards events to the `log` facade.
///
/// Traces go to `debug!`, warnings to `warn!` and unsafe overrides to
/// `error!` so they are hard to miss in production logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&self, event: &DiagnosticEvent) {
        match event.severity {
            Severity::Trace => log::debug!("{event}"),
            Severity::Warning => log::warn!("{event}"),
            Severity::Unsafe => log::error!("UNSAFE {event}"),
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _event: &DiagnosticEvent) {}
}

/// Collects events in memory, mainly for tests and structured output.
///
/// # Examples
///
/// ```
/// use dirguard::diagnostics::{DiagnosticEvent, DiagnosticSink, MemorySink, Stage};
/// use dirguard::DirKind;
///
/// let sink = MemorySink::new();
/// sink.emit(&DiagnosticEvent::trace(DirKind::Config, Stage::Start, "reading hint"));
/// assert_eq!(sink.events().len(), 1);
/// assert!(sink.warnings().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of every event recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Events above trace severity.
    #[must_use]
    pub fn warnings(&self) -> Vec<DiagnosticEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.severity > Severity::Trace)
            .collect()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, event: &DiagnosticEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}

/// Sends every event to each inner sink in turn.
pub struct FanoutSink<'a> {
    sinks: Vec<&'a dyn DiagnosticSink>,
}

impl<'a> FanoutSink<'a> {
    /// Combine the given sinks.
    #[must_use]
    pub fn new(sinks: Vec<&'a dyn DiagnosticSink>) -> Self {
        Self { sinks }
    }
}

impl DiagnosticSink for FanoutSink<'_> {
    fn emit(&self, event: &DiagnosticEvent) {
        for sink in &self.sinks {
            sink.emit(event);
        }
    }
}
