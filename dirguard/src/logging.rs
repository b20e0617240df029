//! Terminal reporting for resolution diagnostics.
//!
//! [`Logger`] writes to stderr and plays two roles: it is a
//! [`DiagnosticSink`], so verdicts reach the user as they happen, and it can
//! be installed as the `log` backend so the library's `log::debug!` lines
//! show up in verbose mode.
//!
//! Unsafe overrides are printed at every level, including `Quiet`.

use std::env;
use std::fmt;

use crate::diagnostics::{DiagnosticEvent, DiagnosticSink, Severity};

/// Environment variable selecting the default log level.
pub const LOG_MODE_VAR: &str = "DIRGUARD_LOG_MODE";

/// How much the [`Logger`] prints.
///
/// ```
/// use dirguard::LogLevel;
///
/// assert!(LogLevel::Quiet < LogLevel::Normal);
/// assert_eq!(LogLevel::parse("VERBOSE").unwrap(), LogLevel::Verbose);
/// assert!(LogLevel::parse("loud").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Only unsafe overrides.
    Quiet,
    /// Rejections, toggle problems and unsafe overrides.
    Normal,
    /// Everything, including per-stage traces.
    Verbose,
}

impl LogLevel {
    /// Parse `quiet`, `normal` or `verbose`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns a message naming the unrecognised value.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" => Ok(Self::Quiet),
            "normal" => Ok(Self::Normal),
            "verbose" => Ok(Self::Verbose),
            _ => Err(format!("invalid log level: {s}")),
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Quiet => "quiet",
            Self::Normal => "normal",
            Self::Verbose => "verbose",
        }
    }

    const fn filter(self) -> log::LevelFilter {
        match self {
            Self::Quiet => log::LevelFilter::Off,
            Self::Normal => log::LevelFilter::Warn,
            Self::Verbose => log::LevelFilter::Debug,
        }
    }

    const fn shows(self, severity: Severity) -> bool {
        match severity {
            Severity::Trace => matches!(self, Self::Verbose),
            Severity::Warning => !matches!(self, Self::Quiet),
            Severity::Unsafe => true,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stderr reporter for diagnostics and `log` records.
///
/// ```no_run
/// use dirguard::config::ProcessEnv;
/// use dirguard::{init_logger, AllowedRoots, DirKind, Resolver, ResolverConfig, SystemFacts};
///
/// let logger = init_logger(false, false);
/// logger.install();
///
/// let config = ResolverConfig::default();
/// let facts = SystemFacts::discover();
/// let roots = AllowedRoots::discover(&facts, &config);
/// let resolver = Resolver::new(config, facts, &roots);
/// resolver.resolve(DirKind::Config, &ProcessEnv, &logger).unwrap();
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Logger {
    level: LogLevel,
}

impl Logger {
    /// A logger printing at `level`.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// The configured level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Install this logger as the global `log` backend.
    ///
    /// Only the first call in a process takes effect.
    pub fn install(self) {
        if log::set_boxed_logger(Box::new(self)).is_ok() {
            log::set_max_level(self.level.filter());
        }
    }

    /// Render a diagnostic line as it is printed to stderr.
    #[must_use]
    pub fn format_event(event: &DiagnosticEvent) -> String {
        match event.severity {
            Severity::Trace => format!("DEBUG: {event}"),
            Severity::Warning if event.verdict.is_some_and(|v| v.is_rejection()) => {
                format!("WARN: {event}; falling back to the default directory")
            }
            Severity::Warning => format!("WARN: {event}"),
            Severity::Unsafe => format!("UNSAFE: {event}"),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Normal)
    }
}

impl DiagnosticSink for Logger {
    fn emit(&self, event: &DiagnosticEvent) {
        if self.level.shows(event.severity) {
            eprintln!("{}", Self::format_event(event));
        }
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= self.level.filter()
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("{}: {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Pick the log level from command-line flags, then `DIRGUARD_LOG_MODE`.
///
/// `verbose` wins over `quiet`. An unrecognised `DIRGUARD_LOG_MODE` is
/// ignored and the level defaults to `Normal`.
#[must_use]
pub fn init_logger(verbose: bool, quiet: bool) -> Logger {
    let level = if verbose {
        LogLevel::Verbose
    } else if quiet {
        LogLevel::Quiet
    } else {
        env::var(LOG_MODE_VAR)
            .ok()
            .and_then(|mode| LogLevel::parse(&mode).ok())
            .unwrap_or(LogLevel::Normal)
    };
    Logger::new(level)
}
