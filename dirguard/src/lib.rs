#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # dirguard
//!
//! A library for resolving configuration, data and cache directories from
//! untrusted hints.
//!
//! Environment variables such as `XDG_CONFIG_HOME` are attacker-controllable
//! in many deployments. This library parses a hint, rejects traversal
//! sequences, resolves symlinks hop by hop and checks the result against a
//! set of allowed roots. A hint that fails any step is replaced by the
//! platform default directory, with a diagnostic explaining why.
//!
//! ## Core Types
//!
//! - [`Resolver`] and [`Resolution`]: the resolution pipeline and its output
//! - [`AllowedRoots`] and [`TrustMode`]: the containment policy
//! - [`DirKind`] and [`SystemFacts`]: what is resolved and the platform facts
//!   the fallback is derived from
//! - [`ResolverConfig`]: variable names, extra roots and limits
//! - [`DiagnosticSink`]: where stage-by-stage diagnostics go
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use dirguard::config::MapEnv;
//! use dirguard::diagnostics::MemorySink;
//! use dirguard::{AllowedRoots, DirKind, Platform, Resolver, ResolverConfig, SystemFacts, Verdict};
//!
//! let home = tempfile::tempdir().unwrap();
//! let facts = SystemFacts::new(Some(home.path().to_path_buf()), Platform::Xdg);
//! let config = ResolverConfig::default();
//! let roots = AllowedRoots::from_paths([("home", home.path())]);
//! let resolver = Resolver::new(config, facts, &roots);
//!
//! // A traversal attempt falls back to the platform default.
//! let env = MapEnv::new().with("XDG_CONFIG_HOME", "/tmp/../../etc");
//! let sink = MemorySink::new();
//! let resolution = resolver.resolve(DirKind::Config, &env, &sink).unwrap();
//!
//! assert_eq!(resolution.verdict, Verdict::TraversalAttempt);
//! assert!(resolution.resolved_path.ends_with(".config"));
//! assert_eq!(sink.warnings().len(), 1);
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fallback;
pub mod layout;
pub mod logging;
pub mod lookup;
pub mod path;
pub mod policy;
pub mod resolver;

// Re-export key types at crate root for convenience
pub use config::{ResolverConfig, ResolverConfigBuilder};
pub use diagnostics::{DiagnosticEvent, DiagnosticSink, Severity, Stage, Verdict};
pub use error::{Error, Result};
pub use fallback::{DirKind, Platform, SystemFacts};
pub use layout::AppLayout;
pub use logging::{init_logger, LogLevel, Logger};
pub use path::{CanonicalPath, PathRelationship, RawHint};
pub use policy::{AllowedRoot, AllowedRoots, PolicyVerdict, TrustMode};
pub use resolver::{Resolution, Resolver, TrustSelection};
