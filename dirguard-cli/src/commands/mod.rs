//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `resolve`: Resolve directory kinds from the environment
//! - `layout`: Show the application directory layout
//! - `find`: Find a configuration file, local before user
//! - `completions`: Generate shell completion scripts

pub mod completions;
pub mod find;
pub mod layout;
pub mod resolve;

pub use completions::CompletionsCommand;
pub use find::FindCommand;
pub use layout::LayoutCommand;
pub use resolve::ResolveCommand;
