//! Build script for dirguard-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
fn build_cli() -> Command {
    Command::new("dirguard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Resolve configuration and data directories from untrusted hints")
        .long_about(
            "Resolves XDG-style directory hints, rejecting traversal and symlink \
             escapes and falling back to the platform default directory",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("settings")
                .long("settings")
                .help("YAML settings file for the resolver")
                .value_name("FILE")
                .global(true),
        )
        .arg(
            Arg::new("app-name")
                .long("app-name")
                .help("Application name used for layout and file lookup")
                .value_name("NAME")
                .global(true)
                .env("DIRGUARD_APP_NAME"),
        )
        .arg(
            Arg::new("root")
                .long("root")
                .help("Additional allowed root (repeatable)")
                .value_name("PATH")
                .global(true)
                .action(clap::ArgAction::Append),
        )
        .subcommands(vec![
            Command::new("resolve")
                .about("Resolve directory kinds from the environment")
                .long_about("Print the directory chosen for each kind and the verdict on its hint"),
            Command::new("layout")
                .about("Show the application directory layout")
                .long_about("Print the per-application directories under the resolved config root"),
            Command::new("find")
                .about("Find a configuration file")
                .long_about(
                    "Look for a file in the repository-local config directory, then the user's",
                ),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("dirguard.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
}
