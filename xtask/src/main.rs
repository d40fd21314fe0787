//! Build automation tasks for the sb-migration workspace.
//!
//! Run with: `cargo run -p xtask -- <command>`
//!
//! # Available Commands
//!
//! - `check`: Run all checks (fmt --check, clippy, test)
//! - `fmt`: Format code with rustfmt
//! - `lint`: Run clippy with all targets
//! - `test`: Run all tests
//! - `build`: Build the release binary
//! - `doc`: Generate documentation

// xtask is a build tool - printing to stderr is expected
#![allow(clippy::print_stderr)]

use std::process::Command;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

/// Build automation for sb-migration
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for sb-migration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks (fmt --check, clippy, test)
    Check,
    /// Format code with rustfmt
    Fmt {
        /// Check formatting without modifying files
        #[arg(long)]
        check: bool,
    },
    /// Run clippy lints
    Lint {
        /// Automatically fix lint warnings
        #[arg(long)]
        fix: bool,
    },
    /// Run all tests
    Test {
        /// Run tests with release optimizations
        #[arg(long)]
        release: bool,
    },
    /// Build release binary
    Build {
        /// Build in debug mode
        #[arg(long)]
        debug: bool,
    },
    /// Generate documentation
    Doc {
        /// Open in browser after building
        #[arg(long)]
        open: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            run("cargo", &["fmt", "--all", "--", "--check"])?;
            run(
                "cargo",
                &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
            )?;
            run("cargo", &["test", "--workspace"])?;
        }
        Commands::Fmt { check } => {
            if check {
                run("cargo", &["fmt", "--all", "--", "--check"])?;
            } else {
                run("cargo", &["fmt", "--all"])?;
            }
        }
        Commands::Lint { fix } => {
            if fix {
                run(
                    "cargo",
                    &["clippy", "--workspace", "--all-targets", "--fix", "--allow-dirty"],
                )?;
            } else {
                run(
                    "cargo",
                    &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
                )?;
            }
        }
        Commands::Test { release } => {
            if release {
                run("cargo", &["test", "--workspace", "--release"])?;
            } else {
                run("cargo", &["test", "--workspace"])?;
            }
        }
        Commands::Build { debug } => {
            if debug {
                run("cargo", &["build", "-p", "sb-cli"])?;
            } else {
                run("cargo", &["build", "-p", "sb-cli", "--release"])?;
            }
        }
        Commands::Doc { open } => {
            if open {
                run("cargo", &["doc", "--workspace", "--no-deps", "--open"])?;
            } else {
                run("cargo", &["doc", "--workspace", "--no-deps"])?;
            }
        }
    }

    Ok(())
}

/// Runs a command, failing on a non-zero exit status.
fn run(program: &str, args: &[&str]) -> Result<()> {
    eprintln!("$ {program} {}", args.join(" "));
    let status = Command::new(program).args(args).status()?;
    if !status.success() {
        bail!("{program} exited with {status}");
    }
    Ok(())
}
