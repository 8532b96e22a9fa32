//! CLI argument definitions for the verification metadata updater.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use camino::Utf8PathBuf;
use clap::Parser;

/// Regenerate and patch Gradle dependency verification metadata.
#[derive(Parser, Debug, Default)]
#[command(name = "update-verification")]
#[command(version, about)]
#[command(long_about = concat!(
    "Regenerate and patch Gradle dependency verification metadata.\n\n",
    "Deletes gradle/verification-metadata.xml, runs the Gradle wrapper with ",
    "--write-verification-metadata sha512 against an empty Gradle user home, ",
    "then adds trust rules for Javadoc and source archives and checksums for ",
    "the native aapt2 jars of every desktop platform, not just the host.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Update the project in the current directory:\n",
    "    $ update-verification\n\n",
    "  Patch an existing file without running Gradle:\n",
    "    $ update-verification --skip-build\n\n",
    "  Preview the resolved settings:\n",
    "    $ update-verification --project-root ../app --dry-run",
))]
pub struct Cli {
    /// Gradle project root [default: current directory].
    #[arg(short = 'C', long, value_name = "DIR")]
    pub project_root: Option<Utf8PathBuf>,

    /// Metadata file, relative to the project root unless absolute.
    #[arg(short, long, value_name = "PATH")]
    pub metadata: Option<Utf8PathBuf>,

    /// TOML configuration file.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Patch the existing metadata file without running Gradle.
    #[arg(long)]
    pub skip_build: bool,

    /// Show configuration and exit without modifying anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress progress output (errors still shown).
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
