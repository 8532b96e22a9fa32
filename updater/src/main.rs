//! Verification metadata updater CLI entrypoint.
//!
//! This binary regenerates `gradle/verification-metadata.xml` with the Gradle
//! wrapper and patches it so it verifies on every desktop platform.

use camino::Utf8PathBuf;
use clap::Parser;
use std::io::Write;
use verification_metadata::UpdaterConfig;
use verification_updater::cli::Cli;
use verification_updater::download::HttpFetcher;
use verification_updater::error::{Result, UpdaterError};
use verification_updater::gradle::SystemCommandExecutor;
use verification_updater::output::{DryRunInfo, success_message, write_stderr_line};
use verification_updater::pipeline::{Collaborators, UpdateOptions, run_update};

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let project_root = resolve_project_root(cli.project_root.clone())?;
    let config = resolve_config(cli)?;
    let metadata_path = config.metadata_path_in(&project_root);

    if cli.dry_run {
        let info = DryRunInfo {
            project_root: &project_root,
            metadata_path: &metadata_path,
            config: &config,
            skip_build: cli.skip_build,
        };
        write_stderr_line(stderr, info.display_text());
        return Ok(());
    }

    let options = UpdateOptions {
        project_root: &project_root,
        metadata_path: &metadata_path,
        skip_build: cli.skip_build,
        quiet: cli.quiet,
    };
    let collaborators = Collaborators {
        executor: &SystemCommandExecutor,
        fetcher: &HttpFetcher,
    };
    let summary = run_update(&config, &options, &collaborators, stderr)?;

    if !cli.quiet {
        write_stderr_line(stderr, success_message(&summary, &metadata_path));
    }
    Ok(())
}

/// Uses the CLI override or the current directory, which must be a directory.
fn resolve_project_root(cli_root: Option<Utf8PathBuf>) -> Result<Utf8PathBuf> {
    let root = match cli_root {
        Some(root) => root,
        None => {
            let cwd = std::env::current_dir()?;
            Utf8PathBuf::try_from(cwd).map_err(|e| UpdaterError::NonUtf8Path {
                path: e.into_path_buf().to_string_lossy().into_owned(),
            })?
        }
    };

    if !root.is_dir() {
        return Err(UpdaterError::ProjectRootNotFound { path: root });
    }
    Ok(root)
}

/// Loads `--config` when given, then applies `--metadata`.
fn resolve_config(cli: &Cli) -> Result<UpdaterConfig> {
    let mut config = match &cli.config {
        Some(path) => UpdaterConfig::load_from(path)?,
        None => UpdaterConfig::default(),
    };
    if let Some(metadata) = &cli.metadata {
        config.metadata_path.clone_from(metadata);
        config.validate()?;
    }
    Ok(config)
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}
