//! End-to-end update pipeline.
//!
//! Removes the stale metadata file, regenerates it with Gradle, then patches
//! it in place. Collaborators are injected so tests can drive the whole flow
//! without a Gradle installation or network access.

use crate::error::{Result, UpdaterError};
use crate::gradle::{CommandExecutor, GradleInvocation, generate_metadata};
use crate::output::write_stderr_line;
use camino::Utf8Path;
use std::io::{ErrorKind, Write};
use verification_metadata::fetch::ArtifactFetcher;
use verification_metadata::patch::{PatchSummary, patch_document};
use verification_metadata::{Document, UpdaterConfig};

/// Options resolved from the command line for a single run.
#[derive(Debug, Clone, Copy)]
pub struct UpdateOptions<'a> {
    /// Project root containing the Gradle wrapper.
    pub project_root: &'a Utf8Path,
    /// Resolved metadata file path.
    pub metadata_path: &'a Utf8Path,
    /// Patch the existing file without running Gradle.
    pub skip_build: bool,
    /// Suppress progress output.
    pub quiet: bool,
}

/// External collaborators used by [`run_update`].
pub struct Collaborators<'a> {
    /// Runs the Gradle wrapper.
    pub executor: &'a dyn CommandExecutor,
    /// Downloads artifacts for the platform backfill.
    pub fetcher: &'a dyn ArtifactFetcher,
}

/// Delete the metadata file so Gradle regenerates it from scratch.
///
/// Returns `true` when a file was removed and `false` when none existed.
///
/// # Errors
///
/// Returns [`UpdaterError::RemoveStale`] for any failure other than the file
/// being absent.
pub fn remove_stale_metadata(path: &Utf8Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(UpdaterError::RemoveStale {
            path: path.to_owned(),
            source,
        }),
    }
}

/// Regenerate and patch the verification metadata.
///
/// # Errors
///
/// Returns the first failure from cleanup, the Gradle run, loading, patching,
/// or saving the document. The metadata file is only rewritten once patching
/// has fully succeeded.
pub fn run_update(
    config: &UpdaterConfig,
    options: &UpdateOptions<'_>,
    collaborators: &Collaborators<'_>,
    stderr: &mut dyn Write,
) -> Result<PatchSummary> {
    let metadata_path = options.metadata_path;

    if !options.skip_build {
        if remove_stale_metadata(metadata_path)? {
            log::debug!("removed stale {metadata_path}");
        }

        if !options.quiet {
            write_stderr_line(stderr, "Regenerating verification metadata with Gradle...");
        }
        let invocation = GradleInvocation {
            project_root: options.project_root,
            tasks: &config.tasks,
            excluded_tasks: &config.excluded_tasks,
        };
        generate_metadata(&invocation, collaborators.executor)?;
    }

    if !metadata_path.is_file() {
        return Err(UpdaterError::MetadataMissing {
            path: metadata_path.to_owned(),
        });
    }

    if !options.quiet {
        write_stderr_line(stderr, format!("Patching {metadata_path}..."));
    }
    let mut document = Document::load(metadata_path)?;
    let summary = patch_document(&mut document, config, collaborators.fetcher)?;
    for filename in &summary.artifacts_added {
        log::info!("added checksum for {filename}");
    }
    document.save(metadata_path)?;
    Ok(summary)
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
