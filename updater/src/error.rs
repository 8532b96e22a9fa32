//! Error types for the verification metadata updater CLI.
//!
//! Each variant carries the path, program, or status needed to see what
//! failed. The updater never retries; the recovery for every error is to fix
//! the cause and run the whole update again.

use camino::Utf8PathBuf;
use std::process::ExitStatus;
use thiserror::Error;
use verification_metadata::MetadataError;

/// Errors that can occur while regenerating verification metadata.
#[derive(Debug, Error)]
pub enum UpdaterError {
    /// The stale metadata file exists but could not be removed.
    #[error("failed to remove stale metadata file {path}")]
    RemoveStale {
        /// Path of the metadata file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The temporary Gradle user home could not be created.
    #[error("failed to create temporary Gradle user home")]
    TempDir {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The Gradle wrapper could not be started.
    #[error("failed to launch {program}")]
    Spawn {
        /// The program that failed to start.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The Gradle wrapper ran but did not succeed.
    #[error("gradle failed with {status}; rerun the update once the build passes")]
    GradleFailed {
        /// Exit status reported by the wrapper.
        status: ExitStatus,
    },

    /// The metadata file is absent after Gradle ran, or before patching
    /// with `--skip-build`.
    #[error("verification metadata {path} does not exist")]
    MetadataMissing {
        /// Expected location of the metadata file.
        path: Utf8PathBuf,
    },

    /// The project root does not exist or is not a directory.
    #[error("project root {path} is not a directory")]
    ProjectRootNotFound {
        /// The rejected path.
        path: Utf8PathBuf,
    },

    /// A filesystem path is not valid UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },

    /// Loading, patching, or writing the metadata document failed.
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Test stub received an unexpected or mismatched command invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

/// Result type alias using [`UpdaterError`].
pub type Result<T> = std::result::Result<T, UpdaterError>;
