//! Error types for loading, patching, and writing verification metadata.
//!
//! Each variant names the element, attribute, or value that failed so the
//! operator can see which structural assumption about Gradle's output broke.

use crate::fetch::FetchError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors arising while handling a verification metadata document.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The XML input could not be parsed into an element tree.
    #[error("failed to parse verification metadata: {reason}")]
    Parse {
        /// Description of the parse failure.
        reason: String,
    },

    /// The element tree could not be serialized.
    #[error("failed to serialize verification metadata: {reason}")]
    Serialize {
        /// Description of the writer failure.
        reason: String,
    },

    /// A required child element is absent.
    #[error("<{parent}> has no <{element}> element")]
    MissingElement {
        /// Local name of the element that was searched.
        parent: String,
        /// Local name of the element that was expected.
        element: String,
    },

    /// A required attribute is absent.
    #[error("<{element}> is missing the {attribute} attribute")]
    MissingAttribute {
        /// Local name of the element lacking the attribute.
        element: String,
        /// Name of the missing attribute.
        attribute: &'static str,
    },

    /// The component selected for platform backfill is not in the document.
    #[error("component {name} not found in verification metadata")]
    ComponentNotFound {
        /// Name of the component that was searched for.
        name: String,
    },

    /// A SHA-512 digest is not a 128-character lowercase hex string.
    #[error("invalid SHA-512 digest: {reason}")]
    InvalidSha512Digest {
        /// Description of the validation failure.
        reason: String,
    },

    /// A platform identifier is not one of the supported desktop platforms.
    #[error("unsupported platform \"{value}\"; expected one of: {expected}")]
    UnsupportedPlatform {
        /// The rejected identifier.
        value: String,
        /// Comma-separated list of accepted identifiers.
        expected: String,
    },

    /// The updater configuration is malformed or inconsistent.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// A configuration file could not be read.
    #[error("failed to read configuration file {path}")]
    ConfigRead {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Downloading an artifact for checksum computation failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Reading or writing the metadata file failed.
    #[error("I/O error on {path}")]
    Io {
        /// Path of the file being accessed.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl MetadataError {
    /// Build a [`MetadataError::Parse`] from any displayable parser error.
    pub(crate) fn parse(err: impl std::fmt::Display) -> Self {
        Self::Parse {
            reason: err.to_string(),
        }
    }

    /// Build a [`MetadataError::Serialize`] from any displayable writer error.
    pub(crate) fn serialize(err: impl std::fmt::Display) -> Self {
        Self::Serialize {
            reason: err.to_string(),
        }
    }
}

/// Result type alias using [`MetadataError`].
pub type Result<T> = std::result::Result<T, MetadataError>;
