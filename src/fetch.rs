//! Fetch seam for computing checksums of remote artifacts.
//!
//! The platform backfill never talks to the network directly; it asks an
//! [`ArtifactFetcher`] for the SHA-512 of a URL. The CLI supplies an HTTP
//! implementation and tests supply stubs.

use crate::digest::Sha512Digest;

/// Trait for downloading an artifact and hashing its body.
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactFetcher {
    /// Download `url` and return the SHA-512 digest of the response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// status other than 200, or the body cannot be read.
    fn fetch_sha512(&self, url: &str) -> Result<Sha512Digest, FetchError>;
}

/// Errors arising from artifact fetches.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// The URL that was requested.
        url: String,
        /// The HTTP status code received.
        status: u16,
    },

    /// The request could not be completed.
    #[error("download failed for {url}: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The response body could not be read.
    #[error("failed to read response body from {url}")]
    Body {
        /// The URL that was requested.
        url: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
