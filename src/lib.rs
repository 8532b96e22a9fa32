//! Model and patchers for Gradle dependency verification metadata.
//!
//! Gradle's `--write-verification-metadata` output needs two fixes before it
//! is committed: trust rules for IDE-fetched Javadoc and source archives,
//! and checksums for the native `aapt2` jars of the platforms other than the
//! host. This crate parses the document, applies both patches, and writes it
//! back in Gradle's exact formatting. The `verification-updater` binary
//! drives it end to end.
//!
//! # Modules
//!
//! - [`component`] - Component coordinates and platform artifact naming
//! - [`config`] - TOML configuration for the updater
//! - [`digest`] - SHA-512 digest newtype and streaming hasher
//! - [`document`] - Owned XML element tree and parser
//! - [`error`] - Error types
//! - [`fetch`] - Artifact download seam
//! - [`patch`] - Source exclusions and platform checksum backfill
//! - `serialize` - Gradle-compatible output formatting

pub mod component;
pub mod config;
pub mod digest;
pub mod document;
pub mod error;
pub mod fetch;
pub mod patch;
mod serialize;

pub use config::UpdaterConfig;
pub use document::{Document, Element, Node};
pub use error::{MetadataError, Result};
pub use serialize::INDENT_WIDTH;
