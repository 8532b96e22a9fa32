//! Verification metadata updater library.
//!
//! This crate drives the `update-verification` CLI: it runs the Gradle
//! wrapper against a throwaway cache to regenerate
//! `gradle/verification-metadata.xml`, then patches the result with the
//! `verification-metadata` crate. The pieces are public so the flow can be
//! exercised without Gradle or network access.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`download`] - HTTP artifact fetcher
//! - [`error`] - Error types for the update flow
//! - [`gradle`] - Gradle wrapper invocation and the process seam
//! - [`output`] - Progress and dry-run formatting
//! - [`pipeline`] - End-to-end update orchestration

pub mod cli;
pub mod download;
pub mod error;
pub mod gradle;
pub mod output;
pub mod pipeline;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
