//! Post-processing applied to the metadata Gradle generates.
//!
//! - [`exclusions`] adds trust rules for Javadoc and source archives.
//! - [`platforms`] backfills checksums for native artifacts of other hosts.
//!
//! [`patch_document`] applies both according to an [`UpdaterConfig`].

pub mod exclusions;
pub mod platforms;

use crate::config::UpdaterConfig;
use crate::document::Document;
use crate::error::Result;
use crate::fetch::ArtifactFetcher;
use platforms::PlatformBackfill;

/// What a patch run changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchSummary {
    /// Number of trust rules appended.
    pub trust_rules_added: usize,
    /// Filenames of artifact entries added by the platform backfill.
    pub artifacts_added: Vec<String>,
}

impl PatchSummary {
    /// Return true when the patch left the document untouched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trust_rules_added == 0 && self.artifacts_added.is_empty()
    }
}

/// Apply the source exclusions and the platform backfill to `document`.
///
/// # Errors
///
/// Returns the first structural or fetch error encountered. The document
/// may be partially patched when an error is returned.
pub fn patch_document(
    document: &mut Document,
    config: &UpdaterConfig,
    fetcher: &dyn ArtifactFetcher,
) -> Result<PatchSummary> {
    let trust_rules_added = exclusions::add_source_exclusions(document, &config.trusted_patterns)?;
    let backfill = PlatformBackfill {
        repository: &config.repository,
        component: &config.component,
        platforms: &config.platforms,
    };
    let artifacts_added = platforms::add_missing_platforms(document, &backfill, fetcher)?;
    Ok(PatchSummary {
        trust_rules_added,
        artifacts_added,
    })
}
