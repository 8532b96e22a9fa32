//! Backfill of platform-specific native artifact checksums.
//!
//! Gradle only records the variant of a native tool that matches the host
//! operating system. Builds on the other desktop platforms would then fail
//! verification, so the missing variants are downloaded and hashed here and
//! written with the same origin label Gradle uses for its own entries.

use crate::component::{ComponentId, Platform};
use crate::digest::Sha512Digest;
use crate::document::{Document, Element};
use crate::error::{MetadataError, Result};
use crate::fetch::ArtifactFetcher;

/// Origin label Gradle attaches to checksums it computes itself.
pub const GRADLE_ORIGIN: &str = "Generated by Gradle";

/// Google's Maven repository, which hosts `aapt2`.
pub const GOOGLE_MAVEN_REPOSITORY: &str = "https://dl.google.com/android/maven2";

/// Name of the native component whose platform variants are backfilled.
pub const NATIVE_COMPONENT: &str = "aapt2";

/// Which component to backfill, from where, and for which platforms.
#[derive(Debug, Clone, Copy)]
pub struct PlatformBackfill<'a> {
    /// Base URL of the Maven-layout repository.
    pub repository: &'a str,
    /// Value of the component's `name` attribute.
    pub component: &'a str,
    /// Platforms that must have an artifact entry.
    pub platforms: &'a [Platform],
}

impl Default for PlatformBackfill<'static> {
    fn default() -> Self {
        Self {
            repository: GOOGLE_MAVEN_REPOSITORY,
            component: NATIVE_COMPONENT,
            platforms: &Platform::ALL,
        }
    }
}

/// Add checksum entries for every platform variant the component lacks.
///
/// Platforms whose artifact is already listed are skipped without fetching,
/// which makes repeated runs produce identical output. New entries are
/// appended and then all children of the component are re-sorted by
/// filename to restore Gradle's canonical order. Returns the filenames that
/// were added.
///
/// # Errors
///
/// Returns an error when `components` or the selected component is absent,
/// when the component lacks its coordinates, or when a fetch fails. No entry
/// is written for a platform whose fetch failed.
pub fn add_missing_platforms(
    document: &mut Document,
    backfill: &PlatformBackfill<'_>,
    fetcher: &dyn ArtifactFetcher,
) -> Result<Vec<String>> {
    let components = document.root_mut().require_child_mut("components")?;
    let component = components
        .find_child_with_attribute_mut("component", "name", backfill.component)
        .ok_or_else(|| MetadataError::ComponentNotFound {
            name: backfill.component.to_owned(),
        })?;
    let id = ComponentId::from_element(component)?;
    let artifact_name = component.qualify("artifact");
    let checksum_name = component.qualify("sha512");

    let mut added = Vec::new();
    for &platform in backfill.platforms {
        let filename = id.artifact_filename(platform);
        if component
            .find_child_with_attribute("artifact", "name", &filename)
            .is_some()
        {
            log::debug!("{id} already lists {filename}");
            continue;
        }

        let url = id.artifact_url(backfill.repository, &filename);
        log::debug!("fetching {url}");
        let digest = fetcher.fetch_sha512(&url)?;
        log::trace!("{filename} sha512 {digest}");

        component.push_child(artifact_element(
            artifact_name.clone(),
            checksum_name.clone(),
            &filename,
            &digest,
        ));
        added.push(filename);
    }

    component.sort_children_by_attribute("name");
    Ok(added)
}

fn artifact_element(
    artifact_name: String,
    checksum_name: String,
    filename: &str,
    digest: &Sha512Digest,
) -> Element {
    Element::new(artifact_name)
        .with_attribute("name", filename)
        .with_child(
            Element::new(checksum_name)
                .with_attribute("value", digest.as_str())
                .with_attribute("origin", GRADLE_ORIGIN),
        )
}
