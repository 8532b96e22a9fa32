//! Updater configuration loaded from TOML.
//!
//! Every field is optional; an absent file or empty table yields the values
//! the project has always used: Gradle's metadata path, Google's Maven
//! repository, the `aapt2` component on the three desktop platforms, the
//! Javadoc/sources exclusions, and the `build` plus instrumented test tasks.

use crate::component::Platform;
use crate::error::{MetadataError, Result};
use crate::patch::exclusions::SOURCE_ARTIFACT_PATTERNS;
use crate::patch::platforms::{GOOGLE_MAVEN_REPOSITORY, NATIVE_COMPONENT};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

/// Default metadata location relative to the project root.
pub const DEFAULT_METADATA_PATH: &str = "gradle/verification-metadata.xml";

/// Settings for regenerating and patching the verification metadata.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct UpdaterConfig {
    /// Metadata file, relative to the project root unless absolute.
    pub metadata_path: Utf8PathBuf,
    /// Maven-layout repository used to fetch native artifacts.
    pub repository: String,
    /// Name of the native component to backfill.
    pub component: String,
    /// Platforms the native component must list.
    pub platforms: Vec<Platform>,
    /// Filename regexes trusted without checksums.
    pub trusted_patterns: Vec<String>,
    /// Gradle tasks run while generating metadata.
    pub tasks: Vec<String>,
    /// Gradle tasks excluded with `-x`.
    pub excluded_tasks: Vec<String>,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            metadata_path: Utf8PathBuf::from(DEFAULT_METADATA_PATH),
            repository: GOOGLE_MAVEN_REPOSITORY.to_owned(),
            component: NATIVE_COMPONENT.to_owned(),
            platforms: Platform::ALL.to_vec(),
            trusted_patterns: SOURCE_ARTIFACT_PATTERNS.map(str::to_owned).to_vec(),
            tasks: vec!["build".to_owned(), "connectedDebugAndroidTest".to_owned()],
            // Requires signing credentials.
            excluded_tasks: vec!["assembleRelease".to_owned()],
        }
    }
}

impl UpdaterConfig {
    /// Parse and validate a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::InvalidConfig`] for malformed TOML, unknown
    /// keys, unsupported platforms, or values that fail validation.
    ///
    /// # Examples
    ///
    /// ```
    /// use verification_metadata::config::UpdaterConfig;
    ///
    /// let config = UpdaterConfig::from_toml_str("platforms = [\"osx\"]\n")?;
    /// assert_eq!(config.component, "aapt2");
    /// assert_eq!(config.platforms.len(), 1);
    /// # Ok::<(), verification_metadata::error::MetadataError>(())
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).map_err(|err| MetadataError::InvalidConfig {
            reason: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::ConfigRead`] if the file cannot be read, or
    /// any error from [`UpdaterConfig::from_toml_str`].
    pub fn load_from(path: &Utf8Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| MetadataError::ConfigRead {
            path: path.to_owned(),
            source,
        })?;
        log::debug!("loaded updater configuration from {path}");
        Self::from_toml_str(&source)
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        if !(self.repository.starts_with("https://") || self.repository.starts_with("http://")) {
            return Err(invalid(format!(
                "repository must be an http(s) URL, got \"{}\"",
                self.repository
            )));
        }
        if self.component.trim().is_empty() {
            return Err(invalid("component must not be empty"));
        }
        if self.tasks.is_empty() {
            return Err(invalid("at least one Gradle task is required"));
        }
        if self.metadata_path.as_str().is_empty() {
            return Err(invalid("metadata_path must not be empty"));
        }
        Ok(())
    }

    /// Resolve the metadata path against `project_root`.
    #[must_use]
    pub fn metadata_path_in(&self, project_root: &Utf8Path) -> Utf8PathBuf {
        project_root.join(&self.metadata_path)
    }
}

fn invalid(reason: impl Into<String>) -> MetadataError {
    MetadataError::InvalidConfig {
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_match_the_project_baseline() {
        let config = UpdaterConfig::default();

        assert_eq!(config.metadata_path, "gradle/verification-metadata.xml");
        assert_eq!(config.repository, "https://dl.google.com/android/maven2");
        assert_eq!(config.component, "aapt2");
        assert_eq!(config.platforms, Platform::ALL);
        assert_eq!(
            config.trusted_patterns,
            [r".*-javadoc[.]jar", r".*-sources[.]jar", r".*-src[.]zip"]
        );
        assert_eq!(config.tasks, ["build", "connectedDebugAndroidTest"]);
        assert_eq!(config.excluded_tasks, ["assembleRelease"]);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    fn empty_source_yields_defaults() {
        let config = UpdaterConfig::from_toml_str("").expect("empty config parses");
        assert_eq!(config, UpdaterConfig::default());
    }

    #[rstest]
    fn deserialises_overrides_from_toml() {
        let source = concat!(
            "repository = \"https://mirror.example.test/maven2/\"\n",
            "platforms = [\"linux\", \"windows\"]\n",
            "excluded_tasks = []\n",
        );

        let config = UpdaterConfig::from_toml_str(source)
            .expect("expected configuration to parse successfully");

        assert_eq!(config.repository, "https://mirror.example.test/maven2/");
        assert_eq!(config.platforms, [Platform::Linux, Platform::Windows]);
        assert!(config.excluded_tasks.is_empty());
        assert_eq!(config.component, "aapt2");
    }

    #[rstest]
    #[case::unknown_key("colour = \"blue\"\n", "unknown field")]
    #[case::bad_platform("platforms = [\"beos\"]\n", "beos")]
    #[case::bad_repository("repository = \"ftp://example.test\"\n", "http(s) URL")]
    #[case::blank_component("component = \"  \"\n", "component must not be empty")]
    #[case::no_tasks("tasks = []\n", "at least one Gradle task")]
    fn rejects_invalid_configuration(#[case] source: &str, #[case] fragment: &str) {
        let err = UpdaterConfig::from_toml_str(source).expect_err("configuration should fail");
        assert!(matches!(err, MetadataError::InvalidConfig { .. }));
        assert!(err.to_string().contains(fragment), "{err}");
    }

    #[rstest]
    fn load_from_reads_file() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::try_from(temp.path().join("updater.toml")).expect("UTF-8 path");
        std::fs::write(&path, "component = \"bundletool\"\n").expect("write config");

        let config = UpdaterConfig::load_from(&path).expect("config loads");
        assert_eq!(config.component, "bundletool");
    }

    #[rstest]
    fn load_from_reports_missing_file() {
        let err = UpdaterConfig::load_from(Utf8Path::new("/nonexistent/updater.toml"))
            .expect_err("file absent");
        assert!(matches!(err, MetadataError::ConfigRead { .. }));
    }

    #[rstest]
    fn metadata_path_resolves_against_root() {
        let config = UpdaterConfig::default();
        assert_eq!(
            config.metadata_path_in(Utf8Path::new("/work/app")),
            "/work/app/gradle/verification-metadata.xml"
        );
    }
}
