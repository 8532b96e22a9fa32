//! Component coordinates and platform-specific artifact naming.
//!
//! A component is identified by its Maven group, name, and version. Native
//! tools such as `aapt2` publish one jar per desktop platform, named
//! `<name>-<version>-<platform>.jar` and stored under the conventional
//! `group/name/version/filename` repository layout.

use crate::document::Element;
use crate::error::{MetadataError, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Desktop platforms for which native artifacts are published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Platform {
    /// Linux builds.
    Linux,
    /// macOS builds.
    Osx,
    /// Windows builds.
    Windows,
}

impl Platform {
    /// Every supported platform in repository order.
    pub const ALL: [Self; 3] = [Self::Linux, Self::Osx, Self::Windows];

    /// Return the classifier used in artifact filenames.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Osx => "osx",
            Self::Windows => "windows",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = MetadataError;

    fn from_str(value: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|platform| platform.as_str() == value)
            .ok_or_else(|| MetadataError::UnsupportedPlatform {
                value: value.to_owned(),
                expected: Self::ALL.map(Self::as_str).join(", "),
            })
    }
}

impl TryFrom<String> for Platform {
    type Error = MetadataError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Group, name, and version of a dependency component.
///
/// # Examples
///
/// ```
/// use verification_metadata::component::{ComponentId, Platform};
///
/// let id = ComponentId::new("com.example.tool", "aapt2", "1.0.0");
/// let filename = id.artifact_filename(Platform::Linux);
/// assert_eq!(filename, "aapt2-1.0.0-linux.jar");
/// assert_eq!(
///     id.repository_path(&filename),
///     "com/example/tool/aapt2/1.0.0/aapt2-1.0.0-linux.jar",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentId {
    group: String,
    name: String,
    version: String,
}

impl ComponentId {
    /// Create a component identifier from its coordinates.
    #[must_use]
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Read the coordinates from a `<component>` element.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::MissingAttribute`] when `group`, `name`, or
    /// `version` is absent.
    pub fn from_element(element: &Element) -> Result<Self> {
        let required = |attribute: &'static str| {
            element
                .attribute(attribute)
                .ok_or_else(|| MetadataError::MissingAttribute {
                    element: element.local_name().to_owned(),
                    attribute,
                })
        };
        Ok(Self::new(
            required("group")?,
            required("name")?,
            required("version")?,
        ))
    }

    /// The Maven group.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// The artifact name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Filename of the jar published for `platform`.
    #[must_use]
    pub fn artifact_filename(&self, platform: Platform) -> String {
        format!("{}-{}-{platform}.jar", self.name, self.version)
    }

    /// Repository-relative path of `filename` for this component.
    #[must_use]
    pub fn repository_path(&self, filename: &str) -> String {
        format!(
            "{}/{}/{}/{filename}",
            self.group.replace('.', "/"),
            self.name,
            self.version
        )
    }

    /// Absolute URL of `filename` in the repository rooted at `repository`.
    #[must_use]
    pub fn artifact_url(&self, repository: &str, filename: &str) -> String {
        format!(
            "{}/{}",
            repository.trim_end_matches('/'),
            self.repository_path(filename)
        )
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}
