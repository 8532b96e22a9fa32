//! Trust rules exempting auxiliary artifacts from checksum verification.
//!
//! IDEs download Javadoc and source archives on demand. Gradle never records
//! checksums for those during a build, so without a trust rule every such
//! download fails verification.

use crate::document::{Document, Element};
use crate::error::Result;

/// Filename regexes for Javadoc jars, sources jars, and source archives.
pub const SOURCE_ARTIFACT_PATTERNS: [&str; 3] =
    [r".*-javadoc[.]jar", r".*-sources[.]jar", r".*-src[.]zip"];

/// A `<trust>` rule inside `<trusted-artifacts>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustRule {
    file: String,
    regex: bool,
}

impl TrustRule {
    /// A rule matching filenames against `pattern` as a regular expression.
    #[must_use]
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self {
            file: pattern.into(),
            regex: true,
        }
    }

    /// The filename or pattern.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Whether [`TrustRule::file`] is a regular expression.
    #[must_use]
    pub fn is_regex(&self) -> bool {
        self.regex
    }

    /// Read a rule from a `<trust>` element, if it carries a `file` attribute.
    #[must_use]
    pub fn from_element(element: &Element) -> Option<Self> {
        let file = element.attribute("file")?;
        Some(Self {
            file: file.to_owned(),
            regex: element.attribute("regex") == Some("true"),
        })
    }

    fn to_element(&self, name: String) -> Element {
        let element = Element::new(name).with_attribute("file", self.file.as_str());
        if self.regex {
            element.with_attribute("regex", "true")
        } else {
            element
        }
    }
}

/// Collect the trust rules currently present in the document.
#[must_use]
pub fn trust_rules(document: &Document) -> Vec<TrustRule> {
    document
        .root()
        .find_child("configuration")
        .and_then(|configuration| configuration.find_child("trusted-artifacts"))
        .map(|trusted| {
            trusted
                .child_elements()
                .filter(|element| element.local_name() == "trust")
                .filter_map(TrustRule::from_element)
                .collect()
        })
        .unwrap_or_default()
}

/// Append a regex trust rule for each pattern under
/// `configuration/trusted-artifacts`.
///
/// The container is created when absent. Patterns that already have a regex
/// rule are skipped, so each pattern appears exactly once however many times
/// the patch runs. Returns the number of rules added.
///
/// # Errors
///
/// Returns [`crate::error::MetadataError::MissingElement`] when the document
/// has no `configuration` element.
pub fn add_source_exclusions<S: AsRef<str>>(
    document: &mut Document,
    patterns: &[S],
) -> Result<usize> {
    let configuration = document.root_mut().require_child_mut("configuration")?;
    if configuration.find_child("trusted-artifacts").is_none() {
        let name = configuration.qualify("trusted-artifacts");
        configuration.push_child(Element::new(name));
    }
    let trusted = configuration.require_child_mut("trusted-artifacts")?;

    let mut added = 0;
    for pattern in patterns {
        let rule = TrustRule::regex(pattern.as_ref());
        let exists = trusted
            .child_elements()
            .filter(|element| element.local_name() == "trust")
            .filter_map(TrustRule::from_element)
            .any(|existing| existing == rule);
        if exists {
            log::debug!("trust rule for {} already present", rule.file());
            continue;
        }
        let name = trusted.qualify("trust");
        trusted.push_child(rule.to_element(name));
        added += 1;
    }
    Ok(added)
}
