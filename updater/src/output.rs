//! Output formatting for the updater CLI.
//!
//! Progress and results go to stderr; nothing is printed on stdout.

use camino::Utf8Path;
use std::io::Write;
use verification_metadata::UpdaterConfig;
use verification_metadata::component::Platform;
use verification_metadata::patch::PatchSummary;

/// Write a line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Format the completion message for a patch run.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use verification_metadata::patch::PatchSummary;
/// use verification_updater::output::success_message;
///
/// let summary = PatchSummary {
///     trust_rules_added: 3,
///     artifacts_added: vec!["aapt2-1.0-osx.jar".to_owned()],
/// };
/// let message = success_message(&summary, Utf8Path::new("gradle/verification-metadata.xml"));
/// assert!(message.contains("3 trust rules"));
/// assert!(message.contains("1 platform artifact"));
/// ```
#[must_use]
pub fn success_message(summary: &PatchSummary, metadata_path: &Utf8Path) -> String {
    let rules = summary.trust_rules_added;
    let rule_noun = if rules == 1 { "rule" } else { "rules" };
    let artifacts = summary.artifacts_added.len();
    let artifact_noun = if artifacts == 1 { "artifact" } else { "artifacts" };
    format!(
        "Updated {metadata_path}: added {rules} trust {rule_noun} and {artifacts} platform {artifact_noun}"
    )
}

/// Configuration information for dry-run output.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use verification_metadata::UpdaterConfig;
/// use verification_updater::output::DryRunInfo;
///
/// let config = UpdaterConfig::default();
/// let info = DryRunInfo {
///     project_root: Utf8Path::new("/work/app"),
///     metadata_path: Utf8Path::new("/work/app/gradle/verification-metadata.xml"),
///     config: &config,
///     skip_build: false,
/// };
///
/// let output = info.display_text();
/// assert!(output.contains("Dry run"));
/// assert!(output.contains("aapt2"));
/// ```
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// Project root containing the Gradle wrapper.
    pub project_root: &'a Utf8Path,
    /// Resolved metadata file path.
    pub metadata_path: &'a Utf8Path,
    /// Effective configuration.
    pub config: &'a UpdaterConfig,
    /// Whether the Gradle run would be skipped.
    pub skip_build: bool,
}

impl DryRunInfo<'_> {
    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        let config = self.config;
        let platforms: Vec<&str> = config.platforms.iter().copied().map(Platform::as_str).collect();
        let mut lines = vec![
            "Dry run - no files will be modified".to_owned(),
            String::new(),
            format!("Project root: {}", self.project_root),
            format!("Metadata file: {}", self.metadata_path),
            format!("Repository: {}", config.repository),
            format!("Component: {}", config.component),
            format!("Platforms: {}", platforms.join(", ")),
            format!("Skip build: {}", self.skip_build),
        ];

        if !self.skip_build {
            lines.push(format!("Gradle tasks: {}", config.tasks.join(" ")));
            if !config.excluded_tasks.is_empty() {
                lines.push(format!("Excluded tasks: {}", config.excluded_tasks.join(" ")));
            }
        }

        lines.push(String::new());
        lines.push("Trusted artifact patterns:".to_owned());
        for pattern in &config.trusted_patterns {
            lines.push(format!("  - {pattern}"));
        }

        lines.join("\n")
    }
}
