//! Shared test utilities for the updater crate.

use crate::error::{Result, UpdaterError};
use crate::gradle::{CommandExecutor, CommandSpec, GRADLE_USER_HOME};
use camino::{Utf8Path, Utf8PathBuf};
use std::cell::RefCell;
use std::process::ExitStatus;
use verification_metadata::digest::Sha512Digest;
use verification_metadata::fetch::{ArtifactFetcher, FetchError};

/// Metadata as Gradle writes it on a Linux host: only the Linux `aapt2` jar
/// is listed.
pub const GENERATED_METADATA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<verification-metadata xmlns="https://schema.gradle.org/dependency-verification" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="https://schema.gradle.org/dependency-verification https://schema.gradle.org/dependency-verification/dependency-verification-1.3.xsd">
   <configuration>
      <verify-metadata>true</verify-metadata>
      <verify-signatures>false</verify-signatures>
   </configuration>
   <components>
      <component group="com.android.tools.build" name="aapt2" version="8.2.2-10154469">
         <artifact name="aapt2-8.2.2-10154469-linux.jar">
            <sha512 value="11" origin="Generated by Gradle"/>
         </artifact>
         <artifact name="aapt2-8.2.2-10154469.pom">
            <sha512 value="22" origin="Generated by Gradle"/>
         </artifact>
      </component>
   </components>
</verification-metadata>
"#;

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code.unsigned_abs())
}

/// A digest made of one repeated hex character.
///
/// # Panics
///
/// Panics if `seed` is not a lowercase hex digit.
#[must_use]
pub fn digest(seed: char) -> Sha512Digest {
    Sha512Digest::try_from(seed.to_string().repeat(128))
        .unwrap_or_else(|err| panic!("seed {seed:?} is not a hex digit: {err}"))
}

/// A stub [`CommandExecutor`] standing in for the Gradle wrapper.
///
/// Records every command it receives and, when configured, writes fixture
/// metadata to the expected path before reporting its exit status.
#[derive(Debug)]
pub struct StubExecutor {
    output: Option<(Utf8PathBuf, String)>,
    status: ExitStatus,
    calls: RefCell<Vec<CommandSpec>>,
}

impl StubExecutor {
    /// Succeeds after writing `contents` to `path`.
    #[must_use]
    pub fn writing(path: &Utf8Path, contents: &str) -> Self {
        Self {
            output: Some((path.to_owned(), contents.to_owned())),
            status: exit_status(0),
            calls: RefCell::default(),
        }
    }

    /// Succeeds without writing anything.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            output: None,
            status: exit_status(0),
            calls: RefCell::default(),
        }
    }

    /// Exits with `code` without writing anything.
    #[must_use]
    pub fn failing(code: i32) -> Self {
        Self {
            output: None,
            status: exit_status(code),
            calls: RefCell::default(),
        }
    }

    /// Commands received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, command: &CommandSpec) -> Result<ExitStatus> {
        self.calls.borrow_mut().push(command.clone());

        let home = command
            .env_var(GRADLE_USER_HOME)
            .ok_or_else(|| UpdaterError::StubMismatch {
                message: format!("{GRADLE_USER_HOME} was not set"),
            })?;
        if !Utf8Path::new(home).is_dir() {
            return Err(UpdaterError::StubMismatch {
                message: format!("{GRADLE_USER_HOME} {home} does not exist"),
            });
        }

        if let Some((path, contents)) = &self.output {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, contents)?;
        }
        Ok(self.status)
    }
}

/// A stub [`ArtifactFetcher`] that answers by filename suffix.
#[derive(Debug, Default)]
pub struct StubFetcher {
    responses: Vec<(String, std::result::Result<Sha512Digest, u16>)>,
    requested: RefCell<Vec<String>>,
}

impl StubFetcher {
    /// A fetcher with no responses; every request answers HTTP 404.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer URLs ending in `suffix` with `digest`.
    #[must_use]
    pub fn with_digest(mut self, suffix: &str, digest: Sha512Digest) -> Self {
        self.responses.push((suffix.to_owned(), Ok(digest)));
        self
    }

    /// Answer URLs ending in `suffix` with HTTP `status`.
    #[must_use]
    pub fn with_status(mut self, suffix: &str, status: u16) -> Self {
        self.responses.push((suffix.to_owned(), Err(status)));
        self
    }

    /// URLs requested so far.
    #[must_use]
    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl ArtifactFetcher for StubFetcher {
    fn fetch_sha512(&self, url: &str) -> std::result::Result<Sha512Digest, FetchError> {
        self.requested.borrow_mut().push(url.to_owned());
        let response = self
            .responses
            .iter()
            .find(|(suffix, _)| url.ends_with(suffix.as_str()))
            .map_or(Err(404), |(_, response)| response.clone());
        response.map_err(|status| FetchError::Status {
            url: url.to_owned(),
            status,
        })
    }
}
