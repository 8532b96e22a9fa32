//! Gradle wrapper invocation for metadata generation.
//!
//! Gradle sometimes omits verification entries for artifacts that are
//! already in its cache, so every run gets a fresh `GRADLE_USER_HOME` in a
//! temporary directory. The directory is removed when the run finishes,
//! whether it succeeded or not.

use crate::error::{Result, UpdaterError};
use camino::{Utf8Path, Utf8PathBuf};
use std::process::{Command, ExitStatus};

/// Environment variable that relocates Gradle's caches.
pub const GRADLE_USER_HOME: &str = "GRADLE_USER_HOME";

/// Checksum algorithm requested from `--write-verification-metadata`.
pub const CHECKSUM_ALGORITHM: &str = "sha512";

/// A fully resolved external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program to execute.
    pub program: Utf8PathBuf,
    /// Arguments in order.
    pub args: Vec<String>,
    /// Working directory for the child.
    pub current_dir: Utf8PathBuf,
    /// Variables added to or overriding the inherited environment.
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    /// Look up an environment override by name.
    #[must_use]
    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.as_str())
    }
}

/// Abstraction for running external commands.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    /// Runs a command to completion with inherited stdio and returns its
    /// exit status.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned.
    fn run(&self, command: &CommandSpec) -> Result<ExitStatus>;
}

/// Executes commands on the host system.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8PathBuf;
/// use verification_updater::gradle::{CommandExecutor, CommandSpec, SystemCommandExecutor};
///
/// let command = CommandSpec {
///     program: Utf8PathBuf::from("./gradlew"),
///     args: vec!["--version".to_owned()],
///     current_dir: Utf8PathBuf::from("."),
///     env: Vec::new(),
/// };
/// let status = SystemCommandExecutor.run(&command)?;
/// assert!(status.success());
/// # Ok::<(), verification_updater::error::UpdaterError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, command: &CommandSpec) -> Result<ExitStatus> {
        Command::new(&command.program)
            .args(&command.args)
            .current_dir(&command.current_dir)
            .envs(command.env.iter().map(|(key, value)| (key, value)))
            .status()
            .map_err(|source| UpdaterError::Spawn {
                program: command.program.to_string(),
                source,
            })
    }
}

/// Filename of the Gradle wrapper script for the host platform.
#[must_use]
pub const fn wrapper_name() -> &'static str {
    if cfg!(windows) { "gradlew.bat" } else { "gradlew" }
}

/// The Gradle invocation that regenerates verification metadata.
#[derive(Debug, Clone, Copy)]
pub struct GradleInvocation<'a> {
    /// Project root containing the wrapper script.
    pub project_root: &'a Utf8Path,
    /// Tasks whose dependencies must be covered.
    pub tasks: &'a [String],
    /// Tasks excluded with `-x`.
    pub excluded_tasks: &'a [String],
}

impl GradleInvocation<'_> {
    /// Build the wrapper command using `gradle_home` as `GRADLE_USER_HOME`.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use verification_updater::gradle::GradleInvocation;
    ///
    /// let tasks = vec!["build".to_owned()];
    /// let invocation = GradleInvocation {
    ///     project_root: Utf8Path::new("/work/app"),
    ///     tasks: &tasks,
    ///     excluded_tasks: &[],
    /// };
    /// let command = invocation.command(Utf8Path::new("/tmp/gradle-home"));
    /// assert_eq!(
    ///     command.args,
    ///     ["--write-verification-metadata", "sha512", "--no-daemon", "build"],
    /// );
    /// ```
    #[must_use]
    pub fn command(&self, gradle_home: &Utf8Path) -> CommandSpec {
        let mut args = vec![
            "--write-verification-metadata".to_owned(),
            CHECKSUM_ALGORITHM.to_owned(),
            "--no-daemon".to_owned(),
        ];
        args.extend(self.tasks.iter().cloned());
        for task in self.excluded_tasks {
            args.push("-x".to_owned());
            args.push(task.clone());
        }

        CommandSpec {
            program: self.project_root.join(wrapper_name()),
            args,
            current_dir: self.project_root.to_owned(),
            env: vec![(GRADLE_USER_HOME.to_owned(), gradle_home.to_string())],
        }
    }
}

/// Run Gradle with an isolated cache so it writes fresh verification
/// metadata.
///
/// # Errors
///
/// Returns [`UpdaterError::TempDir`] if the cache directory cannot be
/// created, [`UpdaterError::Spawn`] if the wrapper cannot be started, or
/// [`UpdaterError::GradleFailed`] on a non-zero exit.
pub fn generate_metadata(
    invocation: &GradleInvocation<'_>,
    executor: &dyn CommandExecutor,
) -> Result<()> {
    let gradle_home = tempfile::Builder::new()
        .prefix("gradle-home-")
        .tempdir()
        .map_err(|source| UpdaterError::TempDir { source })?;
    let home = Utf8Path::from_path(gradle_home.path()).ok_or_else(|| UpdaterError::NonUtf8Path {
        path: gradle_home.path().to_string_lossy().into_owned(),
    })?;

    let command = invocation.command(home);
    log::debug!("running {} {}", command.program, command.args.join(" "));
    let status = executor.run(&command)?;
    if !status.success() {
        return Err(UpdaterError::GradleFailed { status });
    }
    Ok(())
}
