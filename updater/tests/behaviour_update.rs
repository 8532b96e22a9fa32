//! Behaviour tests for the end-to-end update workflow.
//!
//! Library scenarios drive `run_update` with stub Gradle and download
//! collaborators. CLI scenarios invoke the `update-verification` binary in
//! modes that need neither Gradle nor the network.

use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::process::{Command, Output};
use tempfile::TempDir;
use verification_metadata::patch::{PatchSummary, patch_document};
use verification_metadata::{Document, UpdaterConfig};
use verification_updater::error::UpdaterError;
use verification_updater::gradle::GRADLE_USER_HOME;
use verification_updater::pipeline::{Collaborators, UpdateOptions, run_update};
use verification_updater::test_utils::{GENERATED_METADATA, StubExecutor, StubFetcher, digest};

const STALE_METADATA: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<stale/>\n";

#[derive(Default)]
struct UpdateWorld {
    // Keep temp_dir alive for the lifetime of the scenario.
    _temp_dir: Option<TempDir>,
    root: Option<Utf8PathBuf>,
    executor: Option<StubExecutor>,
    result: Option<Result<PatchSummary, UpdaterError>>,
    output: Option<Output>,
}

#[fixture]
fn world() -> UpdateWorld {
    UpdateWorld::default()
}

fn complete_fetcher() -> StubFetcher {
    StubFetcher::new()
        .with_digest("-osx.jar", digest('a'))
        .with_digest("-windows.jar", digest('b'))
}

fn root(world: &UpdateWorld) -> &Utf8PathBuf {
    world.root.as_ref().expect("project root set")
}

fn metadata_path(world: &UpdateWorld) -> Utf8PathBuf {
    UpdaterConfig::default().metadata_path_in(root(world))
}

fn create_project(world: &mut UpdateWorld) -> Utf8PathBuf {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).expect("UTF-8 temp dir");
    world._temp_dir = Some(temp_dir);
    world.root = Some(root.clone());
    root
}

fn write_metadata(world: &UpdateWorld, contents: &str) {
    let path = metadata_path(world);
    std::fs::create_dir_all(path.parent().expect("metadata has a parent"))
        .expect("create gradle dir");
    std::fs::write(&path, contents).expect("write metadata");
}

fn run_cli(world: &mut UpdateWorld, flag: &str) {
    let output = Command::new(env!("CARGO_BIN_EXE_update-verification"))
        .args(["--project-root", root(world).as_str(), flag])
        .output()
        .expect("failed to run update-verification");
    world.output = Some(output);
}

fn cli_stderr(world: &UpdateWorld) -> String {
    let output = world.output.as_ref().expect("CLI was run");
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[given("a project with stale verification metadata")]
fn given_stale_project(world: &mut UpdateWorld) {
    create_project(world);
    write_metadata(world, STALE_METADATA);
}

#[given("a project with complete verification metadata")]
fn given_complete_project(world: &mut UpdateWorld) {
    create_project(world);
    let mut document = Document::parse(GENERATED_METADATA).expect("fixture parses");
    patch_document(&mut document, &UpdaterConfig::default(), &complete_fetcher())
        .expect("fixture patches");
    write_metadata(world, "");
    document.save(&metadata_path(world)).expect("save metadata");
}

#[given("a project root that does not exist")]
fn given_missing_root(world: &mut UpdateWorld) {
    let root = create_project(world);
    world.root = Some(root.join("missing"));
}

#[given("a Gradle wrapper that writes fresh metadata")]
fn given_writing_wrapper(world: &mut UpdateWorld) {
    world.executor = Some(StubExecutor::writing(&metadata_path(world), GENERATED_METADATA));
}

#[given("a Gradle wrapper that exits with status {code:i32}")]
fn given_failing_wrapper(world: &mut UpdateWorld, code: i32) {
    world.executor = Some(StubExecutor::failing(code));
}

#[when("the update runs")]
fn when_update_runs(world: &mut UpdateWorld) {
    let root = root(world).clone();
    let metadata = metadata_path(world);
    let executor = world.executor.as_ref().expect("executor configured");
    let fetcher = complete_fetcher();
    let options = UpdateOptions {
        project_root: &root,
        metadata_path: &metadata,
        skip_build: false,
        quiet: true,
    };
    let collaborators = Collaborators {
        executor,
        fetcher: &fetcher,
    };
    let result = run_update(
        &UpdaterConfig::default(),
        &options,
        &collaborators,
        &mut Vec::new(),
    );
    world.result = Some(result);
}

#[when("the updater CLI is run with dry-run")]
fn when_cli_dry_run(world: &mut UpdateWorld) {
    run_cli(world, "--dry-run");
}

#[when("the updater CLI is run with skip-build")]
fn when_cli_skip_build(world: &mut UpdateWorld) {
    run_cli(world, "--skip-build");
}

#[then("the update succeeds")]
fn then_update_succeeds(world: &mut UpdateWorld) {
    let result = world.result.as_ref().expect("update ran");
    assert!(result.is_ok(), "update failed: {result:?}");
}

#[then("the metadata lists {count:usize} platform jars")]
fn then_metadata_lists_platform_jars(world: &mut UpdateWorld, count: usize) {
    let document = Document::load(&metadata_path(world)).expect("metadata loads");
    let component = document
        .root()
        .find_child("components")
        .and_then(|components| components.find_child("component"))
        .expect("component present");
    let jars = component
        .child_elements()
        .filter_map(|artifact| artifact.attribute("name"))
        .filter(|name| name.ends_with(".jar"))
        .count();
    assert_eq!(jars, count);
}

#[then("Gradle ran once with an isolated user home")]
fn then_gradle_ran_isolated(world: &mut UpdateWorld) {
    let calls = world.executor.as_ref().expect("executor configured").calls();
    assert_eq!(calls.len(), 1);
    let call = calls.first().expect("one call");
    let home = Utf8PathBuf::from(call.env_var(GRADLE_USER_HOME).expect("home set"));
    assert!(!home.starts_with(root(world)));
    assert!(!home.exists(), "isolated home should be removed");
    assert!(
        call.args
            .windows(2)
            .any(|pair| pair == ["--write-verification-metadata", "sha512"])
    );
}

#[then("the update fails because Gradle failed")]
fn then_update_fails_gradle(world: &mut UpdateWorld) {
    let result = world.result.as_ref().expect("update ran");
    assert!(
        matches!(result, Err(UpdaterError::GradleFailed { .. })),
        "unexpected result: {result:?}"
    );
}

#[then("no metadata file remains")]
fn then_no_metadata(world: &mut UpdateWorld) {
    assert!(!metadata_path(world).exists());
}

#[then("the CLI exits with status {code:i32}")]
fn then_cli_exits_with(world: &mut UpdateWorld, code: i32) {
    let output = world.output.as_ref().expect("CLI was run");
    assert_eq!(
        output.status.code(),
        Some(code),
        "stderr: {}",
        cli_stderr(world)
    );
}

#[then("the CLI output mentions the Gradle tasks")]
fn then_cli_mentions_tasks(world: &mut UpdateWorld) {
    let stderr = cli_stderr(world);
    assert!(
        stderr.contains("Gradle tasks: build connectedDebugAndroidTest"),
        "stderr: {stderr}"
    );
}

#[then("the stale metadata is untouched")]
fn then_stale_untouched(world: &mut UpdateWorld) {
    let contents = std::fs::read_to_string(metadata_path(world)).expect("metadata still present");
    assert_eq!(contents, STALE_METADATA);
}

#[then("the CLI output reports {count:usize} platform artifacts")]
fn then_cli_reports_artifacts(world: &mut UpdateWorld, count: usize) {
    let stderr = cli_stderr(world);
    assert!(
        stderr.contains(&format!("{count} platform artifacts")),
        "stderr: {stderr}"
    );
}

#[then("the CLI output says the project root is not a directory")]
fn then_cli_reports_missing_root(world: &mut UpdateWorld) {
    let stderr = cli_stderr(world);
    assert!(stderr.contains("is not a directory"), "stderr: {stderr}");
}

#[scenario(
    path = "tests/features/update_workflow.feature",
    name = "Gradle output is regenerated and patched"
)]
fn scenario_regenerate_and_patch(world: UpdateWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/update_workflow.feature",
    name = "A failing Gradle build stops the update"
)]
fn scenario_gradle_failure(world: UpdateWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/update_workflow.feature",
    name = "Dry run reports settings without touching the project"
)]
fn scenario_dry_run(world: UpdateWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/update_workflow.feature",
    name = "Skip-build patches complete metadata offline"
)]
fn scenario_skip_build_offline(world: UpdateWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/update_workflow.feature",
    name = "A missing project root is reported"
)]
fn scenario_missing_root(world: UpdateWorld) {
    let _ = world;
}
