//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CAPTURED: &[&str] = &[
    "SCRAM_ARCH",
    "CMSSW_BASE",
    "CMSSW_RELEASE_BASE",
    "CMSSW_VERSION",
    "CMSSW_GIT_HASH",
    "LOCALRT",
    "CMS_PATH",
];

fn extract_cmd(cwd: &Path, out_root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cmssw-extract"));
    cmd.current_dir(cwd);
    for name in CAPTURED {
        cmd.env_remove(name);
    }
    cmd.env_remove("RUST_LOG");
    cmd.args(["extract", "--output-root", out_root.to_str().expect("utf8 path")]);
    cmd
}

fn write_project(dir: &Path, pset: &str) -> PathBuf {
    let config = dir.join("crab_config.yaml");
    fs::write(
        &config,
        "general:\n  request_name: test_request\njob_type:\n  plugin_name: Analysis\n  pset_name: pset.yaml\n",
    )
    .expect("write config");
    fs::write(dir.join("pset.yaml"), pset).expect("write pset");
    config
}

fn workspace_from_stdout(stdout: &[u8]) -> PathBuf {
    let text = String::from_utf8(stdout.to_vec()).expect("utf8 stdout");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 1, "stdout should hold only the workspace path: {text:?}");
    PathBuf::from(lines[0])
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).expect("read")).expect("json")
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cmssw-extract"));
    cmd.arg("--version");
    cmd.assert().success().stdout(predicate::str::contains("cmssw-extract"));
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cmssw-extract"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Capture CMSSW environment"))
        .stdout(predicate::str::contains("extract"));
}

#[test]
fn test_extract_writes_three_files() {
    let project = TempDir::new().expect("project");
    let out = TempDir::new().expect("out");
    write_project(
        project.path(),
        "source:\n  type: PoolSource\n  file_names: [\"file:input.root\"]\noutput_modules:\n  out:\n    type: PoolOutputModule\n    file_name: file:output.root\n",
    );

    let assert = extract_cmd(project.path(), out.path()).assert().success();
    let workspace = workspace_from_stdout(&assert.get_output().stdout);

    assert!(workspace.starts_with(out.path()));
    let mut names: Vec<String> = fs::read_dir(&workspace)
        .expect("read workspace")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["cmssw-env.json", "pset-expanded.json", "pset-info.json"]);

    let info = read_json(&workspace.join("pset-info.json"));
    assert_eq!(info["outfiles"], serde_json::json!([["output.root"], []]));
    assert_eq!(info["lheinfo"], serde_json::json!([false, 0]));

    let expanded = read_json(&workspace.join("pset-expanded.json"));
    assert_eq!(expanded["source"]["type"], "PoolSource");
}

#[test]
fn test_extract_captures_environment() {
    let project = TempDir::new().expect("project");
    let out = TempDir::new().expect("out");
    write_project(project.path(), "name: gen\n");

    let assert = extract_cmd(project.path(), out.path())
        .env("SCRAM_ARCH", "el9_amd64_gcc12")
        .env("CMSSW_VERSION", "CMSSW_14_0_0")
        .assert()
        .success();
    let workspace = workspace_from_stdout(&assert.get_output().stdout);

    let env = read_json(&workspace.join("cmssw-env.json"));
    assert_eq!(env["SCRAM_ARCH"], "el9_amd64_gcc12");
    assert_eq!(env["CMSSW_VERSION"], "CMSSW_14_0_0");
    assert_eq!(env["CMSSW_BASE"], "", "unset variables are kept as empty entries");
    assert_eq!(env.as_object().expect("object").len(), CAPTURED.len());
}

#[test]
fn test_extract_lhe_source_and_tfile_outputs() {
    let project = TempDir::new().expect("project");
    let out = TempDir::new().expect("out");
    fs::write(project.path().join("common.yaml"), "services:\n  TFileService:\n    file_name: histos.root\n")
        .expect("write include");
    write_project(
        project.path(),
        "include: [common.yaml]\nvars:\n  nevents: 100\nsource:\n  type: LHESource\nmax_events:\n  input: ${nevents}\noutput_modules:\n  lhe:\n    file_name: gen.root\n",
    );

    let assert = extract_cmd(project.path(), out.path()).assert().success();
    let workspace = workspace_from_stdout(&assert.get_output().stdout);

    let info = read_json(&workspace.join("pset-info.json"));
    assert_eq!(info["outfiles"], serde_json::json!([["gen.root"], ["histos.root"]]));
    assert_eq!(info["lheinfo"], serde_json::json!([true, 100]));
}

#[test]
fn test_missing_config_exits_one() {
    let project = TempDir::new().expect("project");
    let out = TempDir::new().expect("out");

    extract_cmd(project.path(), out.path())
        .args(["--config", "nowhere.yaml"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("nowhere.yaml"));
}

#[test]
fn test_default_config_name_is_used() {
    let project = TempDir::new().expect("project");
    let out = TempDir::new().expect("out");

    extract_cmd(project.path(), out.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("crab_config.yaml"));
}

#[test]
fn test_missing_pset_field_exits_one() {
    let project = TempDir::new().expect("project");
    let out = TempDir::new().expect("out");
    fs::write(project.path().join("crab_config.yaml"), "job_type:\n  plugin_name: Analysis\n")
        .expect("write config");

    extract_cmd(project.path(), out.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("job_type.pset_name"));
}

#[test]
fn test_invalid_config_syntax_exits_one() {
    let project = TempDir::new().expect("project");
    let out = TempDir::new().expect("out");
    fs::write(project.path().join("crab.toml"), "[job_type\npset_name = 1\n").expect("write");

    extract_cmd(project.path(), out.path())
        .args(["--config", "crab.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid configuration file"));
}

#[test]
fn test_unloadable_pset_exits_one_and_reports_workspace() {
    let project = TempDir::new().expect("project");
    let out = TempDir::new().expect("out");
    fs::write(project.path().join("crab_config.yaml"), "job_type:\n  pset_name: absent.yaml\n")
        .expect("write config");

    let assert = extract_cmd(project.path(), out.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load parameter-set"));
    let workspace = workspace_from_stdout(&assert.get_output().stdout);
    assert!(workspace.join("cmssw-env.json").is_file());
    assert!(!workspace.join("pset-info.json").exists());
}

#[test]
fn test_unexpected_failure_exits_two_and_reports_workspace() {
    let project = TempDir::new().expect("project");
    let out = TempDir::new().expect("out");
    write_project(project.path(), "output_modules:\n  out:\n    type: PoolOutputModule\n");

    let assert = extract_cmd(project.path(), out.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unexpected error"))
        .stderr(predicate::str::contains("Caused by"))
        .stderr(predicate::str::contains("file_name"));
    let workspace = workspace_from_stdout(&assert.get_output().stdout);
    assert!(workspace.is_dir(), "workspace is kept after an unexpected failure");
}

#[test]
fn test_pset_params_override_vars() {
    let project = TempDir::new().expect("project");
    let out = TempDir::new().expect("out");
    fs::write(
        project.path().join("crab_config.toml"),
        "[job_type]\npset_name = \"pset.yaml\"\npset_params = [\"tag=v2\"]\n",
    )
    .expect("write config");
    fs::write(
        project.path().join("pset.yaml"),
        "vars:\n  tag: v1\noutput_modules:\n  out:\n    file_name: out_${tag}.root\n",
    )
    .expect("write pset");

    let assert = extract_cmd(project.path(), out.path())
        .args(["--config", "crab_config.toml"])
        .assert()
        .success();
    let workspace = workspace_from_stdout(&assert.get_output().stdout);
    let info = read_json(&workspace.join("pset-info.json"));
    assert_eq!(info["outfiles"], serde_json::json!([["out_v2.root"], []]));
}

#[test]
fn test_log_file_receives_output() {
    let project = TempDir::new().expect("project");
    let out = TempDir::new().expect("out");
    write_project(project.path(), "name: gen\n");
    let log = project.path().join("extract.log");

    extract_cmd(project.path(), out.path())
        .args(["--verbose", "--log-file", log.to_str().expect("utf8 path")])
        .assert()
        .success();

    let contents = fs::read_to_string(&log).expect("read log");
    assert!(contents.contains("Expanded parameter-set digest"));
}

#[test]
fn test_rust_log_overrides_default_level() {
    let project = TempDir::new().expect("project");
    let out = TempDir::new().expect("out");
    write_project(project.path(), "name: gen\n");
    let log = project.path().join("extract.log");

    extract_cmd(project.path(), out.path())
        .env("RUST_LOG", "info")
        .args(["--log-file", log.to_str().expect("utf8 path")])
        .assert()
        .success();

    let contents = fs::read_to_string(&log).expect("read log");
    assert!(contents.contains("INFO"), "RUST_LOG=info should enable INFO lines: {contents}");
    assert!(contents.contains("Expanded parameter-set digest"));
}

#[test]
fn test_pset_name_with_surrounding_whitespace_is_trimmed() {
    let project = TempDir::new().expect("project");
    let out = TempDir::new().expect("out");
    write_project(project.path(), "output_modules:\n  out:\n    file_name: out.root\n");
    fs::write(
        project.path().join("crab_config.yaml"),
        "job_type:\n  pset_name: \"pset.yaml \"\n",
    )
    .expect("write config");

    let assert = extract_cmd(project.path(), out.path()).assert().success();
    let workspace = workspace_from_stdout(&assert.get_output().stdout);
    let info = read_json(&workspace.join("pset-info.json"));
    assert_eq!(info["outfiles"], serde_json::json!([["out.root"], []]));
}

#[cfg(unix)]
#[test]
fn test_non_utf8_environment_value_is_kept() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let project = TempDir::new().expect("project");
    let out = TempDir::new().expect("out");
    write_project(project.path(), "name: gen\n");

    let assert = extract_cmd(project.path(), out.path())
        .env("CMSSW_BASE", OsStr::from_bytes(b"/home/user/CMSSW_\xff"))
        .assert()
        .success();
    let workspace = workspace_from_stdout(&assert.get_output().stdout);

    let env = read_json(&workspace.join("cmssw-env.json"));
    assert_eq!(env["CMSSW_BASE"], "/home/user/CMSSW_\u{FFFD}");
}
