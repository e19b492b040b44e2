mod common;

use assert_cmd::Command;
use common::{Project, EMIT_COMPLETE, EMIT_NO_CSS};
use predicates::str::contains;
use serde_json::Value;
use std::fs;

fn cmd() -> Command {
    Command::cargo_bin("webui-builder").unwrap()
}

#[test]
fn build_without_subcommand() {
    let project = Project::new(EMIT_COMPLETE);

    cmd()
        .arg("--webui-dir")
        .arg(&project.webui)
        .assert()
        .success()
        .stdout(contains("all required artifacts present"));

    assert!(project.webroot.join("index.html").exists());
    assert!(project.webroot.join("fonts/MaterialIcons-Regular.ttf").exists());
}

#[test]
fn missing_category_exits_non_zero() {
    let project = Project::new(EMIT_NO_CSS);

    cmd()
        .args(["build", "--skip-install", "--webui-dir"])
        .arg(&project.webui)
        .assert()
        .code(1)
        .stderr(contains("missing CSS files"));

    assert!(!project.webui.join(".installed").exists());
}

#[test]
fn warn_policy_exits_zero() {
    let project = Project::new(EMIT_NO_CSS);

    cmd()
        .args(["build", "--on-missing", "warn", "--webui-dir"])
        .arg(&project.webui)
        .assert()
        .success()
        .stdout(contains("missing CSS files"));
}

#[test]
fn bundler_failure_surfaces_output() {
    let project = Project::new("echo parcel exploded >&2; exit 2");

    cmd()
        .args(["build", "--webui-dir"])
        .arg(&project.webui)
        .assert()
        .code(1)
        .stderr(contains("parcel exploded"));
}

#[test]
fn verify_writes_report() {
    let project = Project::new("true");
    for file in ["index.html", "a.js", "a.css", "MaterialIcons-Regular.otf"] {
        fs::write(project.webroot.join(file), "x").unwrap();
    }
    let report = project.webui.join("report.json");

    cmd()
        .args(["verify", "--webui-dir"])
        .arg(&project.webui)
        .arg("--report")
        .arg(&report)
        .assert()
        .success();

    let json: Value = serde_json::from_slice(&fs::read(&report).unwrap()).unwrap();
    assert_eq!(json["passed"], true);
    assert_eq!(json["total_files"], 5);
    assert_eq!(json["counts"]["font"], 1);
}

#[test]
fn clean_keeps_target() {
    let project = Project::new("true");
    fs::create_dir_all(project.webui.join(".parcel-cache")).unwrap();
    fs::create_dir_all(project.webui.join("dist")).unwrap();

    cmd()
        .args(["clean", "--webui-dir"])
        .arg(&project.webui)
        .assert()
        .success();

    assert!(!project.webui.join(".parcel-cache").exists());
    assert!(!project.webui.join("dist").exists());
    assert!(project.webroot.join(".gitkeep").exists());
}

#[test]
fn target_dir_resolving_to_webui_is_rejected() {
    let project = Project::new(EMIT_COMPLETE);
    fs::create_dir_all(project.webui.join("src")).unwrap();
    fs::write(project.webui.join("src/app.ts"), "export {}").unwrap();

    cmd()
        .current_dir(&project.webui)
        .args(["build", "--webui-dir", ".", "--target-dir", "../webui"])
        .assert()
        .code(1)
        .stderr(contains("must not be the WebUI directory"));

    assert!(project.webui.join("src/app.ts").exists());
    assert!(project.webui.join("webui-build.toml").exists());
}
