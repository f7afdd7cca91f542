//! Integration tests driving the compiled `opal` binary.

use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

/// Test context running the binary inside an isolated working directory.
struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn opal_cmd(&self) -> Command {
        let bin_path = env!("CARGO_BIN_EXE_opal");
        let mut cmd = Command::new(bin_path);
        cmd.current_dir(self.temp_dir.path());
        cmd
    }

    fn dest(&self) -> PathBuf {
        self.temp_dir.path().join("components")
    }
}

#[test]
fn test_help_command() {
    let ctx = TestContext::new();
    let output = ctx
        .opal_cmd()
        .arg("--help")
        .output()
        .expect("failed to run opal");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("install"));
}

#[test]
fn test_version_command() {
    let ctx = TestContext::new();
    let output = ctx
        .opal_cmd()
        .arg("--version")
        .output()
        .expect("failed to run opal");
    assert!(output.status.success());
}

#[test]
fn test_invalid_name_fails_with_a_message() {
    let ctx = TestContext::new();
    let output = ctx
        .opal_cmd()
        .args(["install", "emitter"])
        .output()
        .expect("failed to run opal install");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid component name"));
}

#[test]
fn test_missing_project_manifest_fails_gracefully() {
    let ctx = TestContext::new();
    let output = ctx
        .opal_cmd()
        .arg("install")
        .output()
        .expect("failed to run opal install");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("component.json"));
}

#[test]
fn test_install_single_component_end_to_end() {
    let mut server = mockito::Server::new();
    let _manifest = server
        .mock("GET", "/component/emitter/master/component.json")
        .with_status(200)
        .with_body(r#"{"name":"emitter","scripts":["index.js"]}"#)
        .create();
    let _js = server
        .mock("GET", "/component/emitter/master/index.js")
        .with_status(200)
        .with_body("module.exports = {};")
        .create();

    let ctx = TestContext::new();
    let output = ctx
        .opal_cmd()
        .args(["install", "component/emitter", "--remote", &server.url()])
        .output()
        .expect("failed to run opal install");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("install"));
    assert!(stdout.contains("complete"));

    let root = ctx.dest().join("component-emitter");
    assert_eq!(
        std::fs::read_to_string(root.join("index.js")).unwrap(),
        "module.exports = {};"
    );
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(root.join("component.json")).unwrap())
            .unwrap();
    assert_eq!(written["name"], "emitter");
}

#[test]
fn test_install_defaults_to_project_manifest() {
    let mut server = mockito::Server::new();
    let _tip = server
        .mock("GET", "/component/tip/master/component.json")
        .with_status(200)
        .with_body(r#"{"name":"tip"}"#)
        .create();
    let dev_mock = server
        .mock("GET", "/component/assert/master/component.json")
        .with_status(200)
        .with_body(r#"{"name":"assert"}"#)
        .expect(0)
        .create();

    let ctx = TestContext::new();
    std::fs::write(
        ctx.temp_dir.path().join("component.json"),
        r#"{
            "dependencies": {"component/tip": "*"},
            "development": {"component/assert": "*"}
        }"#,
    )
    .unwrap();

    let output = ctx
        .opal_cmd()
        .args(["install", "--remote", &server.url()])
        .output()
        .expect("failed to run opal install");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(ctx.dest().join("component-tip/component.json").exists());
    // Development dependencies stay out unless --dev is given.
    assert!(!ctx.dest().join("component-assert").exists());
    dev_mock.assert();
}

#[test]
fn test_install_dev_dependencies_with_flag() {
    let mut server = mockito::Server::new();
    let _tip = server
        .mock("GET", "/component/tip/master/component.json")
        .with_status(200)
        .with_body(r#"{"name":"tip"}"#)
        .create();
    let _assert = server
        .mock("GET", "/component/assert/master/component.json")
        .with_status(200)
        .with_body(r#"{"name":"assert"}"#)
        .create();

    let ctx = TestContext::new();
    std::fs::write(
        ctx.temp_dir.path().join("component.json"),
        r#"{
            "dependencies": {"component/tip": "*"},
            "development": {"component/assert": "*"}
        }"#,
    )
    .unwrap();

    let output = ctx
        .opal_cmd()
        .args(["install", "--dev", "--remote", &server.url()])
        .output()
        .expect("failed to run opal install");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(ctx.dest().join("component-tip/component.json").exists());
    assert!(ctx.dest().join("component-assert/component.json").exists());
}

#[test]
fn test_failing_root_does_not_abort_siblings() {
    let mut server = mockito::Server::new();
    let _good = server
        .mock("GET", "/component/good/master/component.json")
        .with_status(200)
        .with_body(r#"{"name":"good"}"#)
        .create();
    let _bad = server
        .mock("GET", "/component/bad/master/component.json")
        .with_status(500)
        .create();

    let ctx = TestContext::new();
    let output = ctx
        .opal_cmd()
        .args([
            "install",
            "component/good",
            "component/bad",
            "--remote",
            &server.url(),
        ])
        .output()
        .expect("failed to run opal install");

    // The run fails overall, but the healthy sibling still landed.
    assert!(!output.status.success());
    assert!(ctx.dest().join("component-good/component.json").exists());
    assert!(!ctx.dest().join("component-bad").exists());
}
