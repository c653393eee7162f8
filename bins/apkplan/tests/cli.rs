//! End-to-end tests for the apkplan binary
//!
//! Every test runs inside its own temp directory so no `.apkplan.toml` from
//! the developer's checkout is picked up.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const AGENDA_APP: &str = "\
# Flutter shell for the agenda app
applicationId=com.agendaapp.agenda_app
minSdk=21
targetSdk=34
compileSdk=34
desugaringEnabled=true
";

fn apkplan(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("apkplan").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

fn workspace(file: &str, content: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(file), content).unwrap();
    dir
}

// =============================================================================
// check
// =============================================================================

#[test]
fn check_accepts_valid_input() {
    let dir = workspace("app.properties", AGENDA_APP);
    apkplan(&dir)
        .args(["check", "app.properties"])
        .assert()
        .success()
        .stdout(predicate::str::contains("com.agendaapp.agenda_app is valid"));
}

#[test]
fn check_reports_desugaring_rule() {
    let dir = workspace("app.properties", &AGENDA_APP.replace("minSdk=21", "minSdk=16"));
    apkplan(&dir)
        .args(["check", "app.properties"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("[desugaring-min-sdk]"));
}

#[test]
fn check_json_lists_every_problem() {
    let dir = workspace(
        "app.properties",
        &format!("{}signingConfigRef=production\n", AGENDA_APP.replace("minSdk=21", "minSdk=16")),
    );
    let output = apkplan(&dir)
        .args(["check", "app.properties", "--json"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], false);
    let codes: Vec<&str> = report["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["desugaring-min-sdk", "signing-reference"]);
}

#[test]
fn check_unknown_key_is_config_error_with_hint() {
    let dir = workspace("app.properties", &format!("{AGENDA_APP}minSdkk=23\n"));
    apkplan(&dir)
        .args(["check", "app.properties"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("E3005"))
        .stderr(predicate::str::contains("minSdkk"))
        .stderr(predicate::str::contains("hint:"));
}

#[test]
fn check_missing_input_file() {
    let dir = TempDir::new().unwrap();
    apkplan(&dir)
        .args(["check", "missing.properties"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File not found"));
}

// =============================================================================
// plan
// =============================================================================

#[test]
fn plan_lists_directives() {
    let dir = workspace("app.properties", AGENDA_APP);
    apkplan(&dir)
        .args(["plan", "app.properties"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "enable library desugaring with com.android.tools:desugar_jdk_libs:2.1.4",
        ))
        .stdout(predicate::str::contains(
            "bind signing profile debug to release variant",
        ));
}

#[test]
fn plan_json_is_tagged() {
    let dir = workspace("app.properties", AGENDA_APP);
    let output = apkplan(&dir)
        .args(["plan", "app.properties", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let directives = plan["directives"].as_array().unwrap();
    assert_eq!(directives[0]["directive"], "set_namespace");
    assert!(directives
        .iter()
        .any(|d| d["directive"] == "enable_library_desugaring"));
}

#[test]
fn plan_unregistered_signing_profile() {
    let dir = workspace(
        "app.properties",
        &format!("{AGENDA_APP}signingConfigRef=production\n"),
    );
    apkplan(&dir)
        .args(["plan", "app.properties"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("'production' is not registered"));
}

#[test]
fn plan_json_error_report() {
    let dir = workspace("app.properties", "minSdk=21\n");
    let output = apkplan(&dir)
        .args(["plan", "app.properties", "--json"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["code_str"], "E3006");
}

#[test]
fn set_override_replaces_alias_spelling() {
    let dir = workspace("app.properties", AGENDA_APP);
    apkplan(&dir)
        .args(["plan", "app.properties", "--set", "minSdkVersion=16"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("desugaring-min-sdk"));
}

#[test]
fn set_java_shorthand_overrides_explicit_levels() {
    let dir = workspace(
        "app.properties",
        &format!("{AGENDA_APP}sourceCompatibility=17\ntargetCompatibility=17\n"),
    );
    apkplan(&dir)
        .args(["plan", "app.properties", "--set", "javaLanguageVersion=11"])
        .assert()
        .success()
        .stdout(predicate::str::contains("set Java source 11, target 11"));
}

#[test]
fn set_override_requires_key_value() {
    let dir = workspace("app.properties", AGENDA_APP);
    apkplan(&dir)
        .args(["plan", "app.properties", "--set", "minSdk"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected KEY=VALUE"));
}

// =============================================================================
// Tool configuration
// =============================================================================

#[test]
fn tool_config_registers_signing_profile() {
    let dir = workspace(
        "app.properties",
        &format!("{AGENDA_APP}signingConfigRef=upload\n"),
    );
    std::fs::write(
        dir.path().join(".apkplan.toml"),
        "[signing.profiles.upload]\nstore_file = \"upload-keystore.jks\"\nkey_alias = \"upload\"\n",
    )
    .unwrap();

    apkplan(&dir)
        .args(["render", "app.properties"])
        .assert()
        .success()
        .stdout(predicate::str::contains("create(\"upload\")"))
        .stdout(predicate::str::contains("keyAlias = \"upload\""));
}

#[test]
fn tool_config_defaults_apply() {
    let dir = workspace("app.properties", "applicationId=com.example.app\n");
    std::fs::write(
        dir.path().join("apkplan.toml"),
        "[defaults]\nmin_sdk = 24\ndesugar_library_version = \"2.0.3\"\n",
    )
    .unwrap();

    apkplan(&dir)
        .args(["plan", "app.properties"])
        .assert()
        .success()
        .stdout(predicate::str::contains("set minimum API 24"));
}

#[test]
fn explicit_missing_tool_config_fails() {
    let dir = workspace("app.properties", AGENDA_APP);
    apkplan(&dir)
        .args(["--config", "nope.toml", "check", "app.properties"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Configuration file not found"));
}

// =============================================================================
// render & schema
// =============================================================================

#[test]
fn render_writes_output_file() {
    let dir = workspace("app.toml", "applicationId = \"com.example.app\"\nminSdk = 23\n");
    apkplan(&dir)
        .args(["render", "app.toml", "--output", "build.gradle.kts"])
        .assert()
        .success();

    let script = std::fs::read_to_string(dir.path().join("build.gradle.kts")).unwrap();
    assert!(script.starts_with("plugins {\n"));
    assert!(script.contains("        minSdk = 23\n"));
}

#[test]
fn schema_lists_keys() {
    let dir = TempDir::new().unwrap();
    apkplan(&dir)
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("applicationId"))
        .stdout(predicate::str::contains("(required)"));
}

#[test]
fn schema_json() {
    let dir = TempDir::new().unwrap();
    let output = apkplan(&dir).args(["schema", "--json"]).output().unwrap();
    let fields: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(fields
        .as_array()
        .unwrap()
        .iter()
        .any(|f| f["key"] == "desugaringEnabled"));
}
