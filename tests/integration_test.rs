// tests/integration_test.rs
use std::fs;
use std::process::Command;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_dist-publish"))
}

#[test]
fn test_dist_publish_help() {
    let output = bin().arg("--help").output().expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("dist-publish"));
    assert!(stdout.contains("--dry-run"));
    assert!(stdout.contains("--no-cleanup"));
    assert!(stdout.contains("--type"));
}

#[test]
fn test_dist_publish_version() {
    let output = bin().arg("--version").output().expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("dist-publish "));
}

#[test]
fn test_missing_manifest_exits_non_zero() {
    let project = tempfile::tempdir().unwrap();
    let output = bin()
        .args(["--dry-run", "--silent", "--cwd"])
        .arg(project.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("package.json"));
}

#[test]
fn test_invalid_release_type_rejected() {
    let project = tempfile::tempdir().unwrap();
    let output = bin()
        .args(["--dry-run", "--type", "be ta", "--cwd"])
        .arg(project.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_dry_run_end_to_end() {
    let project = tempfile::tempdir().unwrap();
    let root = project.path();
    fs::write(
        root.join("package.json"),
        r#"{"name":"demo","version":"0.4.1","exports":{".":"./dist/index.js"}}"#,
    )
    .unwrap();
    fs::create_dir_all(root.join("dist")).unwrap();
    fs::write(root.join("dist/index.js"), "export {}").unwrap();

    let output = bin()
        .args(["--dry-run", "--minor", "--no-cleanup", "--tag", "--cwd"])
        .arg(root)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0.5.0"));
    assert!(stdout.contains("git tag -a"));
    assert!(stdout.contains("npm publish --registry=https://registry.npmjs.org/"));

    let persisted = fs::read_to_string(root.join("package.json")).unwrap();
    assert!(persisted.contains("\"0.4.1\""));
    let staged = fs::read_to_string(root.join(".publish/package.json")).unwrap();
    assert!(staged.contains("\"0.5.0\""));
    assert!(staged.contains("./index.js"));
}
