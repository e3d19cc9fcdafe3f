// tests/config_test.rs
use dist_publish::config::{load_config, Config, CONFIG_FILE};
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.registry.url, "https://registry.npmjs.org/");
    assert_eq!(config.staging.src, "dist");
    assert_eq!(config.staging.dest, ".publish");
    assert_eq!(config.git.tag_prefix, "v");
    assert_eq!(
        config.prepare.commands,
        vec!["npm run lint", "npm test", "npm run build"]
    );
}

#[test]
fn test_load_from_file() {
    let project = tempfile::tempdir().unwrap();
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[registry]
url = "https://npm.example.com/"
client = "pnpm"

[staging]
src = "build"
files = ["README.md", "CHANGELOG.md"]

[prepare]
commands = ["make check"]
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path()), project.path()).unwrap();
    assert_eq!(config.registry.url, "https://npm.example.com/");
    assert_eq!(config.registry.client, "pnpm");
    assert_eq!(config.staging.src, "build");
    assert_eq!(config.staging.dest, ".publish");
    assert_eq!(config.staging.files, vec!["README.md", "CHANGELOG.md"]);
    assert_eq!(config.prepare.commands, vec!["make check"]);
    assert_eq!(config.git.message, "chore: release v{version}");
}

#[test]
fn test_project_file_is_picked_up() {
    let project = tempfile::tempdir().unwrap();
    fs::write(
        project.path().join(CONFIG_FILE),
        "[git]\nmessage = \"release {version}\"\nmultiline = true\n",
    )
    .unwrap();

    let config = load_config(None, project.path()).unwrap();
    assert_eq!(config.git.message_for("2.0.0"), "release 2.0.0");
    assert!(config.git.multiline);
}

#[test]
fn test_explicit_path_wins_over_project_file() {
    let project = tempfile::tempdir().unwrap();
    fs::write(project.path().join(CONFIG_FILE), "[git]\ntag_prefix = \"p\"\n").unwrap();

    let mut explicit = NamedTempFile::new().unwrap();
    explicit.write_all(b"[git]\ntag_prefix = \"e\"\n").unwrap();
    explicit.flush().unwrap();

    let config = load_config(Some(explicit.path()), project.path()).unwrap();
    assert_eq!(config.git.tag_prefix, "e");
}

#[test]
fn test_invalid_file_reports_path() {
    let project = tempfile::tempdir().unwrap();
    let path = project.path().join(CONFIG_FILE);
    fs::write(&path, "[registry\nurl = 1").unwrap();

    let err = load_config(None, project.path()).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Configuration error"));
    assert!(message.contains(CONFIG_FILE));
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let project = tempfile::tempdir().unwrap();
    let missing = project.path().join("nope.toml");
    assert!(load_config(Some(&missing), project.path()).is_err());
}
