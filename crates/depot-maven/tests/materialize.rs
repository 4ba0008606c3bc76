use std::path::PathBuf;

use depot_core::settings::{MavenSettings, Server};
use depot_maven::materialize::SettingsMaterializer;
use depot_maven::settings::settings_xml;
use tempfile::TempDir;

fn settings() -> MavenSettings {
    MavenSettings {
        local_repository: Some(PathBuf::from("/srv/m2")),
        servers: vec![Server {
            id: "releases".to_string(),
            username: Some("deployer".to_string()),
            password: Some("secret".to_string()),
        }],
        ..Default::default()
    }
}

#[test]
fn materialize_writes_serialized_settings() {
    let dir = TempDir::new().unwrap();
    let staged = SettingsMaterializer::in_dir(dir.path())
        .materialize(&settings())
        .unwrap();
    assert!(staged.path().starts_with(dir.path()));
    let content = std::fs::read_to_string(staged.path()).unwrap();
    assert_eq!(content, settings_xml(&settings()).unwrap());
    staged.release().unwrap();
}

#[test]
fn release_removes_the_file() {
    let dir = TempDir::new().unwrap();
    let staged = SettingsMaterializer::in_dir(dir.path())
        .materialize(&settings())
        .unwrap();
    let path = staged.path().to_path_buf();
    assert!(path.is_file());
    staged.release().unwrap();
    assert!(!path.exists());
}

#[test]
fn drop_removes_the_file() {
    let dir = TempDir::new().unwrap();
    let path = {
        let staged = SettingsMaterializer::in_dir(dir.path())
            .materialize(&settings())
            .unwrap();
        staged.path().to_path_buf()
    };
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn each_materialization_gets_a_fresh_file() {
    let dir = TempDir::new().unwrap();
    let materializer = SettingsMaterializer::in_dir(dir.path());
    let first = materializer.materialize(&settings()).unwrap();
    let second = materializer.materialize(&settings()).unwrap();
    assert_ne!(first.path(), second.path());
}

#[test]
fn missing_staging_dir_is_settings_error() {
    let dir = TempDir::new().unwrap();
    let err = SettingsMaterializer::in_dir(dir.path().join("absent"))
        .materialize(&settings())
        .unwrap_err();
    assert!(err.to_string().contains("Settings error"), "got: {err}");
}

#[test]
fn release_reports_file_removed_behind_its_back() {
    let dir = TempDir::new().unwrap();
    let staged = SettingsMaterializer::in_dir(dir.path())
        .materialize(&settings())
        .unwrap();
    std::fs::remove_file(staged.path()).unwrap();
    assert!(staged.release().is_err());
}

#[cfg(unix)]
#[test]
fn staged_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let staged = SettingsMaterializer::in_dir(dir.path())
        .materialize(&settings())
        .unwrap();
    let mode = std::fs::metadata(staged.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o077, 0);
}
