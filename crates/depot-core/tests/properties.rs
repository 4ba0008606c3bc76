use depot_core::properties::{interpolate, load_env_file, parse_env};
use std::collections::BTreeMap;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn load_env_file_with_comments_and_blank_lines() {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(
        tmp,
        "# credentials\n\
         NEXUS_USER=deployer\n\
         \n\
         NEXUS_PASS = hunter2\n"
    )
    .unwrap();
    tmp.flush().unwrap();

    let env = load_env_file(tmp.path()).unwrap();
    assert_eq!(env.get("NEXUS_USER"), Some(&"deployer".to_string()));
    assert_eq!(env.get("NEXUS_PASS"), Some(&"hunter2".to_string()));
    assert_eq!(env.len(), 2);
}

#[test]
fn load_env_file_nonexistent_path_returns_empty_map() {
    let env = load_env_file(std::path::Path::new("/nonexistent/.depot.env")).unwrap();
    assert!(env.is_empty());
}

#[test]
fn parse_env_strips_export_and_quotes() {
    let env = parse_env("export TOKEN=\"abc def\"\nOTHER='x=y'\n");
    assert_eq!(env["TOKEN"], "abc def");
    assert_eq!(env["OTHER"], "x=y");
}

#[test]
fn parse_env_ignores_lines_without_equals() {
    let env = parse_env("JUST_A_WORD\nA=1\n");
    assert_eq!(env.len(), 1);
}

#[test]
fn interpolate_replaces_env_refs() {
    let mut env = BTreeMap::new();
    env.insert("USER_A".to_string(), "alice".to_string());
    env.insert("PASS_A".to_string(), "pw".to_string());
    assert_eq!(
        interpolate("${env:USER_A}:${env:PASS_A}@host", &env),
        "alice:pw@host"
    );
}

#[test]
fn interpolate_unknown_variable_is_empty() {
    let env = BTreeMap::new();
    assert_eq!(
        interpolate("x${env:DEPOT_SURELY_UNSET_VARIABLE_42}y", &env),
        "xy"
    );
}

#[test]
fn interpolate_unterminated_reference_is_kept() {
    let env = BTreeMap::new();
    assert_eq!(interpolate("abc ${env:OPEN", &env), "abc ${env:OPEN");
}

#[test]
fn interpolate_without_refs_is_identity() {
    let env = BTreeMap::new();
    assert_eq!(interpolate("plain", &env), "plain");
}
