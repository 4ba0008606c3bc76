use std::sync::Arc;

use depot_core::artifact::ArtifactIdentity;
use depot_core::configuration::Configuration;
use depot_core::filter::{
    AcceptAll, DefaultPomFilterContainer, PomFilterContainer, PomTemplate, PublishFilter,
    SharedFilter, DEFAULT_FILTER_NAME,
};

fn jar() -> ArtifactIdentity {
    ArtifactIdentity::new("org", "lib", "1.0", "jar", "jar")
}

#[test]
fn test_default_container_accepts_everything() {
    let container = DefaultPomFilterContainer::new();
    let filters = container.active_filters();
    assert_eq!(filters.len(), 1);
    assert!(filters[0].accept(&[], &jar()));
}

#[test]
fn test_set_filter_replaces_default() {
    let mut container = DefaultPomFilterContainer::new();
    let reject: SharedFilter = Arc::new(|_: &[Configuration], _: &ArtifactIdentity| false);
    container.set_filter(Arc::clone(&reject));
    assert!(Arc::ptr_eq(&container.get_filter(), &reject));
    assert!(!container.active_filters()[0].accept(&[], &jar()));
}

#[test]
fn test_set_pom_replaces_default() {
    let mut container = DefaultPomFilterContainer::new();
    let pom = Arc::new(PomTemplate {
        group_id: Some("org".to_string()),
        ..Default::default()
    });
    container.set_pom(Arc::clone(&pom));
    assert!(Arc::ptr_eq(&container.get_pom(), &pom));
    assert!(Arc::ptr_eq(&container.pom(DEFAULT_FILTER_NAME).unwrap(), &pom));
}

#[test]
fn test_add_filter_returns_its_pom() {
    let mut container = DefaultPomFilterContainer::new();
    let filter: SharedFilter = Arc::new(AcceptAll);
    let pom = container.add_filter("api", Arc::clone(&filter)).unwrap();
    assert!(Arc::ptr_eq(&container.pom("api").unwrap(), &pom));
    assert!(Arc::ptr_eq(&container.filter("api").unwrap(), &filter));
    assert_eq!(container.filter_names().collect::<Vec<_>>(), vec!["api"]);
}

#[test]
fn test_add_filter_rejects_default_name() {
    let mut container = DefaultPomFilterContainer::new();
    assert!(container
        .add_filter(DEFAULT_FILTER_NAME, Arc::new(AcceptAll))
        .is_err());
}

#[test]
fn test_unknown_filter_name_is_none() {
    let container = DefaultPomFilterContainer::new();
    assert!(container.filter("missing").is_none());
    assert!(container.pom("missing").is_none());
}

#[test]
fn test_named_filters_replace_default_when_active() {
    let mut container = DefaultPomFilterContainer::new();
    container
        .add_filter(
            "sources-only",
            Arc::new(|_: &[Configuration], a: &ArtifactIdentity| a.is_classified()),
        )
        .unwrap();
    let filters = container.active_filters();
    assert_eq!(filters.len(), 1);
    assert!(!filters[0].accept(&[], &jar()));
    assert!(filters[0].accept(&[], &jar().with_classifier("sources")));
}

#[test]
fn test_filter_sees_configurations() {
    let conf = Configuration::new("archives").with_artifact(jar());
    let in_archives = |confs: &[Configuration], a: &ArtifactIdentity| {
        confs.iter().any(|c| c.id.as_str() == "archives" && c.contains(a))
    };
    assert!(in_archives.accept(&[conf], &jar()));
}
