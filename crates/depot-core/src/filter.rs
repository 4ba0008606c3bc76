//! Publish filters and the POM templates paired with them.
//!
//! A filter decides which registered artifacts take part in a publication.
//! Each named filter owns its own [`PomTemplate`]; the unnamed default pair
//! applies when no named filter has been added.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use depot_util::errors::DepotError;

use crate::artifact::ArtifactIdentity;
use crate::configuration::Configuration;

/// Name reserved for the default filter/POM pair.
pub const DEFAULT_FILTER_NAME: &str = "default";

/// Predicate selecting the artifacts a publication should carry.
///
/// During grouping `configurations` holds exactly the configuration the
/// artifact is being grouped under.
pub trait PublishFilter: Send + Sync {
    fn accept(&self, configurations: &[Configuration], artifact: &ArtifactIdentity) -> bool;
}

impl<F> PublishFilter for F
where
    F: Fn(&[Configuration], &ArtifactIdentity) -> bool + Send + Sync,
{
    fn accept(&self, configurations: &[Configuration], artifact: &ArtifactIdentity) -> bool {
        self(configurations, artifact)
    }
}

/// Filter that accepts every artifact.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl PublishFilter for AcceptAll {
    fn accept(&self, _configurations: &[Configuration], _artifact: &ArtifactIdentity) -> bool {
        true
    }
}

pub type SharedFilter = Arc<dyn PublishFilter>;
pub type SharedPom = Arc<PomTemplate>;

/// Project-level values a POM is rendered from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomTemplate {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Holder of the active filter, the active POM template and named pairs.
///
/// The publish coordinator exposes every method here as a pass-through.
pub trait PomFilterContainer: Send {
    fn get_filter(&self) -> SharedFilter;

    fn set_filter(&mut self, filter: SharedFilter);

    fn get_pom(&self) -> SharedPom;

    fn set_pom(&mut self, pom: SharedPom);

    /// Register a named filter and return the fresh POM template paired with it.
    fn add_filter(&mut self, name: &str, filter: SharedFilter) -> miette::Result<SharedPom>;

    fn filter(&self, name: &str) -> Option<SharedFilter>;

    fn pom(&self, name: &str) -> Option<SharedPom>;

    /// Filters consulted during grouping: the named ones, or the default
    /// filter when none were added.
    fn active_filters(&self) -> Vec<SharedFilter>;
}

struct NamedPair {
    filter: SharedFilter,
    pom: SharedPom,
}

/// The standard in-memory [`PomFilterContainer`].
pub struct DefaultPomFilterContainer {
    default_filter: SharedFilter,
    default_pom: SharedPom,
    named: BTreeMap<String, NamedPair>,
}

impl DefaultPomFilterContainer {
    pub fn new() -> Self {
        Self {
            default_filter: Arc::new(AcceptAll),
            default_pom: Arc::new(PomTemplate::default()),
            named: BTreeMap::new(),
        }
    }

    pub fn filter_names(&self) -> impl Iterator<Item = &str> {
        self.named.keys().map(String::as_str)
    }
}

impl Default for DefaultPomFilterContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DefaultPomFilterContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultPomFilterContainer")
            .field("default_pom", &self.default_pom)
            .field("named", &self.named.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl PomFilterContainer for DefaultPomFilterContainer {
    fn get_filter(&self) -> SharedFilter {
        Arc::clone(&self.default_filter)
    }

    fn set_filter(&mut self, filter: SharedFilter) {
        self.default_filter = filter;
    }

    fn get_pom(&self) -> SharedPom {
        Arc::clone(&self.default_pom)
    }

    fn set_pom(&mut self, pom: SharedPom) {
        self.default_pom = pom;
    }

    fn add_filter(&mut self, name: &str, filter: SharedFilter) -> miette::Result<SharedPom> {
        if name == DEFAULT_FILTER_NAME {
            return Err(DepotError::Config {
                message: format!("filter name '{DEFAULT_FILTER_NAME}' is reserved"),
            }
            .into());
        }
        let pom = Arc::new(PomTemplate::default());
        self.named.insert(
            name.to_string(),
            NamedPair {
                filter,
                pom: Arc::clone(&pom),
            },
        );
        Ok(pom)
    }

    fn filter(&self, name: &str) -> Option<SharedFilter> {
        if name == DEFAULT_FILTER_NAME {
            return Some(self.get_filter());
        }
        self.named.get(name).map(|pair| Arc::clone(&pair.filter))
    }

    fn pom(&self, name: &str) -> Option<SharedPom> {
        if name == DEFAULT_FILTER_NAME {
            return Some(self.get_pom());
        }
        self.named.get(name).map(|pair| Arc::clone(&pair.pom))
    }

    fn active_filters(&self) -> Vec<SharedFilter> {
        if self.named.is_empty() {
            vec![self.get_filter()]
        } else {
            self.named
                .values()
                .map(|pair| Arc::clone(&pair.filter))
                .collect()
        }
    }
}
