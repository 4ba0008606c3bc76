//! Build configurations and which artifacts belong to them.
//!
//! The publish transaction never decides which configurations are active;
//! it asks a [`ConfigurationMembership`] supplied by the surrounding build.

use std::collections::BTreeSet;
use std::fmt;

use crate::artifact::ArtifactIdentity;

/// Name of a build configuration (e.g. `archives`, `default`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigurationId(String);

impl ConfigurationId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigurationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConfigurationId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A configuration together with the artifacts it publishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub id: ConfigurationId,
    pub artifacts: BTreeSet<ArtifactIdentity>,
}

impl Configuration {
    pub fn new(id: impl Into<ConfigurationId>) -> Self {
        Self {
            id: id.into(),
            artifacts: BTreeSet::new(),
        }
    }

    pub fn with_artifact(mut self, artifact: ArtifactIdentity) -> Self {
        self.artifacts.insert(artifact);
        self
    }

    pub fn add_artifact(&mut self, artifact: ArtifactIdentity) {
        self.artifacts.insert(artifact);
    }

    pub fn contains(&self, artifact: &ArtifactIdentity) -> bool {
        self.artifacts.contains(artifact)
    }
}

/// Source of the configurations relevant to the current publication.
pub trait ConfigurationMembership {
    fn active_configurations(&self) -> Vec<Configuration>;
}

/// A fixed set of configurations, for builds that know them up front.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigurations {
    configurations: Vec<Configuration>,
}

impl StaticConfigurations {
    pub fn new(configurations: Vec<Configuration>) -> Self {
        Self { configurations }
    }

    pub fn push(&mut self, configuration: Configuration) {
        self.configurations.push(configuration);
    }
}

impl ConfigurationMembership for StaticConfigurations {
    fn active_configurations(&self) -> Vec<Configuration> {
        self.configurations.clone()
    }
}
