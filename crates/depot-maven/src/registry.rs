//! Accumulates registered artifacts and groups them into deployable bundles.
//!
//! Registration is keyed by [`ArtifactIdentity`]; registering the same
//! identity again replaces the earlier file. Grouping walks every active
//! configuration, splits the artifacts it contains by module into POM,
//! primary files and classified variants, and emits one bundle per distinct
//! (POM, primary) pair. Classified variants of a module are folded into each
//! of its bundles, the most recent registration winning per classifier.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use depot_core::artifact::{ArtifactIdentity, ModuleId};
use depot_core::configuration::{Configuration, ConfigurationId};
use depot_core::filter::{AcceptAll, SharedFilter};

use crate::bundle::{ClassifierArtifact, DeployableBundle};

#[derive(Debug, Clone)]
struct Registration {
    file: PathBuf,
    sequence: u64,
    overwrite: bool,
}

/// Mutable map from artifact identity to the file that will be deployed for it.
#[derive(Debug, Default)]
pub struct ArtifactRegistry {
    entries: BTreeMap<ArtifactIdentity, Registration>,
    next_sequence: u64,
}

/// Which half of a bundle a module was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPart {
    Descriptor,
    Primary,
}

/// A module that had artifacts in a configuration but could not form a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteGroup {
    pub configuration: ConfigurationId,
    pub module: ModuleId,
    pub missing: MissingPart,
}

impl fmt::Display for IncompleteGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.missing {
            MissingPart::Descriptor => "POM",
            MissingPart::Primary => "primary artifact",
        };
        write!(
            f,
            "no {what} registered for {} in configuration '{}'",
            self.module, self.configuration
        )
    }
}

/// Result of grouping: the bundles to deploy and the groups left out.
#[derive(Debug, Default)]
pub struct Grouping {
    pub bundles: BTreeSet<DeployableBundle>,
    pub incomplete: Vec<IncompleteGroup>,
}

#[derive(Default)]
struct ModuleSlots<'a> {
    descriptor: Option<&'a Registration>,
    primaries: Vec<(&'a ArtifactIdentity, &'a Registration)>,
    classifiers: BTreeMap<&'a str, (&'a ArtifactIdentity, &'a Registration)>,
}

struct PendingBundle {
    module: ModuleId,
    primary_type: String,
    primary_extension: String,
    overwrite: bool,
    classifiers: BTreeMap<String, (u64, ClassifierArtifact)>,
}

impl ArtifactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `file` for `identity`, replacing any earlier registration.
    pub fn register(&mut self, identity: ArtifactIdentity, file: impl Into<PathBuf>) {
        self.register_with(identity, file, false);
    }

    /// Like [`register`](Self::register), recording whether the file may
    /// replace one already present in the target repository.
    pub fn register_with(
        &mut self,
        identity: ArtifactIdentity,
        file: impl Into<PathBuf>,
        overwrite: bool,
    ) {
        let file = file.into();
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        tracing::debug!("Registered {identity} -> {}", file.display());
        let previous = self.entries.insert(
            identity,
            Registration {
                file,
                sequence,
                overwrite,
            },
        );
        if let Some(previous) = previous {
            tracing::debug!("Replaced earlier registration {}", previous.file.display());
        }
    }

    pub fn file_for(&self, identity: &ArtifactIdentity) -> Option<&Path> {
        self.entries.get(identity).map(|r| r.file.as_path())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Group every registered artifact that belongs to one of `configurations`.
    pub fn group_by_descriptor(&self, configurations: &[Configuration]) -> Grouping {
        let accept_all: SharedFilter = std::sync::Arc::new(AcceptAll);
        self.group_filtered(configurations, &[accept_all])
    }

    /// Group as [`group_by_descriptor`](Self::group_by_descriptor), keeping
    /// only artifacts accepted by at least one of `filters`.
    pub fn group_filtered(
        &self,
        configurations: &[Configuration],
        filters: &[SharedFilter],
    ) -> Grouping {
        let mut pending: BTreeMap<(PathBuf, PathBuf), PendingBundle> = BTreeMap::new();
        let mut incomplete = Vec::new();

        for configuration in configurations {
            let mut modules: BTreeMap<ModuleId, ModuleSlots<'_>> = BTreeMap::new();
            // Filters judge an artifact against the configuration it is grouped in.
            let scope = std::slice::from_ref(configuration);

            for (identity, registration) in &self.entries {
                if identity.is_module_descriptor() || !configuration.contains(identity) {
                    continue;
                }
                if !filters.iter().any(|f| f.accept(scope, identity)) {
                    tracing::debug!("{identity} rejected by publish filters");
                    continue;
                }

                let slots = modules.entry(identity.module()).or_default();
                if identity.is_descriptor() {
                    if slots
                        .descriptor
                        .map_or(true, |d| d.sequence < registration.sequence)
                    {
                        slots.descriptor = Some(registration);
                    }
                } else if let Some(classifier) = identity.classifier.as_deref() {
                    let newer = slots
                        .classifiers
                        .get(classifier)
                        .map_or(true, |(_, existing)| existing.sequence < registration.sequence);
                    if newer {
                        slots
                            .classifiers
                            .insert(classifier, (identity, registration));
                    }
                } else {
                    slots.primaries.push((identity, registration));
                }
            }

            for (module, slots) in modules {
                let Some(descriptor) = slots.descriptor else {
                    incomplete.push(IncompleteGroup {
                        configuration: configuration.id.clone(),
                        module,
                        missing: MissingPart::Descriptor,
                    });
                    continue;
                };
                if slots.primaries.is_empty() {
                    incomplete.push(IncompleteGroup {
                        configuration: configuration.id.clone(),
                        module,
                        missing: MissingPart::Primary,
                    });
                    continue;
                }

                for (identity, primary) in slots.primaries {
                    let bundle = pending
                        .entry((descriptor.file.clone(), primary.file.clone()))
                        .or_insert_with(|| PendingBundle {
                            module: module.clone(),
                            primary_type: identity.type_.clone(),
                            primary_extension: identity.extension.clone(),
                            overwrite: primary.overwrite,
                            classifiers: BTreeMap::new(),
                        });
                    for (name, (identity, registration)) in &slots.classifiers {
                        let newer = bundle
                            .classifiers
                            .get(*name)
                            .map_or(true, |(sequence, _)| *sequence < registration.sequence);
                        if newer {
                            bundle.classifiers.insert(
                                name.to_string(),
                                (
                                    registration.sequence,
                                    ClassifierArtifact::new(
                                        *name,
                                        identity.type_.as_str(),
                                        registration.file.clone(),
                                    ),
                                ),
                            );
                        }
                    }
                }
            }
        }

        let bundles = pending
            .into_iter()
            .map(|((descriptor, primary), pending)| {
                DeployableBundle::new(
                    pending.module,
                    descriptor,
                    primary,
                    pending.classifiers.into_values().map(|(_, c)| c),
                )
                .with_primary_kind(pending.primary_type, pending.primary_extension)
                .with_overwrite(pending.overwrite)
            })
            .collect();

        Grouping {
            bundles,
            incomplete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jar(name: &str) -> ArtifactIdentity {
        ArtifactIdentity::new("org", name, "1.0", "jar", "jar")
    }

    #[test]
    fn register_overwrites_same_identity() {
        let mut registry = ArtifactRegistry::new();
        registry.register(jar("lib"), "first.jar");
        registry.register(jar("lib"), "second.jar");
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.file_for(&jar("lib")),
            Some(Path::new("second.jar"))
        );
    }

    #[test]
    fn module_descriptor_never_grouped() {
        let mut registry = ArtifactRegistry::new();
        let ivy = ArtifactIdentity::module_descriptor("org", "lib", "1.0");
        registry.register(ivy.clone(), "ivy.xml");
        let conf = Configuration::new("archives").with_artifact(ivy);
        let grouping = registry.group_by_descriptor(&[conf]);
        assert!(grouping.bundles.is_empty());
        assert!(grouping.incomplete.is_empty());
    }

    #[test]
    fn incomplete_group_display() {
        let group = IncompleteGroup {
            configuration: ConfigurationId::new("archives"),
            module: ModuleId::new("org", "lib", "1.0"),
            missing: MissingPart::Descriptor,
        };
        assert_eq!(
            group.to_string(),
            "no POM registered for org:lib:1.0 in configuration 'archives'"
        );
    }
}
