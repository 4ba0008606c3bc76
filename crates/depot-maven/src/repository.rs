//! Maven repository directory layout.

use std::path::{Path, PathBuf};

use depot_core::artifact::ModuleId;

/// A Maven-layout repository rooted at a local directory.
#[derive(Debug, Clone)]
pub struct RepositoryLayout {
    root: PathBuf,
}

impl RepositoryLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Standard Maven layout path for a given coordinate.
    ///
    /// `org.jetbrains.kotlinx:kotlinx-coroutines-core:1.8.0` becomes
    /// `org/jetbrains/kotlinx/kotlinx-coroutines-core/1.8.0`
    pub fn coordinate_path(group: &str, artifact: &str, version: &str) -> String {
        format!("{}/{}/{}", group.replace('.', "/"), artifact, version)
    }

    /// File name of one artifact of `module`: `name-version[-classifier].ext`.
    pub fn file_name(module: &ModuleId, classifier: Option<&str>, extension: &str) -> String {
        match classifier {
            Some(c) => format!("{}-{}-{c}.{extension}", module.name, module.revision),
            None => format!("{}-{}.{extension}", module.name, module.revision),
        }
    }

    /// Directory holding every file of `module`.
    pub fn module_dir(&self, module: &ModuleId) -> PathBuf {
        self.root.join(Self::coordinate_path(
            &module.organization,
            &module.name,
            &module.revision,
        ))
    }

    /// Full path of one artifact of `module` within this repository.
    pub fn artifact_path(
        &self,
        module: &ModuleId,
        classifier: Option<&str>,
        extension: &str,
    ) -> PathBuf {
        self.module_dir(module)
            .join(Self::file_name(module, classifier, extension))
    }

    /// Path of the POM of `module`.
    pub fn pom_path(&self, module: &ModuleId) -> PathBuf {
        self.artifact_path(module, None, "pom")
    }
}
