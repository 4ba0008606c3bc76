//! The unit of publication: one POM, one primary file, its classified variants.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use depot_core::artifact::ModuleId;

const DEFAULT_PRIMARY_KIND: &str = "jar";

/// A secondary file published next to a primary artifact (e.g. `sources`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassifierArtifact {
    pub classifier: String,
    pub type_: String,
    pub file: PathBuf,
}

impl ClassifierArtifact {
    pub fn new(
        classifier: impl Into<String>,
        type_: impl Into<String>,
        file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            classifier: classifier.into(),
            type_: type_.into(),
            file: file.into(),
        }
    }
}

/// Everything one executor invocation deploys.
///
/// Bundles are produced by grouping at commit time and are not modified
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DeployableBundle {
    module: ModuleId,
    descriptor_file: PathBuf,
    primary_file: PathBuf,
    primary_type: String,
    primary_extension: String,
    classifier_artifacts: BTreeSet<ClassifierArtifact>,
    overwrite: bool,
}

impl DeployableBundle {
    pub fn new(
        module: ModuleId,
        descriptor_file: impl Into<PathBuf>,
        primary_file: impl Into<PathBuf>,
        classifier_artifacts: impl IntoIterator<Item = ClassifierArtifact>,
    ) -> Self {
        Self {
            module,
            descriptor_file: descriptor_file.into(),
            primary_file: primary_file.into(),
            primary_type: DEFAULT_PRIMARY_KIND.to_string(),
            primary_extension: DEFAULT_PRIMARY_KIND.to_string(),
            classifier_artifacts: classifier_artifacts.into_iter().collect(),
            overwrite: false,
        }
    }

    /// Type and extension of the primary artifact; both default to `jar`.
    pub fn with_primary_kind(
        mut self,
        type_: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        self.primary_type = type_.into();
        self.primary_extension = extension.into();
        self
    }

    /// Allow the executor to replace files already present in the target repository.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn module(&self) -> &ModuleId {
        &self.module
    }

    pub fn descriptor_file(&self) -> &Path {
        &self.descriptor_file
    }

    pub fn primary_file(&self) -> &Path {
        &self.primary_file
    }

    pub fn primary_type(&self) -> &str {
        &self.primary_type
    }

    pub fn primary_extension(&self) -> &str {
        &self.primary_extension
    }

    pub fn classifier_artifacts(&self) -> &BTreeSet<ClassifierArtifact> {
        &self.classifier_artifacts
    }

    pub fn overwrite(&self) -> bool {
        self.overwrite
    }
}

impl fmt::Display for DeployableBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.module, self.primary_file.display())
    }
}
