//! The deploy/install capability driven once per bundle at commit time.

use std::path::{Path, PathBuf};

use depot_core::artifact::ModuleId;

/// Project the executor works on behalf of, set before each bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    pub name: String,
    pub base_dir: PathBuf,
    /// Module the current bundle belongs to.
    pub module: ModuleId,
    /// Type of the primary artifact (`jar`, `war`, ...).
    pub packaging: String,
    /// File extension the primary artifact is published under.
    pub extension: String,
    /// The build's own module descriptor, if one was published.
    pub module_descriptor: Option<PathBuf>,
    /// Whether files already present in the target repository may be replaced.
    pub overwrite: bool,
}

/// A POM file handed to the executor, bound to the project it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorHandle {
    pub file: PathBuf,
    pub context: ProjectContext,
}

/// A classified file attached to the current deploy, filled in by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachment {
    file: Option<PathBuf>,
    type_: Option<String>,
    classifier: Option<String>,
}

impl Attachment {
    pub fn set_file(&mut self, file: impl Into<PathBuf>) {
        self.file = Some(file.into());
    }

    pub fn set_type(&mut self, type_: impl Into<String>) {
        self.type_ = Some(type_.into());
    }

    pub fn set_classifier(&mut self, classifier: impl Into<String>) {
        self.classifier = Some(classifier.into());
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn type_(&self) -> Option<&str> {
        self.type_.as_deref()
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }
}

/// One physical deploy or install operation, configured step by step.
///
/// The settings file is set once per commit; everything else is set anew
/// for each bundle before [`execute`](DeployExecutor::execute). An
/// implementation must forget the per-bundle state (primary file, POM,
/// attachments) once `execute` returns, whether or not it succeeded.
pub trait DeployExecutor {
    fn set_project_context(&mut self, context: ProjectContext);

    fn set_settings_file(&mut self, path: &Path);

    fn set_primary_file(&mut self, path: &Path);

    fn add_descriptor(&mut self, descriptor: DescriptorHandle);

    /// Start a new attachment; the caller fills in file, type and classifier.
    fn create_attachment(&mut self) -> &mut Attachment;

    /// Perform the deploy or install of everything configured so far.
    fn execute(&mut self) -> miette::Result<()>;
}
