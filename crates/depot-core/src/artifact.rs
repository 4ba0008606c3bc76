//! Artifact coordinates as registered during a publish transaction.

use std::fmt;

use depot_util::errors::DepotError;

/// Artifact type marking the Maven descriptor (the POM).
pub const POM_TYPE: &str = "pom";

/// Artifact type marking the build's own module descriptor.
pub const MODULE_DESCRIPTOR_TYPE: &str = "ivy";

/// The `group:name:version` coordinate shared by every artifact of a module.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId {
    pub organization: String,
    pub name: String,
    pub revision: String,
}

impl ModuleId {
    pub fn new(
        organization: impl Into<String>,
        name: impl Into<String>,
        revision: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            name: name.into(),
            revision: revision.into(),
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.organization, self.name, self.revision)
    }
}

/// Identity of one publishable file.
///
/// Two identities are equal iff every field matches, so the same module may
/// carry a POM, a primary jar and any number of classified variants side by
/// side.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactIdentity {
    pub organization: String,
    pub name: String,
    pub revision: String,
    pub type_: String,
    pub extension: String,
    pub classifier: Option<String>,
}

impl ArtifactIdentity {
    pub fn new(
        organization: impl Into<String>,
        name: impl Into<String>,
        revision: impl Into<String>,
        type_: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            name: name.into(),
            revision: revision.into(),
            type_: type_.into(),
            extension: extension.into(),
            classifier: None,
        }
    }

    /// The POM descriptor of a module.
    pub fn pom(
        organization: impl Into<String>,
        name: impl Into<String>,
        revision: impl Into<String>,
    ) -> Self {
        Self::new(organization, name, revision, POM_TYPE, "pom")
    }

    /// The build's own module descriptor (`ivy.xml`).
    pub fn module_descriptor(
        organization: impl Into<String>,
        name: impl Into<String>,
        revision: impl Into<String>,
    ) -> Self {
        Self::new(organization, name, revision, MODULE_DESCRIPTOR_TYPE, "xml")
    }

    /// Attach a classifier (e.g. `sources`, `javadoc`).
    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    pub fn module(&self) -> ModuleId {
        ModuleId::new(&self.organization, &self.name, &self.revision)
    }

    /// Whether this is the Maven descriptor of its module.
    pub fn is_descriptor(&self) -> bool {
        self.type_ == POM_TYPE
    }

    /// Whether this is the build's module descriptor rather than a deployable file.
    pub fn is_module_descriptor(&self) -> bool {
        self.type_ == MODULE_DESCRIPTOR_TYPE
    }

    pub fn is_classified(&self) -> bool {
        self.classifier.is_some()
    }

    /// Reject identities that cannot be laid out in a Maven repository.
    pub fn validate(&self) -> miette::Result<()> {
        let fields = [
            ("organization", &self.organization),
            ("name", &self.name),
            ("revision", &self.revision),
            ("type", &self.type_),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(DepotError::Registration {
                    message: format!("artifact {self} has an empty {field}"),
                }
                .into());
            }
        }
        if matches!(self.classifier.as_deref(), Some(c) if c.trim().is_empty()) {
            return Err(DepotError::Registration {
                message: format!("artifact {self} has an empty classifier"),
            }
            .into());
        }
        Ok(())
    }
}

impl fmt::Display for ArtifactIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.organization, self.name, self.revision)?;
        if let Some(ref c) = self.classifier {
            write!(f, ":{c}")?;
        }
        write!(f, "@{}", self.extension)
    }
}
