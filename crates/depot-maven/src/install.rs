//! [`DeployExecutor`] that installs bundles into a local Maven repository.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use depot_util::errors::DepotError;

use crate::checksum;
use crate::executor::{Attachment, DeployExecutor, DescriptorHandle, ProjectContext};
use crate::repository::RepositoryLayout;
use crate::settings::parse_settings_xml;

/// Copies each bundle into `group/as/path/name/version/` with checksum sidecars.
///
/// The repository root is the explicit override if one was given, otherwise
/// `<localRepository>` from the settings file set for the commit.
///
/// Bundles of one module share its POM and classified variants. Within a
/// commit each destination is written once; a later bundle naming the same
/// source skips it, and one naming a different source fails.
#[derive(Debug, Default)]
pub struct LocalInstallExecutor {
    root_override: Option<PathBuf>,
    settings_file: Option<PathBuf>,
    context: Option<ProjectContext>,
    primary: Option<PathBuf>,
    descriptor: Option<DescriptorHandle>,
    attachments: Vec<Attachment>,
    installed: Vec<PathBuf>,
    /// Destination -> source for files written since the settings file was set.
    committed: BTreeMap<PathBuf, PathBuf>,
}

impl LocalInstallExecutor {
    /// Install into the repository named by the commit's settings file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install into `root`, ignoring `<localRepository>` in the settings.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root_override: Some(root.into()),
            ..Self::default()
        }
    }

    /// Every file written so far, sidecars excluded.
    pub fn installed(&self) -> &[PathBuf] {
        &self.installed
    }

    fn repository_root(&self) -> miette::Result<PathBuf> {
        if let Some(ref root) = self.root_override {
            return Ok(root.clone());
        }
        let settings_file = self.settings_file.as_ref().ok_or_else(|| missing("settings file"))?;
        let xml = std::fs::read_to_string(settings_file).map_err(DepotError::Io)?;
        parse_settings_xml(&xml)?
            .local_repository
            .ok_or_else(|| {
                DepotError::Generic {
                    message: format!(
                        "{} does not name a localRepository",
                        settings_file.display()
                    ),
                }
                .into()
            })
    }

    fn install(&mut self, source: &Path, dest: PathBuf, overwrite: bool) -> miette::Result<()> {
        if let Some(earlier) = self.committed.get(&dest) {
            if earlier == source {
                tracing::debug!("{} already installed in this commit", dest.display());
                return Ok(());
            }
            return Err(DepotError::Generic {
                message: format!(
                    "{} would be installed from both {} and {}",
                    dest.display(),
                    earlier.display(),
                    source.display()
                ),
            }
            .into());
        }
        if dest.exists() && !overwrite {
            return Err(DepotError::Generic {
                message: format!("{} is already installed", dest.display()),
            }
            .into());
        }
        if depot_util::fs::remove_if_exists(&dest).map_err(DepotError::Io)? {
            tracing::debug!("Replacing {}", dest.display());
        }
        depot_util::fs::ensure_parent_dir(&dest).map_err(DepotError::Io)?;
        std::fs::copy(source, &dest).map_err(|e| DepotError::Generic {
            message: format!(
                "Failed to copy {} to {}: {e}",
                source.display(),
                dest.display()
            ),
        })?;
        checksum::write_sidecars(&dest)?;
        tracing::debug!("Installed {}", dest.display());
        self.committed.insert(dest.clone(), source.to_path_buf());
        self.installed.push(dest);
        Ok(())
    }
}

fn missing(what: &str) -> miette::Report {
    DepotError::Generic {
        message: format!("install executed without a {what}"),
    }
    .into()
}

/// Extension for an installed attachment: the source file's own, else `fallback`.
fn extension_of<'a>(file: &'a Path, fallback: &'a str) -> &'a str {
    file.extension()
        .and_then(|e| e.to_str())
        .unwrap_or(fallback)
}

impl DeployExecutor for LocalInstallExecutor {
    fn set_project_context(&mut self, context: ProjectContext) {
        self.context = Some(context);
    }

    fn set_settings_file(&mut self, path: &Path) {
        self.settings_file = Some(path.to_path_buf());
        self.committed.clear();
    }

    fn set_primary_file(&mut self, path: &Path) {
        self.primary = Some(path.to_path_buf());
    }

    fn add_descriptor(&mut self, descriptor: DescriptorHandle) {
        self.descriptor = Some(descriptor);
    }

    fn create_attachment(&mut self) -> &mut Attachment {
        self.attachments.push(Attachment::default());
        let last = self.attachments.len() - 1;
        &mut self.attachments[last]
    }

    fn execute(&mut self) -> miette::Result<()> {
        let primary = self.primary.take();
        let descriptor = self.descriptor.take();
        let attachments = std::mem::take(&mut self.attachments);

        let context = self.context.clone().ok_or_else(|| missing("project context"))?;
        let primary = primary.ok_or_else(|| missing("primary file"))?;
        let descriptor = descriptor.ok_or_else(|| missing("POM"))?;

        let layout = RepositoryLayout::new(self.repository_root()?);
        let module = &context.module;
        let overwrite = context.overwrite;

        self.install(&descriptor.file, layout.pom_path(module), overwrite)?;

        self.install(
            &primary,
            layout.artifact_path(module, None, &context.extension),
            overwrite,
        )?;

        for attachment in &attachments {
            let file = attachment.file().ok_or_else(|| missing("attachment file"))?;
            let classifier = attachment
                .classifier()
                .ok_or_else(|| missing("attachment classifier"))?;
            let ext = extension_of(file, attachment.type_().unwrap_or("jar"));
            self.install(
                file,
                layout.artifact_path(module, Some(classifier), ext),
                overwrite,
            )?;
        }

        tracing::info!("Installed {module} into {}", layout.root().display());
        Ok(())
    }
}
