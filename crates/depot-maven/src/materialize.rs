//! Transient `settings.xml` staged for the duration of one commit.
//!
//! The staged file holds repository credentials, so it must not outlive the
//! commit that created it. [`StagedSettings::release`] removes it and reports
//! failures; dropping the handle on any other exit path removes it as well.

use std::io::Write;
use std::path::{Path, PathBuf};

use depot_core::settings::MavenSettings;
use depot_util::errors::DepotError;
use tempfile::NamedTempFile;

use crate::settings::settings_xml;

const FILE_PREFIX: &str = "depot-settings-";
const FILE_SUFFIX: &str = ".xml";

/// Writes settings to fresh temporary files.
#[derive(Debug, Clone, Default)]
pub struct SettingsMaterializer {
    dir: Option<PathBuf>,
}

impl SettingsMaterializer {
    /// Stage files in the system temporary directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage files in `dir` instead of the system temporary directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Serialize `settings` into a new temporary file.
    ///
    /// On Unix the file is created readable by the owner only.
    pub fn materialize(&self, settings: &MavenSettings) -> miette::Result<StagedSettings> {
        let xml = settings_xml(settings)?;

        let mut builder = tempfile::Builder::new();
        builder.prefix(FILE_PREFIX).suffix(FILE_SUFFIX);
        let created = match self.dir {
            Some(ref dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };
        let mut file = created.map_err(|e| DepotError::Settings {
            message: format!("Failed to create temporary settings file: {e}"),
        })?;

        file.write_all(xml.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| DepotError::Settings {
                message: format!(
                    "Failed to write settings to {}: {e}",
                    file.path().display()
                ),
            })?;

        tracing::debug!(
            "Staged settings at {} (credentials: {})",
            file.path().display(),
            settings.has_credentials()
        );
        Ok(StagedSettings { file: Some(file) })
    }
}

/// Handle to a materialized settings file; the file lives as long as the handle.
#[derive(Debug)]
pub struct StagedSettings {
    file: Option<NamedTempFile>,
}

impl StagedSettings {
    pub fn path(&self) -> &Path {
        match self.file {
            Some(ref file) => file.path(),
            None => Path::new(""),
        }
    }

    /// Delete the file, reporting a failure instead of ignoring it.
    pub fn release(mut self) -> miette::Result<()> {
        match self.file.take() {
            Some(file) => close(file).map_err(|message| DepotError::Settings { message }.into()),
            None => Ok(()),
        }
    }
}

impl Drop for StagedSettings {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            if let Err(message) = close(file) {
                tracing::warn!("{message}");
            }
        }
    }
}

fn close(file: NamedTempFile) -> Result<(), String> {
    let path = file.path().to_path_buf();
    file.close()
        .map_err(|e| format!("Failed to remove settings file {}: {e}", path.display()))?;
    tracing::debug!("Removed settings file {}", path.display());
    Ok(())
}
