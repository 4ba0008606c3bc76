//! Repository connection settings handed to the deploy executor.

use std::path::PathBuf;

/// Immutable Maven settings for one publication.
///
/// The coordinator shares a single instance (behind an `Arc`) between its
/// accessors and the settings file it materializes at commit time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MavenSettings {
    pub local_repository: Option<PathBuf>,
    pub interactive_mode: bool,
    pub offline: bool,
    pub servers: Vec<Server>,
}

/// Credentials for one repository, matched by `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    pub id: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl MavenSettings {
    pub fn server(&self, id: &str) -> Option<&Server> {
        self.servers.iter().find(|s| s.id == id)
    }

    /// Whether any server carries a username or password.
    pub fn has_credentials(&self) -> bool {
        self.servers
            .iter()
            .any(|s| s.username.is_some() || s.password.is_some())
    }
}
