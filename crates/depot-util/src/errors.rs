use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all depot operations.
#[derive(Debug, Error, Diagnostic)]
pub enum DepotError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unreadable configuration (e.g. config.toml).
    #[error("Config error: {message}")]
    #[diagnostic(help("Check ~/.depot/config.toml for syntax errors"))]
    Config { message: String },

    /// An artifact could not be registered for publishing.
    #[error("Registration failed: {message}")]
    Registration { message: String },

    /// A configuration produced artifacts without a descriptor or primary file.
    #[error("Incomplete publication for {configuration}: {message}")]
    #[diagnostic(help("Register both a POM and a primary artifact, or set on-incomplete = \"skip\""))]
    IncompleteGroup {
        configuration: String,
        message: String,
    },

    /// The deploy/install executor failed for one bundle. The executor's
    /// own report is kept as the cause.
    #[error("Deploy of {bundle} failed")]
    Executor { bundle: String },

    /// The transient settings file could not be written or removed.
    #[error("Settings error: {message}")]
    Settings { message: String },

    /// The publish transaction was used out of order.
    #[error("Transaction error: {message}")]
    Transaction { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type DepotResult<T> = miette::Result<T>;
