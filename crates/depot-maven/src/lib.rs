//! Maven publishing as a two-phase transaction.
//!
//! Artifacts are registered one by one with a [`publish::PublishCoordinator`]
//! and deployed together on commit: the [`registry::ArtifactRegistry`] groups
//! them into one [`bundle::DeployableBundle`] per POM, settings are staged
//! to a temporary `settings.xml` for the duration of the commit, and a
//! [`executor::DeployExecutor`] performs one deploy or install per bundle.

pub mod bundle;
pub mod checksum;
pub mod executor;
pub mod install;
pub mod materialize;
pub mod publish;
pub mod registry;
pub mod repository;
pub mod settings;
