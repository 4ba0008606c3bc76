//! The publish coordinator: accumulate registrations, then commit them together.
//!
//! A transaction moves through
//!
//! ```text
//! Accumulating --commit--> Committing --+--> Committed
//!      |                                +--> Failed
//!      +--abort--> Aborted
//! ```
//!
//! and [`PublishCoordinator::begin_transaction`] returns any terminal state
//! to `Accumulating` with an empty registry.
//!
//! Commit is not atomic with respect to the remote repository: when a bundle
//! fails, bundles deployed before it stay deployed. The staged settings file
//! is removed on every exit path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use depot_core::artifact::{ArtifactIdentity, ModuleId};
use depot_core::config::IncompleteGroupPolicy;
use depot_core::configuration::{ConfigurationMembership, StaticConfigurations};
use depot_core::filter::{DefaultPomFilterContainer, PomFilterContainer, SharedFilter, SharedPom};
use depot_core::settings::MavenSettings;
use depot_util::errors::DepotError;

use crate::bundle::DeployableBundle;
use crate::executor::{DeployExecutor, DescriptorHandle, ProjectContext};
use crate::materialize::SettingsMaterializer;
use crate::registry::{ArtifactRegistry, IncompleteGroup};

/// Where a coordinator is in its publish transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Accumulating,
    Committing,
    Committed,
    Failed,
    Aborted,
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// Modules deployed, one entry per bundle, in deploy order.
    pub deployed: Vec<ModuleId>,
    /// Groups left out because they lacked a POM or a primary artifact.
    pub skipped: Vec<IncompleteGroup>,
}

/// Accumulates artifacts for one publication and deploys them on commit.
pub struct PublishCoordinator<E: DeployExecutor> {
    executor: E,
    settings: Arc<MavenSettings>,
    filters: Box<dyn PomFilterContainer>,
    configurations: Box<dyn ConfigurationMembership>,
    materializer: SettingsMaterializer,
    registry: ArtifactRegistry,
    module_descriptor: Option<PathBuf>,
    project_name: String,
    base_dir: PathBuf,
    policy: IncompleteGroupPolicy,
    state: TransactionState,
}

impl<E: DeployExecutor> PublishCoordinator<E> {
    pub fn new(executor: E, settings: Arc<MavenSettings>) -> Self {
        Self {
            executor,
            settings,
            filters: Box::new(DefaultPomFilterContainer::new()),
            configurations: Box::new(StaticConfigurations::default()),
            materializer: SettingsMaterializer::new(),
            registry: ArtifactRegistry::new(),
            module_descriptor: None,
            project_name: String::new(),
            base_dir: PathBuf::from("."),
            policy: IncompleteGroupPolicy::default(),
            state: TransactionState::Accumulating,
        }
    }

    pub fn with_filters(mut self, filters: Box<dyn PomFilterContainer>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_configurations(mut self, configurations: Box<dyn ConfigurationMembership>) -> Self {
        self.configurations = configurations;
        self
    }

    pub fn with_materializer(mut self, materializer: SettingsMaterializer) -> Self {
        self.materializer = materializer;
        self
    }

    /// Name and directory of the project handed to the executor.
    pub fn with_project(mut self, name: impl Into<String>, base_dir: impl Into<PathBuf>) -> Self {
        self.project_name = name.into();
        self.base_dir = base_dir.into();
        self
    }

    pub fn with_policy(mut self, policy: IncompleteGroupPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn registry(&self) -> &ArtifactRegistry {
        &self.registry
    }

    /// The module descriptor remembered from the last descriptor-kind publish.
    pub fn module_descriptor(&self) -> Option<&Path> {
        self.module_descriptor.as_deref()
    }

    /// Register `file` for `artifact` in the open transaction.
    ///
    /// The module descriptor (`ivy`) is remembered for the executor's project
    /// context instead of being deployed. `overwrite` travels with the
    /// artifact and lets the executor replace existing remote files.
    pub fn publish(
        &mut self,
        artifact: ArtifactIdentity,
        file: impl Into<PathBuf>,
        overwrite: bool,
    ) -> miette::Result<()> {
        if self.state != TransactionState::Accumulating {
            return Err(DepotError::Registration {
                message: "transaction already closed".to_string(),
            }
            .into());
        }
        artifact.validate()?;
        let file = file.into();
        if file.as_os_str().is_empty() {
            return Err(DepotError::Registration {
                message: format!("no file given for {artifact}"),
            }
            .into());
        }

        if artifact.is_module_descriptor() {
            tracing::debug!("Module descriptor for {} -> {}", artifact.module(), file.display());
            self.module_descriptor = Some(file);
            return Ok(());
        }
        self.registry.register_with(artifact, file, overwrite);
        Ok(())
    }

    /// Deploy every bundle accumulated in this transaction.
    ///
    /// A coordinator commits once per transaction; calling this again
    /// without [`begin_transaction`](Self::begin_transaction) fails with
    /// "transaction already finalized".
    pub fn commit_transaction(&mut self) -> miette::Result<CommitReport> {
        if self.state != TransactionState::Accumulating {
            return Err(DepotError::Transaction {
                message: "transaction already finalized".to_string(),
            }
            .into());
        }
        self.state = TransactionState::Committing;

        match self.run_commit() {
            Ok(report) => {
                self.registry.clear();
                self.state = TransactionState::Committed;
                tracing::info!(
                    "Published {} bundle(s), skipped {}",
                    report.deployed.len(),
                    report.skipped.len()
                );
                Ok(report)
            }
            Err(e) => {
                self.state = TransactionState::Failed;
                Err(e)
            }
        }
    }

    /// Discard everything accumulated so far and close the transaction.
    pub fn abort_transaction(&mut self) -> miette::Result<()> {
        if self.state != TransactionState::Accumulating {
            return Err(DepotError::Transaction {
                message: "transaction already finalized".to_string(),
            }
            .into());
        }
        self.reset();
        self.state = TransactionState::Aborted;
        Ok(())
    }

    /// Open a fresh transaction with an empty registry.
    pub fn begin_transaction(&mut self) -> miette::Result<()> {
        if self.state == TransactionState::Committing {
            return Err(DepotError::Transaction {
                message: "commit in progress".to_string(),
            }
            .into());
        }
        self.reset();
        self.state = TransactionState::Accumulating;
        Ok(())
    }

    fn reset(&mut self) {
        self.registry.clear();
        self.module_descriptor = None;
    }

    fn run_commit(&mut self) -> miette::Result<CommitReport> {
        let configurations = self.configurations.active_configurations();
        let filters = self.filters.active_filters();
        let grouping = self.registry.group_filtered(&configurations, &filters);

        if self.policy == IncompleteGroupPolicy::Fail {
            if let Some(group) = grouping.incomplete.first() {
                return Err(DepotError::IncompleteGroup {
                    configuration: group.configuration.to_string(),
                    message: group.to_string(),
                }
                .into());
            }
        }
        for group in &grouping.incomplete {
            tracing::warn!("Skipping publication: {group}");
        }

        let settings = Arc::clone(&self.settings);
        let staged = self.materializer.materialize(&settings)?;
        self.executor.set_settings_file(staged.path());

        let mut deployed = Vec::with_capacity(grouping.bundles.len());
        for bundle in &grouping.bundles {
            self.deploy_bundle(bundle).map_err(|e| {
                e.wrap_err(DepotError::Executor {
                    bundle: bundle.to_string(),
                })
            })?;
            deployed.push(bundle.module().clone());
        }

        staged.release()?;
        Ok(CommitReport {
            deployed,
            skipped: grouping.incomplete,
        })
    }

    fn deploy_bundle(&mut self, bundle: &DeployableBundle) -> miette::Result<()> {
        let context = ProjectContext {
            name: self.project_name.clone(),
            base_dir: self.base_dir.clone(),
            module: bundle.module().clone(),
            packaging: bundle.primary_type().to_string(),
            extension: bundle.primary_extension().to_string(),
            module_descriptor: self.module_descriptor.clone(),
            overwrite: bundle.overwrite(),
        };
        self.executor.set_project_context(context.clone());
        self.executor.set_primary_file(bundle.primary_file());
        self.executor.add_descriptor(DescriptorHandle {
            file: bundle.descriptor_file().to_path_buf(),
            context,
        });
        for classified in bundle.classifier_artifacts() {
            let attachment = self.executor.create_attachment();
            attachment.set_file(classified.file.clone());
            attachment.set_type(classified.type_.clone());
            attachment.set_classifier(classified.classifier.clone());
        }
        self.executor.execute()?;
        tracing::info!("Deployed {bundle}");
        Ok(())
    }

    // Pass-through accessors to the filter container.

    pub fn get_filter(&self) -> SharedFilter {
        self.filters.get_filter()
    }

    pub fn set_filter(&mut self, filter: SharedFilter) {
        self.filters.set_filter(filter);
    }

    pub fn add_filter(&mut self, name: &str, filter: SharedFilter) -> miette::Result<SharedPom> {
        self.filters.add_filter(name, filter)
    }

    pub fn filter(&self, name: &str) -> Option<SharedFilter> {
        self.filters.filter(name)
    }

    pub fn get_pom(&self) -> SharedPom {
        self.filters.get_pom()
    }

    pub fn set_pom(&mut self, pom: SharedPom) {
        self.filters.set_pom(pom);
    }

    pub fn pom(&self, name: &str) -> Option<SharedPom> {
        self.filters.pom(name)
    }

    /// The settings instance materialized at commit time.
    pub fn settings(&self) -> &Arc<MavenSettings> {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Arc<MavenSettings>) {
        self.settings = settings;
    }
}
