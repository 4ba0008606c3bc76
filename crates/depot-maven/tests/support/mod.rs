//! Recording fakes for the coordinator's collaborators.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use depot_core::configuration::{Configuration, ConfigurationMembership};
use depot_core::filter::{PomFilterContainer, SharedFilter, SharedPom};
use depot_maven::executor::{Attachment, DeployExecutor, DescriptorHandle, ProjectContext};

/// What the executor had been given when `execute` was called.
#[derive(Debug, Clone, Default)]
pub struct Execution {
    pub context: Option<ProjectContext>,
    pub primary: Option<PathBuf>,
    pub descriptor: Option<DescriptorHandle>,
    pub attachments: Vec<Attachment>,
    pub settings_file_existed: bool,
}

#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub settings_files: Vec<PathBuf>,
    pub settings_contents: Vec<String>,
    pub executions: Vec<Execution>,
    /// Zero-based index of the `execute` call that should fail.
    pub fail_on: Option<usize>,
    pending: Execution,
}

impl RecordingExecutor {
    pub fn failing_on(index: usize) -> Self {
        Self {
            fail_on: Some(index),
            ..Self::default()
        }
    }

    pub fn execution_for(&self, primary: &str) -> &Execution {
        self.executions
            .iter()
            .find(|e| e.primary.as_deref() == Some(Path::new(primary)))
            .unwrap_or_else(|| panic!("no execution for {primary}"))
    }
}

impl DeployExecutor for RecordingExecutor {
    fn set_project_context(&mut self, context: ProjectContext) {
        self.pending.context = Some(context);
    }

    fn set_settings_file(&mut self, path: &Path) {
        self.settings_files.push(path.to_path_buf());
        self.settings_contents
            .push(std::fs::read_to_string(path).unwrap_or_default());
    }

    fn set_primary_file(&mut self, path: &Path) {
        self.pending.primary = Some(path.to_path_buf());
    }

    fn add_descriptor(&mut self, descriptor: DescriptorHandle) {
        self.pending.descriptor = Some(descriptor);
    }

    fn create_attachment(&mut self) -> &mut Attachment {
        self.pending.attachments.push(Attachment::default());
        let last = self.pending.attachments.len() - 1;
        &mut self.pending.attachments[last]
    }

    fn execute(&mut self) -> miette::Result<()> {
        let mut execution = std::mem::take(&mut self.pending);
        execution.settings_file_existed = self
            .settings_files
            .last()
            .map(|p| p.is_file())
            .unwrap_or(false);
        let index = self.executions.len();
        self.executions.push(execution);
        if self.fail_on == Some(index) {
            return Err(miette::miette!("remote rejected upload"));
        }
        Ok(())
    }
}

/// Configurations with a shared call counter.
#[derive(Debug, Clone, Default)]
pub struct RecordingConfigurations {
    pub configurations: Vec<Configuration>,
    pub calls: Arc<AtomicUsize>,
}

impl RecordingConfigurations {
    pub fn new(configurations: Vec<Configuration>) -> Self {
        Self {
            configurations,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ConfigurationMembership for RecordingConfigurations {
    fn active_configurations(&self) -> Vec<Configuration> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.configurations.clone()
    }
}

pub enum FilterCall {
    GetFilter,
    SetFilter(SharedFilter),
    GetPom,
    SetPom(SharedPom),
    AddFilter(String, SharedFilter),
    Filter(String),
    Pom(String),
    ActiveFilters,
}

/// Filter container that records every call and answers with canned values.
#[derive(Clone)]
pub struct RecordingFilters {
    pub calls: Arc<Mutex<Vec<FilterCall>>>,
    pub filter: SharedFilter,
    pub pom: SharedPom,
}

impl RecordingFilters {
    pub fn new(filter: SharedFilter, pom: SharedPom) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            filter,
            pom,
        }
    }

    fn record(&self, call: FilterCall) {
        self.calls.lock().unwrap().push(call);
    }

    /// Calls other than the `active_filters` lookups made during commit.
    pub fn accessor_calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| !matches!(c, FilterCall::ActiveFilters))
            .map(|c| match c {
                FilterCall::GetFilter => "get_filter".to_string(),
                FilterCall::SetFilter(_) => "set_filter".to_string(),
                FilterCall::GetPom => "get_pom".to_string(),
                FilterCall::SetPom(_) => "set_pom".to_string(),
                FilterCall::AddFilter(name, _) => format!("add_filter({name})"),
                FilterCall::Filter(name) => format!("filter({name})"),
                FilterCall::Pom(name) => format!("pom({name})"),
                FilterCall::ActiveFilters => unreachable!(),
            })
            .collect()
    }
}

impl PomFilterContainer for RecordingFilters {
    fn get_filter(&self) -> SharedFilter {
        self.record(FilterCall::GetFilter);
        Arc::clone(&self.filter)
    }

    fn set_filter(&mut self, filter: SharedFilter) {
        self.record(FilterCall::SetFilter(filter));
    }

    fn get_pom(&self) -> SharedPom {
        self.record(FilterCall::GetPom);
        Arc::clone(&self.pom)
    }

    fn set_pom(&mut self, pom: SharedPom) {
        self.record(FilterCall::SetPom(pom));
    }

    fn add_filter(&mut self, name: &str, filter: SharedFilter) -> miette::Result<SharedPom> {
        self.record(FilterCall::AddFilter(name.to_string(), filter));
        Ok(Arc::clone(&self.pom))
    }

    fn filter(&self, name: &str) -> Option<SharedFilter> {
        self.record(FilterCall::Filter(name.to_string()));
        Some(Arc::clone(&self.filter))
    }

    fn pom(&self, name: &str) -> Option<SharedPom> {
        self.record(FilterCall::Pom(name.to_string()));
        Some(Arc::clone(&self.pom))
    }

    fn active_filters(&self) -> Vec<SharedFilter> {
        self.record(FilterCall::ActiveFilters);
        vec![Arc::clone(&self.filter)]
    }
}
