//! One workflow per client, created on first access.

use std::collections::HashMap;

use serde::Serialize;

use super::{ClientWorkflow, StageId, WorkflowError, WorkflowResult};

/// A workflow snapshot together with its version counter.
///
/// The version starts at 0 and increases by one on every mutation that
/// actually changed the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionedWorkflow {
    #[serde(flatten)]
    pub workflow: ClientWorkflow,
    pub version: u64,
}

/// Keyed storage of client workflows.
#[derive(Debug, Default)]
pub struct WorkflowRegistry {
    entries: HashMap<String, VersionedWorkflow>,
}

impl WorkflowRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of workflows created so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no workflow exists yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a workflow exists for the client.
    pub fn contains(&self, client_id: &str) -> bool {
        self.entries.contains_key(client_id)
    }

    /// Return the client's workflow, creating a default one if none exists.
    pub fn get_or_create(&mut self, client_id: &str) -> &VersionedWorkflow {
        self.entry(client_id)
    }

    /// Return the client's workflow without creating it.
    pub fn get(&self, client_id: &str) -> Option<&VersionedWorkflow> {
        self.entries.get(client_id)
    }

    /// Store a pre-built workflow (seed data), replacing any existing one.
    pub fn insert(&mut self, workflow: ClientWorkflow) {
        tracing::debug!(client_id = %workflow.client_id, "Storing workflow");
        self.entries
            .insert(workflow.client_id.clone(), VersionedWorkflow { workflow, version: 0 });
    }

    /// Remove a client's workflow. Used when the client itself is deleted.
    pub fn remove(&mut self, client_id: &str) -> Option<ClientWorkflow> {
        self.entries.remove(client_id).map(|entry| entry.workflow)
    }

    /// Flip a task, creating the workflow first if needed.
    ///
    /// Unknown stage or task ids are a no-op and keep the version unchanged.
    /// When `expected_version` is given and differs from the stored version,
    /// nothing changes and a `VersionConflict` is returned.
    pub fn toggle_task(
        &mut self,
        client_id: &str,
        stage_id: &str,
        task_id: &str,
        expected_version: Option<u64>,
    ) -> WorkflowResult<VersionedWorkflow> {
        self.update(client_id, expected_version, |wf| wf.toggle_task(stage_id, task_id))
    }

    /// Set or clear a stage's issue flag.
    pub fn set_issue(
        &mut self,
        client_id: &str,
        stage: StageId,
        has_issue: bool,
        expected_version: Option<u64>,
    ) -> WorkflowResult<VersionedWorkflow> {
        self.update(client_id, expected_version, |wf| wf.with_issue(stage, has_issue))
    }

    fn entry(&mut self, client_id: &str) -> &mut VersionedWorkflow {
        self.entries.entry(client_id.to_string()).or_insert_with(|| {
            tracing::debug!(client_id, "Creating default workflow");
            VersionedWorkflow { workflow: ClientWorkflow::new(client_id), version: 0 }
        })
    }

    fn update(
        &mut self,
        client_id: &str,
        expected_version: Option<u64>,
        apply: impl FnOnce(&ClientWorkflow) -> ClientWorkflow,
    ) -> WorkflowResult<VersionedWorkflow> {
        let entry = self.entry(client_id);

        if let Some(expected) = expected_version {
            if expected != entry.version {
                return Err(WorkflowError::VersionConflict { expected, actual: entry.version });
            }
        }

        let updated = apply(&entry.workflow);
        if updated != entry.workflow {
            entry.workflow = updated;
            entry.version += 1;
            tracing::debug!(client_id, version = entry.version, "Workflow updated");
        }

        Ok(entry.clone())
    }
}
