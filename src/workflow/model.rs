//! The per-client workflow.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{template, StageId, VisualState, WorkflowError, WorkflowResult, WorkflowStage};

/// The six-stage progress structure of one client.
///
/// All updates return a new snapshot and leave `self` untouched, so callers
/// holding an older snapshot never observe the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WorkflowSnapshot")]
pub struct ClientWorkflow {
    /// Owning client. The workflow never owns the client record.
    pub client_id: String,

    /// Where the client currently is. Set at creation, never advanced by
    /// task completion.
    pub current_stage: StageId,

    /// Always holds exactly the six stages.
    stages: BTreeMap<StageId, WorkflowStage>,
}

/// Deserialization shape, checked for the six-stage and unique-task invariants.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkflowSnapshot {
    client_id: String,
    current_stage: StageId,
    stages: BTreeMap<StageId, WorkflowStage>,
}

impl TryFrom<WorkflowSnapshot> for ClientWorkflow {
    type Error = WorkflowError;

    fn try_from(snapshot: WorkflowSnapshot) -> Result<Self, Self::Error> {
        if let Some(missing) = StageId::ALL.into_iter().find(|id| !snapshot.stages.contains_key(id))
        {
            return Err(WorkflowError::StageNotFound(missing));
        }

        for (&key, stage) in &snapshot.stages {
            if stage.id != key {
                return Err(WorkflowError::StageMismatch { key, found: stage.id });
            }
            let mut seen = HashSet::new();
            if let Some(dup) = stage.tasks.iter().find(|task| !seen.insert(task.id.as_str())) {
                return Err(WorkflowError::DuplicateTask { stage: key, task_id: dup.id.clone() });
            }
        }

        Ok(Self {
            client_id: snapshot.client_id,
            current_stage: snapshot.current_stage,
            stages: snapshot.stages,
        })
    }
}

/// Display summary of one stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSummary {
    pub id: StageId,
    pub label: String,
    pub completed: usize,
    pub total: usize,
    pub percentage: f64,
    pub state: VisualState,
    pub current: bool,
}

impl ClientWorkflow {
    /// Create a fresh workflow from the default template, starting at `initial`.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self::starting_at(client_id, StageId::Initial)
    }

    /// Create a fresh workflow placed at the given stage.
    pub fn starting_at(client_id: impl Into<String>, current_stage: StageId) -> Self {
        let stages = template::default_stages().into_iter().map(|s| (s.id, s)).collect();
        Self { client_id: client_id.into(), current_stage, stages }
    }

    /// Look up a stage.
    pub fn stage(&self, id: StageId) -> &WorkflowStage {
        // The constructor and `TryFrom` guarantee all six stages are present.
        &self.stages[&id]
    }

    /// Look up a stage by its wire id.
    pub fn stage_by_name(&self, id: &str) -> Option<&WorkflowStage> {
        id.parse().ok().map(|id| self.stage(id))
    }

    /// Stages in pipeline order.
    pub fn stages(&self) -> impl Iterator<Item = &WorkflowStage> {
        self.stages.values()
    }

    /// The stage the client is currently in.
    pub fn current(&self) -> &WorkflowStage {
        self.stage(self.current_stage)
    }

    /// Flip one task's `completed` flag.
    ///
    /// Unknown stage or task ids leave the workflow unchanged.
    pub fn toggle_task(&self, stage_id: &str, task_id: &str) -> Self {
        match self.try_toggle_task(stage_id, task_id) {
            Ok(updated) => updated,
            Err(e) => {
                tracing::debug!(client_id = %self.client_id, error = %e, "Ignoring task toggle");
                self.clone()
            }
        }
    }

    /// Flip one task's `completed` flag, reporting unknown ids.
    pub fn try_toggle_task(&self, stage_id: &str, task_id: &str) -> WorkflowResult<Self> {
        let stage: StageId = stage_id.parse()?;
        self.toggled(stage, task_id)
    }

    /// Typed form of [`Self::try_toggle_task`].
    pub fn toggled(&self, stage: StageId, task_id: &str) -> WorkflowResult<Self> {
        let mut updated = self.clone();
        let target = updated.stages.get_mut(&stage).ok_or(WorkflowError::StageNotFound(stage))?;
        let task = target
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| WorkflowError::TaskNotFound { stage, task_id: task_id.to_string() })?;

        task.completed = !task.completed;
        Ok(updated)
    }

    /// Set or clear the issue flag on a stage.
    pub fn with_issue(&self, stage: StageId, has_issue: bool) -> Self {
        let mut updated = self.clone();
        if let Some(target) = updated.stages.get_mut(&stage) {
            target.has_issue = has_issue;
        }
        updated
    }

    /// Mark the given tasks of a stage as done. Unknown ids are skipped.
    pub fn with_completed(&self, stage: StageId, task_ids: &[&str]) -> Self {
        let mut updated = self.clone();
        if let Some(target) = updated.stages.get_mut(&stage) {
            for task in target.tasks.iter_mut().filter(|t| task_ids.contains(&t.id.as_str())) {
                task.completed = true;
            }
        }
        updated
    }

    /// Percentage of completed tasks across all stages.
    pub fn overall_completion(&self) -> f64 {
        let (done, total) = self
            .stages()
            .fold((0, 0), |(d, t), s| (d + s.completed_count(), t + s.total_count()));

        if total == 0 {
            return 0.0;
        }
        done as f64 / total as f64 * 100.0
    }

    /// Stages that are flagged as needing attention.
    pub fn issues(&self) -> Vec<StageId> {
        self.stages().filter(|s| s.has_issue).map(|s| s.id).collect()
    }

    /// Per-stage summaries in pipeline order.
    pub fn stage_summaries(&self) -> Vec<StageSummary> {
        self.stages()
            .map(|s| StageSummary {
                id: s.id,
                label: s.label.clone(),
                completed: s.completed_count(),
                total: s.total_count(),
                percentage: s.completion_percentage(),
                state: s.visual_state(),
                current: s.id == self.current_stage,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_workflow_defaults() {
        let wf = ClientWorkflow::new("42");
        assert_eq!(wf.client_id, "42");
        assert_eq!(wf.current_stage, StageId::Initial);
        assert_eq!(wf.stages().count(), 6);
        assert!(wf.stages().flat_map(|s| &s.tasks).all(|t| !t.completed));
        assert!(wf.issues().is_empty());
    }

    #[test]
    fn test_stages_iterate_in_pipeline_order() {
        let wf = ClientWorkflow::new("1");
        let order: Vec<_> = wf.stages().map(|s| s.id).collect();
        assert_eq!(order, StageId::ALL);
    }

    #[test]
    fn test_toggle_does_not_touch_input() {
        let original = ClientWorkflow::new("1");
        let toggled = original.toggle_task("initial", "2");

        assert!(!original.stage(StageId::Initial).task("2").unwrap().completed);
        assert!(toggled.stage(StageId::Initial).task("2").unwrap().completed);
    }

    #[test]
    fn test_toggle_only_affects_one_task() {
        let original = ClientWorkflow::new("1");
        let toggled = original.toggle_task("planning", "8");

        for stage in toggled.stages() {
            for task in &stage.tasks {
                let expected = stage.id == StageId::Planning && task.id == "8";
                assert_eq!(task.completed, expected, "{}/{}", stage.id, task.id);
            }
        }
    }

    #[test]
    fn test_task_ids_are_scoped_to_stage() {
        // Task "4" exists in assessment, not in initial.
        let wf = ClientWorkflow::new("1");
        assert_eq!(wf.toggle_task("initial", "4"), wf);
        assert_ne!(wf.toggle_task("assessment", "4"), wf);
    }

    #[test]
    fn test_strict_toggle_errors() {
        let wf = ClientWorkflow::new("1");

        assert_eq!(
            wf.try_toggle_task("nowhere", "1"),
            Err(WorkflowError::UnknownStage("nowhere".to_string()))
        );
        assert_eq!(
            wf.try_toggle_task("initial", "99"),
            Err(WorkflowError::TaskNotFound { stage: StageId::Initial, task_id: "99".to_string() })
        );
    }

    #[test]
    fn test_with_issue() {
        let wf = ClientWorkflow::new("1").with_issue(StageId::Transition, true);
        assert_eq!(wf.issues(), vec![StageId::Transition]);
        assert_eq!(wf.stage(StageId::Transition).visual_state(), VisualState::Issue);

        let cleared = wf.with_issue(StageId::Transition, false);
        assert!(cleared.issues().is_empty());
    }

    #[test]
    fn test_overall_completion() {
        let wf = ClientWorkflow::new("1")
            .with_completed(StageId::Initial, &["1", "2", "3"])
            .with_completed(StageId::Assessment, &["4", "5", "6"]);
        assert!((wf.overall_completion() - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(ClientWorkflow::new("1").overall_completion(), 0.0);
    }

    #[test]
    fn test_stage_summaries_mark_current() {
        let wf = ClientWorkflow::starting_at("1", StageId::Planning);
        let summaries = wf.stage_summaries();
        assert_eq!(summaries.len(), 6);
        assert_eq!(summaries.iter().filter(|s| s.current).count(), 1);
        assert!(summaries[2].current);
        assert_eq!(summaries[2].id, StageId::Planning);
    }

    #[test]
    fn test_deserialize_requires_all_stages() {
        let json = r#"{"clientId":"1","currentStage":"initial","stages":{}}"#;
        let result: Result<ClientWorkflow, _> = serde_json::from_str(json);
        assert!(result.is_err());

        let mut moved = serde_json::to_value(ClientWorkflow::new("c")).unwrap();
        moved["stages"]["initial"]["id"] = "planning".into();
        let err = serde_json::from_value::<ClientWorkflow>(moved).unwrap_err();
        assert!(err.to_string().contains("stored under key 'initial'"));

        let mut duplicated = serde_json::to_value(ClientWorkflow::new("c")).unwrap();
        duplicated["stages"]["initial"]["tasks"][1]["id"] = "1".into();
        let err = serde_json::from_value::<ClientWorkflow>(duplicated).unwrap_err();
        assert!(err.to_string().contains("Duplicate task '1' in stage 'initial'"));
    }

    #[test]
    fn test_try_from_snapshot_errors() {
        let mut stages: BTreeMap<_, _> =
            ClientWorkflow::new("c").stages().map(|s| (s.id, s.clone())).collect();
        let planning = stages[&StageId::Planning].clone();
        stages.insert(StageId::Initial, planning);

        let snapshot =
            WorkflowSnapshot { client_id: "c".into(), current_stage: StageId::Initial, stages };
        assert_eq!(
            ClientWorkflow::try_from(snapshot),
            Err(WorkflowError::StageMismatch { key: StageId::Initial, found: StageId::Planning })
        );
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ClientWorkflow::new("7")).unwrap();
        assert_eq!(json["clientId"], "7");
        assert_eq!(json["currentStage"], "initial");
        assert_eq!(json["stages"]["revised-planning"]["label"], "Revised Planning");
        assert_eq!(json["stages"]["initial"]["tasks"][1]["id"], "2");
    }
}
