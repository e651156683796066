//! Workflow Integration Tests
//!
//! Checks the workflow properties through the public API: completion
//! arithmetic, toggle identities, visual state precedence and the registry's
//! version counter.

use pathways::workflow::{
    default_stage, ClientWorkflow, StageId, VisualState, WorkflowError, WorkflowRegistry,
    WorkflowStage, WorkflowTask,
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ============================================================================
// Completion & Visual State
// ============================================================================

mod completion {
    use super::*;

    #[test]
    fn test_completion_bounds_for_every_prefix() {
        for done in 0..=3 {
            let ids: Vec<&str> = ["1", "2", "3"].into_iter().take(done).collect();
            let wf = ClientWorkflow::new("c").with_completed(StageId::Initial, &ids);
            let pct = wf.stage(StageId::Initial).completion_percentage();

            assert!((0.0..=100.0).contains(&pct));
            assert!(approx(pct, 100.0 * done as f64 / 3.0));
        }
    }

    #[test]
    fn test_empty_stage_is_zero_percent_in_progress() {
        let stage = WorkflowStage::new(StageId::Completed, Vec::new());
        assert!(approx(stage.completion_percentage(), 0.0));
        assert_eq!(stage.visual_state(), VisualState::InProgress);
    }

    #[test]
    fn test_toggle_second_initial_task() {
        let wf = ClientWorkflow::new("c").toggle_task("initial", "2");
        let pct = wf.stage(StageId::Initial).completion_percentage();
        assert!(approx(pct, 100.0 / 3.0));
    }

    #[test]
    fn test_issue_beats_complete() {
        let wf = ClientWorkflow::new("c")
            .with_completed(StageId::Planning, &["7", "8", "9"])
            .with_issue(StageId::Planning, true);
        assert_eq!(wf.stage(StageId::Planning).visual_state(), VisualState::Issue);

        let cleared = wf.with_issue(StageId::Planning, false);
        assert_eq!(cleared.stage(StageId::Planning).visual_state(), VisualState::Complete);
    }

    #[test]
    fn test_transition_with_issue_partially_done() {
        let wf = ClientWorkflow::starting_at("c", StageId::Transition)
            .with_completed(StageId::Transition, &["13"])
            .with_issue(StageId::Transition, true);

        let stage = wf.stage(StageId::Transition);
        assert!(approx(stage.completion_percentage(), 100.0 / 3.0));
        assert_eq!(stage.visual_state(), VisualState::Issue);
    }

    #[test]
    fn test_custom_stage_counts() {
        let mut tasks = default_stage(StageId::Assessment).tasks;
        tasks.push(WorkflowTask::new("extra", "Call family doctor"));
        tasks[0].completed = true;

        let stage = WorkflowStage::new(StageId::Assessment, tasks);
        assert_eq!(stage.completed_count(), 1);
        assert_eq!(stage.total_count(), 4);
        assert!(approx(stage.completion_percentage(), 25.0));
    }
}

// ============================================================================
// Toggle Semantics
// ============================================================================

mod toggling {
    use super::*;

    #[test]
    fn test_fresh_workflow_shape() {
        let wf = ClientWorkflow::new("c");
        assert_eq!(wf.current_stage, StageId::Initial);
        assert_eq!(wf.stages().map(|s| s.id).collect::<Vec<_>>(), StageId::ALL.to_vec());
        assert!(wf.stages().all(|s| s.completed_count() == 0));
    }

    #[test]
    fn test_double_toggle_is_identity_everywhere() {
        let base = ClientWorkflow::new("c").with_completed(StageId::Assessment, &["5"]);
        for stage in base.stages() {
            for task in &stage.tasks {
                let twice = base
                    .toggle_task(stage.id.as_str(), &task.id)
                    .toggle_task(stage.id.as_str(), &task.id);
                assert_eq!(twice, base);
            }
        }
    }

    #[test]
    fn test_toggle_leaves_input_untouched() {
        let base = ClientWorkflow::new("c");
        let toggled = base.toggle_task("planning", "8");

        assert_eq!(base.stage(StageId::Planning).completed_count(), 0);
        assert_eq!(toggled.stage(StageId::Planning).completed_count(), 1);
        assert_eq!(toggled.current_stage, base.current_stage);
    }

    #[test]
    fn test_toggle_only_changes_one_task() {
        let base = ClientWorkflow::new("c");
        let toggled = base.toggle_task("transition", "14");

        let changed: Vec<_> = base
            .stages()
            .zip(toggled.stages())
            .flat_map(|(a, b)| a.tasks.iter().zip(&b.tasks))
            .filter(|(a, b)| a.completed != b.completed)
            .map(|(a, _)| a.id.clone())
            .collect();
        assert_eq!(changed, vec!["14".to_string()]);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let base = ClientWorkflow::new("c");
        assert_eq!(base.toggle_task("nowhere", "1"), base);
        assert_eq!(base.toggle_task("initial", "4"), base);
        assert_eq!(base.toggle_task("Initial", "1"), base);
    }

    #[test]
    fn test_strict_toggle_reports_unknown_ids() {
        let base = ClientWorkflow::new("c");
        assert_eq!(
            base.try_toggle_task("nowhere", "1"),
            Err(WorkflowError::UnknownStage("nowhere".into()))
        );
        assert_eq!(
            base.try_toggle_task("initial", "4"),
            Err(WorkflowError::TaskNotFound { stage: StageId::Initial, task_id: "4".into() })
        );
    }

    #[test]
    fn test_task_completion_never_advances_stage() {
        let ids = ["1", "2", "3"];
        let done = ids.iter().fold(ClientWorkflow::new("c"), |wf, id| wf.toggle_task("initial", id));
        assert_eq!(done.stage(StageId::Initial).visual_state(), VisualState::Complete);
        assert_eq!(done.current_stage, StageId::Initial);
    }
}

// ============================================================================
// Registry & Versions
// ============================================================================

mod registry {
    use super::*;

    #[test]
    fn test_one_workflow_per_client() {
        let mut registry = WorkflowRegistry::new();
        registry.toggle_task("a", "initial", "1", None).unwrap();
        registry.get_or_create("a");
        registry.get_or_create("b");

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("a").unwrap().workflow.stage(StageId::Initial).completed_count(), 1);
    }

    #[test]
    fn test_version_counts_effective_changes() {
        let mut registry = WorkflowRegistry::new();
        assert_eq!(registry.toggle_task("a", "initial", "1", None).unwrap().version, 1);
        assert_eq!(registry.toggle_task("a", "initial", "99", None).unwrap().version, 1);
        assert_eq!(registry.set_issue("a", StageId::Initial, false, None).unwrap().version, 1);
        assert_eq!(registry.set_issue("a", StageId::Initial, true, Some(1)).unwrap().version, 2);
    }

    #[test]
    fn test_stale_writer_is_rejected() {
        let mut registry = WorkflowRegistry::new();
        let seen = registry.get_or_create("a").version;

        registry.toggle_task("a", "assessment", "4", Some(seen)).unwrap();
        let err = registry.toggle_task("a", "assessment", "5", Some(seen)).unwrap_err();

        assert_eq!(err, WorkflowError::VersionConflict { expected: 0, actual: 1 });
        let stored = &registry.get("a").unwrap().workflow;
        assert!(!stored.stage(StageId::Assessment).tasks[1].completed);
    }

    #[test]
    fn test_workflow_json_round_trip_keeps_invariant() {
        let wf = ClientWorkflow::new("c").toggle_task("completed", "17");
        let json = serde_json::to_string(&wf).unwrap();
        let back: ClientWorkflow = serde_json::from_str(&json).unwrap();
        assert_eq!(back, wf);

        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["stages"].as_object_mut().unwrap().remove("planning");
        assert!(serde_json::from_value::<ClientWorkflow>(value).is_err());
    }

    #[test]
    fn test_loaded_workflow_keeps_one_entry_per_stage() {
        let mut value = serde_json::to_value(ClientWorkflow::new("c")).unwrap();
        value["stages"]["transition"]["id"] = "completed".into();
        assert!(serde_json::from_value::<ClientWorkflow>(value).is_err());

        let mut value = serde_json::to_value(ClientWorkflow::new("c")).unwrap();
        value["stages"]["planning"]["tasks"][2]["id"] = "7".into();
        assert!(serde_json::from_value::<ClientWorkflow>(value).is_err());
    }
}
