//! Default checklist for each stage.

use super::{StageId, WorkflowStage, WorkflowTask};

/// Task ids and labels per stage. Ids run across the whole pipeline.
const TEMPLATE: [(StageId, [(&str, &str); 3]); 6] = [
    (
        StageId::Initial,
        [
            ("1", "Gather contact information"),
            ("2", "Initial phone consultation"),
            ("3", "Schedule first meeting"),
        ],
    ),
    (
        StageId::Assessment,
        [
            ("4", "Conduct needs assessment"),
            ("5", "Document client preferences"),
            ("6", "Review financial situation"),
        ],
    ),
    (
        StageId::Planning,
        [
            ("7", "Research suitable facilities"),
            ("8", "Schedule facility tours"),
            ("9", "Review care options"),
        ],
    ),
    (
        StageId::RevisedPlanning,
        [
            ("10", "Update care plan"),
            ("11", "Adjust recommendations"),
            ("12", "Review changes with client"),
        ],
    ),
    (
        StageId::Transition,
        [
            ("13", "Coordinate move-in date"),
            ("14", "Arrange transportation"),
            ("15", "Setup support services"),
        ],
    ),
    (
        StageId::Completed,
        [
            ("16", "Final documentation"),
            ("17", "Follow-up schedule"),
            ("18", "Client satisfaction survey"),
        ],
    ),
];

/// Fresh stage with every task open.
pub fn default_stage(id: StageId) -> WorkflowStage {
    let tasks = TEMPLATE
        .iter()
        .find(|(stage, _)| *stage == id)
        .map(|(_, tasks)| tasks.iter().map(|(id, label)| WorkflowTask::new(*id, *label)).collect())
        .unwrap_or_default();

    WorkflowStage::new(id, tasks)
}

/// All six fresh stages in pipeline order.
pub fn default_stages() -> Vec<WorkflowStage> {
    StageId::ALL.into_iter().map(default_stage).collect()
}
