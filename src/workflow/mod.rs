//! Per-client case workflow.
//!
//! Every client moves through the same fixed six-stage pipeline:
//!
//! ```text
//! initial -> assessment -> planning -> revised-planning -> transition -> completed
//! ```
//!
//! Each stage carries an ordered checklist of tasks. Completion and the
//! visual state of a stage are always derived from its data, never stored.
//!
//! - `WorkflowStage` / `StageId` - stage data and the fixed ordering
//! - `ClientWorkflow` - one client's six stages, updated by immutable snapshots
//! - `WorkflowRegistry` - lazily creates and versions one workflow per client

mod model;
mod registry;
mod stage;
mod template;

use thiserror::Error;

pub use model::{ClientWorkflow, StageSummary};
pub use registry::{VersionedWorkflow, WorkflowRegistry};
pub use stage::{StageId, VisualState, WorkflowStage, WorkflowTask};
pub use template::{default_stage, default_stages};

/// Result type for strict workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Errors reported by the strict workflow operations.
///
/// The lenient operations (`ClientWorkflow::toggle_task` and friends) never
/// surface these; they return the workflow unchanged instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Text that does not name one of the six stages.
    #[error("Unknown workflow stage: {0}")]
    UnknownStage(String),

    /// Stage id is valid but missing from the workflow.
    #[error("Stage not found: {0}")]
    StageNotFound(StageId),

    /// No task with this id in the stage.
    #[error("Task '{task_id}' not found in stage '{stage}'")]
    TaskNotFound { stage: StageId, task_id: String },

    /// A stage stored under another stage's key.
    #[error("Stage '{found}' stored under key '{key}'")]
    StageMismatch { key: StageId, found: StageId },

    /// Two tasks in one stage share an id.
    #[error("Duplicate task '{task_id}' in stage '{stage}'")]
    DuplicateTask { stage: StageId, task_id: String },

    /// Caller's expected version does not match the stored one.
    #[error("Workflow version conflict: expected {expected}, found {actual}")]
    VersionConflict { expected: u64, actual: u64 },
}
