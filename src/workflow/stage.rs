//! Workflow stages and their checklist tasks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::WorkflowError;

/// One of the six fixed stages, in pipeline order.
///
/// The derived `Ord` follows declaration order, so sorted collections of
/// stage ids iterate the pipeline from first to last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageId {
    Initial,
    Assessment,
    Planning,
    RevisedPlanning,
    Transition,
    Completed,
}

impl StageId {
    /// All stages in pipeline order.
    pub const ALL: [Self; 6] = [
        Self::Initial,
        Self::Assessment,
        Self::Planning,
        Self::RevisedPlanning,
        Self::Transition,
        Self::Completed,
    ];

    /// Wire identifier (`"revised-planning"` etc.).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Assessment => "assessment",
            Self::Planning => "planning",
            Self::RevisedPlanning => "revised-planning",
            Self::Transition => "transition",
            Self::Completed => "completed",
        }
    }

    /// Human-readable stage name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Initial => "Initial Contact",
            Self::Assessment => "Assessment",
            Self::Planning => "Planning",
            Self::RevisedPlanning => "Revised Planning",
            Self::Transition => "Transition",
            Self::Completed => "Completed",
        }
    }

    /// Zero-based position in the pipeline.
    pub fn position(self) -> usize {
        self as usize
    }

    /// The stage after this one, if any.
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.position() + 1).copied()
    }

    /// The stage before this one, if any.
    pub fn previous(self) -> Option<Self> {
        self.position().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// Directed edges of the pipeline, `(source, target)`.
    pub fn edges() -> impl Iterator<Item = (Self, Self)> {
        Self::ALL.into_iter().zip(Self::ALL.into_iter().skip(1))
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageId {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| WorkflowError::UnknownStage(s.to_string()))
    }
}

/// A single checklist item within a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowTask {
    /// Unique within its stage only
    pub id: String,

    /// Display text
    pub label: String,

    /// Whether the item has been checked off
    pub completed: bool,
}

impl WorkflowTask {
    /// Create an open task.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { id: id.into(), label: label.into(), completed: false }
    }
}

/// How a stage should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisualState {
    /// The stage is flagged as needing attention.
    Issue,
    /// Every task in the stage is done.
    Complete,
    /// Anything else, including a stage with no tasks.
    InProgress,
}

impl VisualState {
    /// Display color used by the dashboard for this state.
    pub fn color(self) -> &'static str {
        match self {
            Self::Issue => "#ef4444",
            Self::Complete => "#22c55e",
            Self::InProgress => "#424242",
        }
    }
}

/// One phase of a client's workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStage {
    pub id: StageId,
    pub label: String,

    /// Checklist in display order
    pub tasks: Vec<WorkflowTask>,

    /// Set externally to mark the stage as needing attention
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_issue: bool,
}

impl WorkflowStage {
    /// Create a stage with the given checklist.
    pub fn new(id: StageId, tasks: Vec<WorkflowTask>) -> Self {
        Self { id, label: id.label().to_string(), tasks, has_issue: false }
    }

    /// Number of checked-off tasks.
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// Number of tasks in the stage.
    pub fn total_count(&self) -> usize {
        self.tasks.len()
    }

    /// Percentage of completed tasks, in `[0, 100]`.
    ///
    /// A stage without tasks reports 0.
    pub fn completion_percentage(&self) -> f64 {
        let total = self.total_count();
        if total == 0 {
            return 0.0;
        }
        self.completed_count() as f64 / total as f64 * 100.0
    }

    /// Derived presentation state. The issue flag takes priority over completion.
    pub fn visual_state(&self) -> VisualState {
        if self.has_issue {
            VisualState::Issue
        } else if !self.tasks.is_empty() && self.completed_count() == self.total_count() {
            VisualState::Complete
        } else {
            VisualState::InProgress
        }
    }

    /// Look up a task by id.
    pub fn task(&self, task_id: &str) -> Option<&WorkflowTask> {
        self.tasks.iter().find(|t| t.id == task_id)
    }
}
