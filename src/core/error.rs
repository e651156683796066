//! Store error types.

use thiserror::Error;

use crate::workflow::WorkflowError;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or mutating the entity store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record of this kind carries the given id.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A record or patch failed validation; nothing was changed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Workflow operation failed.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

impl StoreError {
    /// Shorthand for a `NotFound` error.
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { kind, id: id.into() }
    }

    /// Whether this error means the addressed record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
            || matches!(
                self,
                Self::Workflow(WorkflowError::StageNotFound(_) | WorkflowError::TaskNotFound { .. })
            )
    }
}
