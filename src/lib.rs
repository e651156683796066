//! # Pathways
//!
//! Client case management for a senior-care placement service.
//!
//! Representatives move clients through a fixed six-stage workflow
//! (Initial Contact, Assessment, Planning, Revised Planning, Transition,
//! Completed), each stage carrying a small checklist. Around the workflow sit
//! the records a representative works with: clients, partner companies and
//! their contacts, case tasks, meetings and dashboard users.
//!
//! ## Layout
//!
//! - [`workflow`]: stages, checklists, completion and visual state, and the
//!   per-client workflow registry
//! - [`core`]: entity records, the in-memory [`Store`], role-based view
//!   filtering and configuration
//! - [`api`]: an in-process request dispatcher speaking the dashboard's JSON
//!   envelope
//!
//! ## Quick Start
//!
//! ```
//! use pathways::{Store, StageId};
//!
//! let mut store = Store::seeded();
//! let entry = store.toggle_workflow_task("1", "initial", "2", None).unwrap();
//! let initial = entry.workflow.stage(StageId::Initial);
//! assert_eq!(initial.completed_count(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::significant_drop_tightening)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::use_self)]

pub mod api;
pub mod core;
pub mod workflow;

// Re-export commonly used types
pub use api::{ApiError, ApiRequest, ApiResponse, ApiService};
pub use crate::core::{Actor, Config, Store, StoreError, ViewFilter};
pub use workflow::{ClientWorkflow, StageId, VisualState, WorkflowError, WorkflowRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "pathways";
