//! Caseflow - workflow catalog and case state core
//!
//! The state logic behind a multi-step workflow wizard: a read-only
//! catalog of workflow definitions, an in-memory container of started
//! cases, and an append-only audit trail for the active case. The view
//! layer that renders choices and dispatches user intents lives outside
//! this crate.

pub mod catalog;
pub mod cases;
pub mod config;
pub mod state;

pub use catalog::schema::{StepDefinition, WorkflowDefinition};
pub use catalog::{CatalogError, WorkflowCatalog};
pub use cases::audit::{AuditEntry, WORKFLOW_FINISHED};
pub use cases::case::{Case, CaseStep, StepStatus};
pub use config::Config;
pub use state::State;
