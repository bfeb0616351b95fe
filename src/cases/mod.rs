//! Case tracking for started workflow instances
//!
//! A case is created when the user starts a workflow from the catalog;
//! it lives in memory for the session and records per-step completion.

pub mod audit;
pub mod case;

pub use audit::{AuditEntry, WORKFLOW_FINISHED};
pub use case::{Case, CaseStep, StepStatus};
