//! Append-only audit trail for the active case

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel step id recorded when a case is finished.
///
/// Distinct from any real step id: real ids are lowercase kebab-case
/// (enforced by catalog validation), so this value can never collide.
pub const WORKFLOW_FINISHED: &str = "WORKFLOW_FINISHED";

/// Immutable record of a single step visit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Id of the visited step, or [`WORKFLOW_FINISHED`] for the terminal entry
    pub step_id: String,
    /// Index of the step within the case at the time of the visit
    pub step_index: usize,
    /// When the visit was recorded
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    /// Record a visit to a step
    pub fn visit(step_id: &str, step_index: usize) -> Self {
        Self {
            step_id: step_id.to_string(),
            step_index,
            timestamp: Utc::now(),
        }
    }

    /// Record the terminal "workflow finished" event
    pub fn finished(step_index: usize) -> Self {
        Self {
            step_id: WORKFLOW_FINISHED.to_string(),
            step_index,
            timestamp: Utc::now(),
        }
    }

    /// Whether this is the terminal entry of a finished case
    pub fn is_terminal(&self) -> bool {
        self.step_id == WORKFLOW_FINISHED
    }
}
