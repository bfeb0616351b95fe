//! Case instances: started executions of a workflow definition

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::schema::WorkflowDefinition;

/// One user's in-progress or completed instantiation of a workflow.
///
/// The step sequence mirrors the defining workflow's steps at creation
/// time and never changes shape afterward; only the per-step completion
/// state and the wizard pointer mutate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    /// Unique case id, derived from the workflow id and creation timestamp
    pub id: String,
    /// Id of the defining workflow (a reference, not ownership)
    pub workflow_id: String,
    /// When the case was started
    pub started_date: DateTime<Utc>,
    /// Per-step completion state, one entry per definition step
    pub steps: Vec<CaseStep>,
    /// Index of the step the wizard currently points at
    pub current_step: usize,
    /// Whether the case has been finished
    pub finished: bool,
    /// When the case was finished
    #[serde(default)]
    pub finished_date: Option<DateTime<Utc>>,
}

/// Completion state of a single step within a case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseStep {
    /// Step id matching the definition's step
    pub id: String,
    /// Whether the step has been completed
    pub completed: bool,
    /// When the step was completed; set once per forward pass, cleared
    /// when the step is revisited by moving backward
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
}

/// Display category for a step, derived from the case's pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Not yet reached
    Todo,
    /// The step the wizard currently points at
    Doing,
    /// Completed
    Done,
}

impl Case {
    /// Start a new case from a workflow definition.
    ///
    /// All steps begin incomplete with the wizard pointer at step 0.
    pub fn start(workflow: &WorkflowDefinition) -> Self {
        let now = Utc::now();
        Self {
            id: format!("{}-{}", workflow.id, now.format("%Y%m%d%H%M%S")),
            workflow_id: workflow.id.clone(),
            started_date: now,
            steps: workflow
                .steps
                .iter()
                .map(|s| CaseStep {
                    id: s.id.clone(),
                    completed: false,
                    completed_date: None,
                })
                .collect(),
            current_step: 0,
            finished: false,
            finished_date: None,
        }
    }

    /// Number of steps in the case
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Whether the wizard pointer is at the last step
    pub fn is_last_step(&self) -> bool {
        self.current_step + 1 == self.steps.len()
    }

    /// Wizard progress as (current index, total steps)
    pub fn progress(&self) -> (usize, usize) {
        (self.current_step, self.steps.len())
    }

    /// Display category for the step at `index`
    pub fn step_status(&self, index: usize) -> StepStatus {
        match self.steps.get(index) {
            Some(step) if step.completed => StepStatus::Done,
            Some(_) if index == self.current_step => StepStatus::Doing,
            _ => StepStatus::Todo,
        }
    }

    /// Format step progress for display
    /// Returns something like: "notify-employer > [acknowledge-notification] > provide-matb1"
    pub fn format_progress(&self) -> String {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                if i == self.current_step {
                    format!("[{}]", step.id)
                } else {
                    step.id.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" > ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::schema::StepDefinition;

    fn make_test_workflow() -> WorkflowDefinition {
        WorkflowDefinition {
            id: "onboarding".to_string(),
            name: "Onboarding".to_string(),
            description: "New starter onboarding".to_string(),
            steps: vec![
                StepDefinition {
                    id: "send-contract".to_string(),
                    actor: "Employer".to_string(),
                    description: "Send the contract".to_string(),
                },
                StepDefinition {
                    id: "sign-contract".to_string(),
                    actor: "Worker".to_string(),
                    description: "Sign the contract".to_string(),
                },
                StepDefinition {
                    id: "first-day".to_string(),
                    actor: "Worker".to_string(),
                    description: "Attend the first day".to_string(),
                },
            ],
            created_date: Utc::now(),
            due_date: None,
        }
    }

    #[test]
    fn test_start_mirrors_definition() {
        let workflow = make_test_workflow();
        let case = Case::start(&workflow);

        assert_eq!(case.workflow_id, "onboarding");
        assert_eq!(case.step_count(), workflow.step_count());
        assert_eq!(case.current_step, 0);
        assert!(!case.finished);
        assert!(case.finished_date.is_none());
        for (case_step, def_step) in case.steps.iter().zip(&workflow.steps) {
            assert_eq!(case_step.id, def_step.id);
            assert!(!case_step.completed);
            assert!(case_step.completed_date.is_none());
        }
    }

    #[test]
    fn test_case_id_derives_from_workflow() {
        let case = Case::start(&make_test_workflow());
        assert!(case.id.starts_with("onboarding-"));
        assert!(case.id.len() > "onboarding-".len());
    }

    #[test]
    fn test_step_status_derivation() {
        let mut case = Case::start(&make_test_workflow());
        assert_eq!(case.step_status(0), StepStatus::Doing);
        assert_eq!(case.step_status(1), StepStatus::Todo);

        case.steps[0].completed = true;
        case.current_step = 1;
        assert_eq!(case.step_status(0), StepStatus::Done);
        assert_eq!(case.step_status(1), StepStatus::Doing);
        assert_eq!(case.step_status(2), StepStatus::Todo);
    }

    #[test]
    fn test_format_progress() {
        let mut case = Case::start(&make_test_workflow());
        case.current_step = 1;
        let progress = case.format_progress();
        assert!(progress.contains("[sign-contract]"));
        assert!(progress.contains("send-contract >"));
    }

    #[test]
    fn test_is_last_step() {
        let mut case = Case::start(&make_test_workflow());
        assert!(!case.is_last_step());
        case.current_step = 2;
        assert!(case.is_last_step());
    }
}
