//! Schema definitions for workflow templates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable template describing an ordered multi-actor process
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    /// Unique workflow id (e.g., "maternity-leave")
    pub id: String,
    /// Display name of the workflow
    pub name: String,
    /// Brief description of the process
    pub description: String,
    /// Ordered steps of the process
    pub steps: Vec<StepDefinition>,
    /// When the definition was authored
    pub created_date: DateTime<Utc>,
    /// Optional deadline for completing a case of this workflow
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// Schema definition for a single step in a workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDefinition {
    /// Step identifier (unique within the workflow)
    pub id: String,
    /// Role responsible for the step (e.g., "Employer", "Worker")
    pub actor: String,
    /// What the actor has to do in this step
    pub description: String,
}

impl WorkflowDefinition {
    /// Parse a workflow definition from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Validate the definition for consistency
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        // Check id format
        if self.id.is_empty() {
            errors.push("Workflow id must not be empty".to_string());
        } else if !self
            .id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            errors.push(format!(
                "Workflow id '{}' must be lowercase letters, digits, and hyphens only",
                self.id
            ));
        }

        // A workflow without steps cannot be walked
        if self.steps.is_empty() {
            errors.push(format!("Workflow '{}' must have at least one step", self.id));
        }

        // Check step ids are present and unique
        let mut seen: Vec<&str> = Vec::new();
        for step in &self.steps {
            if step.id.is_empty() {
                errors.push(format!("Workflow '{}' has a step with an empty id", self.id));
                continue;
            }
            if seen.contains(&step.id.as_str()) {
                errors.push(format!(
                    "Workflow '{}' has duplicate step id '{}'",
                    self.id, step.id
                ));
            }
            seen.push(&step.id);

            if step.actor.is_empty() {
                errors.push(format!(
                    "Step '{}' in workflow '{}' must name an actor",
                    step.id, self.id
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Get step by id
    pub fn get_step(&self, id: &str) -> Option<&StepDefinition> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Get the first step (entry point)
    pub fn first_step(&self) -> Option<&StepDefinition> {
        self.steps.first()
    }

    /// Number of steps in the workflow
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}
