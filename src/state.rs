//! Shared wizard state: cases, active selection, and the audit trail
//!
//! [`State`] is the single owner of all mutable session state. Every
//! mutation funnels through the named transition methods; the view layer
//! only reads derived values, which are recomputed on every call rather
//! than cached.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::schema::WorkflowDefinition;
use crate::catalog::WorkflowCatalog;
use crate::cases::audit::AuditEntry;
use crate::cases::case::Case;

/// In-memory state container for the workflow wizard.
///
/// Precondition violations (no selection, no active case, case already
/// finished) are rejected as logged no-ops; none of the transitions can
/// fail or crash.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct State {
    /// Every case started this session, active or not
    cases: Vec<Case>,
    /// Id of the workflow the user currently has selected
    selected_workflow_id: Option<String>,
    /// Id of the case the wizard is currently driving
    active_case_id: Option<String>,
    /// Audit trail for the active selection, append-only
    audit: Vec<AuditEntry>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the active workflow selection.
    ///
    /// Switching to a different workflow drops the active-case pointer and
    /// clears the audit log view; cases already started stay in memory for
    /// the session. Re-selecting the current workflow changes nothing.
    pub fn select_workflow(&mut self, workflow_id: Option<&str>) {
        let next = workflow_id.map(str::to_string);
        if next == self.selected_workflow_id {
            return;
        }
        self.selected_workflow_id = next;
        self.active_case_id = None;
        self.audit.clear();
        debug!(workflow = ?self.selected_workflow_id, "workflow selection changed");
    }

    /// Start a new case for the selected workflow.
    ///
    /// Creates exactly one case with all steps incomplete and the wizard
    /// pointer at step 0, makes it active, and records the first audit
    /// entry. Returns the new case id, or `None` when nothing is selected
    /// or the selection is missing from the catalog.
    pub fn start_case(&mut self, catalog: &WorkflowCatalog) -> Option<String> {
        let Some(workflow) = self.selected_workflow(catalog) else {
            warn!("start_case ignored: no workflow selected");
            return None;
        };

        let mut case = Case::start(workflow);
        let Some(first_step_id) = case.steps.first().map(|s| s.id.clone()) else {
            warn!(workflow = %workflow.id, "start_case ignored: workflow has no steps");
            return None;
        };
        // Timestamp-derived ids collide when two cases start within the
        // same second
        if self.cases.iter().any(|c| c.id == case.id) {
            case.id = format!("{}-{}", case.id, self.cases.len());
        }
        let case_id = case.id.clone();

        // A new active case begins a fresh audit trail
        self.audit.clear();
        self.audit.push(AuditEntry::visit(&first_step_id, 0));
        self.active_case_id = Some(case_id.clone());
        self.cases.push(case);
        debug!(case = %case_id, "case started");
        Some(case_id)
    }

    /// Move the wizard pointer of the active case to `target`.
    ///
    /// `target` is expected to be clamped to the case's step range by the
    /// caller. Moving forward completes the step being left (stamping its
    /// completion time only on the first pass); moving backward revokes
    /// completion of the step being left. Every accepted move appends one
    /// audit entry for the destination step, including `target == current`.
    ///
    /// Ignored when no case is active or the case is finished.
    pub fn go_to_step(&mut self, target: usize) {
        let Some(case) = self.active_case_mut() else {
            warn!("go_to_step ignored: no active case");
            return;
        };
        if case.finished {
            warn!(case = %case.id, "go_to_step ignored: case already finished");
            return;
        }
        let Some(destination) = case.steps.get(target).map(|s| s.id.clone()) else {
            warn!(case = %case.id, step = target, "go_to_step ignored: target outside step range");
            return;
        };

        let current = case.current_step;
        if target > current {
            let step = &mut case.steps[current];
            step.completed = true;
            if step.completed_date.is_none() {
                step.completed_date = Some(Utc::now());
            }
        } else if target < current {
            // Moving backward revokes completion of the step being left
            let step = &mut case.steps[current];
            step.completed = false;
            step.completed_date = None;
        }

        case.current_step = target;
        self.audit.push(AuditEntry::visit(&destination, target));
    }

    /// Advance the wizard one step (the Next action), stopping at the last step
    pub fn advance(&mut self) {
        let target = self
            .active_case()
            .filter(|c| !c.finished && !c.is_last_step())
            .map(|c| c.current_step + 1);
        if let Some(target) = target {
            self.go_to_step(target);
        }
    }

    /// Step the wizard back one step (the Previous action), stopping at step 0
    pub fn retreat(&mut self) {
        let target = self
            .active_case()
            .filter(|c| !c.finished && c.current_step > 0)
            .map(|c| c.current_step - 1);
        if let Some(target) = target {
            self.go_to_step(target);
        }
    }

    /// Finish the active case.
    ///
    /// Valid only while the wizard points at the last step of an
    /// unfinished case: marks the last step completed (stamping its
    /// completion time only if unset), records the finish time, and
    /// appends the terminal audit entry. A finished case is terminal;
    /// later `go_to_step` and `finish` calls are ignored.
    pub fn finish(&mut self) {
        let Some(case) = self.active_case_mut() else {
            warn!("finish ignored: no active case");
            return;
        };
        if case.finished {
            warn!(case = %case.id, "finish ignored: case already finished");
            return;
        }
        if !case.is_last_step() {
            warn!(
                case = %case.id,
                step = case.current_step,
                "finish ignored: wizard is not at the last step"
            );
            return;
        }

        let now = Utc::now();
        let current = case.current_step;
        let step = &mut case.steps[current];
        step.completed = true;
        if step.completed_date.is_none() {
            step.completed_date = Some(now);
        }
        case.finished = true;
        case.finished_date = Some(now);
        debug!(case = %case.id, "case finished");
        self.audit.push(AuditEntry::finished(current));
    }

    /// The definition currently selected, resolved against a catalog snapshot
    pub fn selected_workflow<'a>(
        &self,
        catalog: &'a WorkflowCatalog,
    ) -> Option<&'a WorkflowDefinition> {
        self.selected_workflow_id
            .as_deref()
            .and_then(|id| catalog.find_by_id(id))
    }

    /// Id of the currently selected workflow
    pub fn selected_workflow_id(&self) -> Option<&str> {
        self.selected_workflow_id.as_deref()
    }

    /// The case the wizard is currently driving
    pub fn active_case(&self) -> Option<&Case> {
        let id = self.active_case_id.as_deref()?;
        self.cases.iter().find(|c| c.id == id)
    }

    /// Wizard step pointer for the view: the active case's pointer, or 0
    pub fn current_step(&self) -> usize {
        self.active_case().map_or(0, |c| c.current_step)
    }

    /// Look up any case started this session
    pub fn case(&self, case_id: &str) -> Option<&Case> {
        self.cases.iter().find(|c| c.id == case_id)
    }

    /// All cases started this session, in creation order
    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    /// Audit trail for the active selection
    pub fn audit_log(&self) -> &[AuditEntry] {
        &self.audit
    }

    fn active_case_mut(&mut self) -> Option<&mut Case> {
        let id = self.active_case_id.clone()?;
        self.cases.iter_mut().find(|c| c.id == id)
    }
}
