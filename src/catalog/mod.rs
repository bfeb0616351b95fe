//! Workflow catalog: loading and lookup of workflow definitions
//!
//! Builtin workflows are embedded at compile time; user-defined workflows
//! are loaded from the configured catalog directory. The catalog is
//! read-only once loaded.

pub mod schema;

use once_cell::sync::Lazy;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use schema::WorkflowDefinition;

/// Embedded builtin workflow definitions, parsed once on first use
static BUILTINS: Lazy<Vec<WorkflowDefinition>> = Lazy::new(|| {
    match serde_json::from_str::<Vec<WorkflowDefinition>>(include_str!("builtin/workflows.json")) {
        Ok(workflows) => workflows,
        Err(e) => {
            warn!("Failed to parse builtin workflow catalog: {}", e);
            Vec::new()
        }
    }
});

/// Errors raised while reading a catalog source
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog source {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog source {path}: {source}")]
    Unparseable {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only, ordered collection of workflow definitions
#[derive(Debug, Clone, Default)]
pub struct WorkflowCatalog {
    workflows: Vec<WorkflowDefinition>,
}

impl WorkflowCatalog {
    /// Build a catalog from already-parsed definitions.
    ///
    /// Invalid definitions and duplicate ids are logged and skipped; the
    /// first occurrence of an id wins.
    pub fn from_workflows(workflows: Vec<WorkflowDefinition>) -> Self {
        let mut catalog = Self::default();
        for workflow in workflows {
            catalog.push_unique(workflow);
        }
        catalog
    }

    /// Load the catalog from builtin definitions plus the configured
    /// user workflow directory.
    pub fn load(config: &Config) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();

        if config.catalog.include_builtins {
            for workflow in BUILTINS.iter() {
                catalog.push_unique(workflow.clone());
            }
        }

        let dir = config.workflows_path();
        if dir.exists() {
            catalog.load_dir(&dir)?;
        } else {
            debug!("Workflow directory does not exist: {}", dir.display());
        }

        debug!("Loaded catalog with {} workflows", catalog.len());
        Ok(catalog)
    }

    /// Load the catalog, degrading to an empty catalog when the source is
    /// unavailable.
    ///
    /// The user then simply sees no choices; an unreadable catalog is
    /// never fatal.
    pub fn load_or_empty(config: &Config) -> Self {
        match Self::load(config) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("Catalog unavailable, continuing with empty catalog: {}", e);
                Self::default()
            }
        }
    }

    /// Load a whole-catalog file: a JSON array of workflow definitions
    pub fn load_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;
        let workflows: Vec<WorkflowDefinition> =
            serde_json::from_str(&contents).map_err(|source| CatalogError::Unparseable {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self::from_workflows(workflows))
    }

    /// Scan a directory for `*.json` workflow definition files.
    ///
    /// Each file holds one definition. Unreadable or invalid files are
    /// logged as warnings and skipped.
    fn load_dir(&mut self, dir: &Path) -> Result<(), CatalogError> {
        let entries = fs::read_dir(dir).map_err(|source| CatalogError::Unreadable {
            path: dir.display().to_string(),
            source,
        })?;

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to read workflow directory entry: {}", e);
                    continue;
                }
            };
            let file_path = entry.path();

            // Skip directories and non-JSON files
            if file_path.is_dir() || file_path.extension().is_none_or(|e| e != "json") {
                continue;
            }

            match load_workflow_file(&file_path) {
                Ok(workflow) => {
                    debug!(
                        "Loaded workflow '{}' from {}",
                        workflow.id,
                        file_path.display()
                    );
                    self.push_unique(workflow);
                }
                Err(e) => {
                    warn!("Failed to load workflow from {}: {}", file_path.display(), e);
                }
            }
        }

        Ok(())
    }

    /// Look up a definition by id.
    ///
    /// Absence is a normal state while the user has not yet chosen.
    pub fn find_by_id(&self, id: &str) -> Option<&WorkflowDefinition> {
        self.workflows.iter().find(|w| w.id == id)
    }

    /// Iterate over the definitions in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &WorkflowDefinition> {
        self.workflows.iter()
    }

    /// Number of definitions in the catalog
    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    /// Whether the catalog holds no definitions
    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }

    fn push_unique(&mut self, workflow: WorkflowDefinition) {
        if let Err(errors) = workflow.validate() {
            warn!(
                "Skipping invalid workflow '{}': {}",
                workflow.id,
                errors.join("; ")
            );
            return;
        }
        if self.find_by_id(&workflow.id).is_some() {
            warn!(
                "Skipping workflow '{}': id already present in catalog",
                workflow.id
            );
            return;
        }
        self.workflows.push(workflow);
    }
}

/// Parse a single workflow definition file
fn load_workflow_file(path: &Path) -> Result<WorkflowDefinition, CatalogError> {
    let contents = fs::read_to_string(path).map_err(|source| CatalogError::Unreadable {
        path: path.display().to_string(),
        source,
    })?;
    WorkflowDefinition::from_json(&contents).map_err(|source| CatalogError::Unparseable {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn test_config(dir: &Path) -> Config {
        let mut config = Config::default();
        config.catalog.dir = dir.display().to_string();
        config
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = WorkflowCatalog::load(&Config::default()).unwrap();
        assert!(!catalog.is_empty());

        let maternity = catalog.find_by_id("maternity-leave").unwrap();
        assert_eq!(maternity.name, "Maternity Leave");
        assert_eq!(maternity.step_count(), 8);
        assert_eq!(maternity.first_step().unwrap().actor, "Worker");
    }

    #[test]
    fn test_find_by_id_absence_is_normal() {
        let catalog = WorkflowCatalog::load(&Config::default()).unwrap();
        assert!(catalog.find_by_id("no-such-workflow").is_none());
    }

    #[test]
    fn test_load_skips_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("valid.json"),
            r#"{
                "id": "probation-review",
                "name": "Probation Review",
                "description": "End of probation review",
                "createdDate": "2025-06-05T09:00:00Z",
                "steps": [
                    {"id": "schedule", "actor": "Employer", "description": "Schedule the review"}
                ]
            }"#,
        )
        .unwrap();
        fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut config = test_config(dir.path());
        config.catalog.include_builtins = false;

        let catalog = WorkflowCatalog::load(&config).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.find_by_id("probation-review").is_some());
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let dir = tempfile::tempdir().unwrap();
        // Shadows the builtin maternity-leave workflow
        fs::write(
            dir.path().join("maternity.json"),
            r#"{
                "id": "maternity-leave",
                "name": "Shadowed",
                "description": "Duplicate of the builtin",
                "createdDate": "2025-06-05T09:00:00Z",
                "steps": [
                    {"id": "only", "actor": "Worker", "description": "Single step"}
                ]
            }"#,
        )
        .unwrap();

        let catalog = WorkflowCatalog::load(&test_config(dir.path())).unwrap();
        let maternity = catalog.find_by_id("maternity-leave").unwrap();
        assert_eq!(maternity.name, "Maternity Leave");
        assert_eq!(maternity.step_count(), 8);
    }

    #[test]
    fn test_load_or_empty_degrades_on_unreadable_dir() {
        let dir = tempfile::tempdir().unwrap();
        // Point the catalog dir at a file so read_dir fails
        let not_a_dir = dir.path().join("workflows");
        fs::write(&not_a_dir, "plain file").unwrap();

        let mut config = test_config(&not_a_dir);
        config.catalog.include_builtins = false;

        assert!(WorkflowCatalog::load(&config).is_err());
        let catalog = WorkflowCatalog::load_or_empty(&config);
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_load_file_reads_catalog_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workflows.json");
        fs::write(
            &path,
            r#"[
                {
                    "id": "offboarding",
                    "name": "Offboarding",
                    "description": "Leaver process",
                    "createdDate": "2025-06-05T09:00:00Z",
                    "steps": [
                        {"id": "notice", "actor": "Worker", "description": "Hand in notice"},
                        {"id": "exit-interview", "actor": "Employer", "description": "Hold exit interview"}
                    ]
                }
            ]"#,
        )
        .unwrap();

        let catalog = WorkflowCatalog::load_file(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find_by_id("offboarding").unwrap().step_count(), 2);

        let missing = WorkflowCatalog::load_file(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(CatalogError::Unreadable { .. })));
    }
}
