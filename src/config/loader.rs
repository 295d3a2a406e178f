// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{RawWorkflowFile, WorkflowSpec};
use crate::errors::Result;

/// Load a workflow file from a given path and return the raw `RawWorkflowFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (DAG correctness, etc.). Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawWorkflowFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let raw: RawWorkflowFile = toml::from_str(&contents)?;

    Ok(raw)
}

/// Load a workflow file from path and run validation.
///
/// This is the recommended entry point for embedding applications:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - at least one task and unique task ids,
///   - unknown or self-referencing `dependencies`,
///   - DAG cycles.
///
/// The resulting [`WorkflowSpec`] carries the dependants index the decision
/// engine consumes.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<WorkflowSpec> {
    let raw = load_from_path(&path)?;
    let spec = WorkflowSpec::try_from(raw)?;
    Ok(spec)
}

/// Helper to resolve a default workflow file path.
///
/// Currently this just returns `Workflow.toml` in the current working
/// directory, but this function exists so you can later:
///
/// - Respect an env var (e.g. `DAGDECIDER_WORKFLOW`).
/// - Look for multiple default locations.
pub fn default_workflow_path() -> PathBuf {
    PathBuf::from("Workflow.toml")
}
