// src/config/mod.rs

//! Workflow specification files: TOML model, loading, and validation.
//!
//! The decision engine assumes an already-validated acyclic dependency
//! graph; every load-time check (unique ids, resolvable dependencies,
//! acyclicity) lives here, never in the engine.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{ActivityType, RawTaskSpec, RawWorkflowFile, TaskSpec, WorkflowSpec};
