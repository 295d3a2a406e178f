// src/lib.rs

//! `dagdecider` — a deterministic decision engine for DAG-type workflows.
//!
//! Given a declarative workflow specification (a DAG of activity tasks)
//! and the complete event history of one execution, [`build_decisions`]
//! computes the next batch of orchestration decisions: schedule a task,
//! complete the workflow, fail it, or cancel it.
//!
//! The engine holds no state between invocations — every round is
//! recomputed from the full history, so redelivering a decision task or
//! dispatching rounds across workers always converges on the same
//! decisions. Transport, history persistence, and task execution are the
//! embedding application's concern.

pub mod config;
pub mod dag;
pub mod decide;
pub mod errors;
pub mod history;
pub mod logging;
pub mod types;

pub use config::model::{ActivityType, TaskSpec, WorkflowSpec};
pub use decide::{build_decisions, Decision};
pub use errors::{DeciderError, Result};
pub use history::{DecisionTaskWindow, Event};
