// src/decide/mod.rs

//! Decision building: the error classifier and the per-round orchestrator.

pub mod builder;
pub mod classifier;
pub mod decision;

pub use builder::build_decisions;
pub use classifier::Classification;
pub use decision::{
    CompleteWorkflowAttributes, Decision, FailWorkflowAttributes, ScheduleTaskAttributes,
};
