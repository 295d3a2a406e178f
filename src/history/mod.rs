// src/history/mod.rs

//! Execution history: typed events, the per-round window, and derived
//! per-task timelines.
//!
//! - [`event`] defines the closed event taxonomy the engine consumes.
//! - [`window`] extracts the slice of events new to the current round.
//! - [`timeline`] resolves scheduling references and groups lifecycle
//!   events per task.

pub mod event;
pub mod timeline;
pub mod window;

pub use event::{Event, EventAttributes, RejectionCause, TimeoutKind};
pub use timeline::TaskTimelines;
pub use window::DecisionTaskWindow;
