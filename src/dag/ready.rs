// src/dag/ready.rs

//! Per-round ready-set tracking for tasks.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::config::model::{TaskSpec, WorkflowSpec};
use crate::dag::graph::DependantsKey;
use crate::errors::Result;
use crate::history::event::{Event, EventAttributes};
use crate::history::timeline::TaskTimelines;
use crate::types::TaskId;

/// Lifecycle state of a single task, derived from the timelines and the
/// current round's ready set.
///
/// This is exposed for tests and diagnostics; the tracker itself only ever
/// moves tasks towards `Ready`. Failures and time-outs never surface here —
/// they are absorbed by the global fail path before the tracker runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Waiting on at least one dependency.
    Blocked,
    /// All dependencies satisfied; not yet scheduled.
    Ready,
    /// A scheduling event exists in the task's timeline.
    Scheduled,
    /// Latest timeline event is a successful completion.
    Completed,
}

/// Tracks which tasks become ready as the new-event slice is replayed.
///
/// Holds no state between rounds: it reads the immutable spec and the
/// timelines rebuilt for this round, and accumulates this round's ready
/// set.
pub struct ReadyTracker<'a> {
    spec: &'a WorkflowSpec,
    timelines: &'a TaskTimelines<'a>,
    ready: HashSet<TaskId>,
}

impl<'a> ReadyTracker<'a> {
    pub fn new(spec: &'a WorkflowSpec, timelines: &'a TaskTimelines<'a>) -> Self {
        Self {
            spec,
            timelines,
            ready: HashSet::new(),
        }
    }

    /// Apply a single new event, promoting tasks to `Ready` where a
    /// transition fires.
    ///
    /// - `WorkflowExecutionStarted` readies every task with no
    ///   dependencies.
    /// - `ActivityTaskCompleted` readies each dependant of the completed
    ///   task whose dependencies have all completed.
    ///
    /// Everything else leaves the ready set untouched.
    pub fn apply(&mut self, event: &Event) -> Result<()> {
        let graph = self.spec.graph();
        match &event.attributes {
            EventAttributes::WorkflowExecutionStarted(_) => {
                for id in graph.dependants_of(DependantsKey::Root) {
                    self.mark_ready(id);
                }
            }
            EventAttributes::ActivityTaskCompleted(_) => {
                let completed = self.timelines.task_of(event)?.clone();
                debug!(task = %completed, "task completed; checking dependants");
                for id in graph.dependants_of(DependantsKey::Task(&completed)) {
                    if self.deps_satisfied(id) {
                        self.mark_ready(id);
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Whether all declared dependencies of `task` show a completion as
    /// their latest timeline event.
    fn deps_satisfied(&self, task: &str) -> bool {
        let Some(spec) = self.spec.task(task) else {
            // Should not happen with a validated spec, but be defensive.
            warn!(task = %task, "dependant not present in workflow spec");
            return false;
        };
        spec.dependencies
            .iter()
            .all(|dep| self.timelines.is_completed(dep))
    }

    fn mark_ready(&mut self, task: &TaskId) {
        // Scheduled at most once: any existing timeline event means an
        // earlier round already scheduled this task.
        if self.timelines.has_events(task) {
            debug!(task = %task, "already has lifecycle events; skipping ready transition");
            return;
        }
        if self.ready.insert(task.clone()) {
            debug!(task = %task, "dependencies satisfied; marking Ready");
        }
    }

    /// Ready tasks in spec declaration order.
    ///
    /// Declaration order is the documented emission order for
    /// independently-ready tasks, keeping decision lists deterministic.
    pub fn ready_tasks(&self) -> impl Iterator<Item = &'a TaskSpec> + '_ {
        self.spec
            .tasks()
            .iter()
            .filter(|t| self.ready.contains(&t.id))
    }

    /// Read-only view of a task's derived state.
    pub fn state_of(&self, task: &str) -> TaskState {
        if self.timelines.is_completed(task) {
            TaskState::Completed
        } else if self.timelines.has_events(task) {
            TaskState::Scheduled
        } else if self.ready.contains(task) {
            TaskState::Ready
        } else {
            TaskState::Blocked
        }
    }
}
