// src/decide/builder.rs

//! Decision building for one round.
//!
//! [`build_decisions`] is the engine entry point: a pure function from
//! (spec, window) to an ordered decision list. Everything is recomputed
//! from the full history on every invocation — the engine holds no state
//! between rounds, so redelivery or multi-worker dispatch can never
//! desynchronize it.

use serde_json::Value;
use tracing::{debug, info};

use crate::config::model::{TaskSpec, WorkflowSpec};
use crate::dag::ready::ReadyTracker;
use crate::decide::classifier::{classify, Classification};
use crate::decide::decision::{CompleteWorkflowAttributes, Decision, ScheduleTaskAttributes};
use crate::errors::Result;
use crate::history::timeline::TaskTimelines;
use crate::history::window::DecisionTaskWindow;

/// Compute one round of decisions for `spec` against `window`.
///
/// Per round, in order:
/// 1. resolve scheduling references and per-task timelines,
/// 2. extract the new-event slice,
/// 3. classify error-class events (terminal decision or benign race ends
///    the round immediately),
/// 4. replay the remaining new events through the ready tracker,
/// 5. emit one `ScheduleTask` per ready task, in spec declaration order,
/// 6. if every task has completed, the round collapses to a single
///    `CompleteWorkflow` carrying the per-task results.
///
/// An empty list is a valid outcome: no new commitments this round.
pub fn build_decisions(spec: &WorkflowSpec, window: &DecisionTaskWindow) -> Result<Vec<Decision>> {
    let timelines = TaskTimelines::resolve(spec, window)?;
    let new_events = window.new_events()?;
    // Strip the round-boundary bookkeeping pair.
    let task_events = &new_events[..new_events.len() - 2];

    match classify(window, task_events)? {
        Classification::BenignRace => return Ok(Vec::new()),
        Classification::Terminal(decision) => return Ok(vec![decision]),
        Classification::Proceed => {}
    }

    let mut tracker = ReadyTracker::new(spec, &timelines);
    for event in task_events {
        tracker.apply(event)?;
    }

    let input = window.workflow_input()?;
    let mut decisions = Vec::new();
    for task in tracker.ready_tasks() {
        debug!(task = %task.id, workflow = %spec.name(), "scheduling task");
        decisions.push(schedule_task(task, input.get(task.id.as_str()).cloned()));
    }

    if timelines.all_completed() {
        let result = timelines.completion_results();
        info!(
            workflow = %spec.name(),
            tasks = spec.tasks().len(),
            "every task complete; completing workflow"
        );
        // Completion subsumes any scheduling computed this round.
        return Ok(vec![Decision::CompleteWorkflow(CompleteWorkflowAttributes {
            result,
        })]);
    }

    Ok(decisions)
}

fn schedule_task(task: &TaskSpec, input: Option<Value>) -> Decision {
    Decision::ScheduleTask(ScheduleTaskAttributes {
        task_id: task.id.clone(),
        activity_type: task.activity_type.clone(),
        input,
        heartbeat_timeout: task.heartbeat_timeout,
        task_timeout: task.task_timeout,
        task_queue: task.task_queue.clone(),
        priority: task.priority,
    })
}
