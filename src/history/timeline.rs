// src/history/timeline.rs

//! Scheduling-reference resolution and per-task event timelines.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use tracing::trace;

use crate::config::model::WorkflowSpec;
use crate::errors::{DeciderError, Result};
use crate::history::event::{Event, EventAttributes};
use crate::history::window::DecisionTaskWindow;
use crate::types::{EventId, TaskId};

/// Per-task event timelines for one decision round.
///
/// Every activity lifecycle event in the history is resolved back to the
/// event that scheduled its task, then bucketed into that task's ordered
/// timeline. Rebuilt from the full history on every round — holding no
/// cross-round state is what keeps replay deterministic under redelivery
/// and multi-worker dispatch.
pub struct TaskTimelines<'a> {
    /// Lifecycle event id → the event that scheduled its task.
    scheduled: HashMap<EventId, &'a Event>,
    /// Task id → that task's lifecycle events in history order. Every task
    /// in the spec has an entry, possibly empty.
    by_task: BTreeMap<TaskId, Vec<&'a Event>>,
}

impl<'a> TaskTimelines<'a> {
    /// Resolve scheduling references across the entire history and group
    /// lifecycle events by task id.
    pub fn resolve(spec: &WorkflowSpec, window: &'a DecisionTaskWindow) -> Result<Self> {
        let mut scheduled: HashMap<EventId, &Event> = HashMap::new();
        let mut by_task: BTreeMap<TaskId, Vec<&Event>> = spec
            .tasks()
            .iter()
            .map(|t| (t.id.clone(), Vec::new()))
            .collect();

        for event in window.events.iter() {
            if !event.attributes.is_activity_lifecycle() {
                continue;
            }

            let origin = match event.attributes.scheduled_event_id() {
                // The scheduling event is its own origin.
                None => event,
                Some(id) => window.find(id)?,
            };
            scheduled.insert(event.event_id, origin);

            let EventAttributes::ActivityTaskScheduled(attrs) = &origin.attributes else {
                return Err(DeciderError::RoundInconsistency(format!(
                    "event {} resolves to {} event {}, expected ActivityTaskScheduled",
                    event.event_id,
                    origin.attributes.type_name(),
                    origin.event_id
                )));
            };
            let Some(timeline) = by_task.get_mut(&attrs.activity_id) else {
                return Err(DeciderError::UnknownTask(attrs.activity_id.clone()));
            };
            trace!(
                task = %attrs.activity_id,
                event_id = event.event_id,
                kind = event.attributes.type_name(),
                "bucketed lifecycle event"
            );
            timeline.push(event);
        }

        Ok(Self { scheduled, by_task })
    }

    /// Lifecycle events recorded so far for `task`, oldest first.
    pub fn events_for(&self, task: &str) -> &[&'a Event] {
        self.by_task.get(task).map(|t| t.as_slice()).unwrap_or(&[])
    }

    /// Whether `task` has any lifecycle event at all (i.e. it has been
    /// scheduled in some earlier round).
    pub fn has_events(&self, task: &str) -> bool {
        !self.events_for(task).is_empty()
    }

    /// Task id a lifecycle event belongs to, via its scheduling event.
    pub fn task_of(&self, event: &Event) -> Result<&TaskId> {
        let origin = self
            .scheduled
            .get(&event.event_id)
            .ok_or(DeciderError::EventNotFound(event.event_id))?;
        match &origin.attributes {
            EventAttributes::ActivityTaskScheduled(attrs) => Ok(&attrs.activity_id),
            other => Err(DeciderError::RoundInconsistency(format!(
                "scheduling reference of event {} is a {} event",
                event.event_id,
                other.type_name()
            ))),
        }
    }

    /// Whether the latest lifecycle event of `task` is a successful
    /// completion.
    pub fn is_completed(&self, task: &str) -> bool {
        self.events_for(task)
            .last()
            .is_some_and(|e| matches!(e.attributes, EventAttributes::ActivityTaskCompleted(_)))
    }

    /// Whether every task in the spec has completed.
    pub fn all_completed(&self) -> bool {
        self.by_task.keys().all(|task| self.is_completed(task))
    }

    /// Completion payloads keyed by task id; tasks that produced no payload
    /// are omitted.
    pub fn completion_results(&self) -> BTreeMap<TaskId, Value> {
        let mut results = BTreeMap::new();
        for (task, timeline) in self.by_task.iter() {
            let Some(event) = timeline.last() else {
                continue;
            };
            if let EventAttributes::ActivityTaskCompleted(attrs) = &event.attributes {
                if let Some(result) = &attrs.result {
                    results.insert(task.clone(), result.clone());
                }
            }
        }
        results
    }
}
