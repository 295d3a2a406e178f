// src/history/window.rs

//! Event log window extraction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::{DeciderError, Result};
use crate::history::event::{Event, EventAttributes};
use crate::types::{EventId, TaskId};

/// One decision round's view of an execution: the entire history so far
/// plus the two cursor ids delimiting the new slice.
///
/// Supplied fresh by the transport on every invocation and never retained
/// by the engine, so redelivery or multi-worker dispatch can never
/// desynchronize a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionTaskWindow {
    /// Complete ordered event history of the execution.
    pub events: Vec<Event>,
    /// Id of this round's `DecisionTaskStarted` event.
    pub started_event_id: EventId,
    /// Id of the prior round's `DecisionTaskStarted` event; `None` means
    /// "from the beginning".
    #[serde(default)]
    pub previous_started_event_id: Option<EventId>,
}

impl DecisionTaskWindow {
    /// Event with the given id, or a fatal error: an unresolvable id means
    /// the transport delivered a broken window.
    pub fn find(&self, id: EventId) -> Result<&Event> {
        self.events
            .iter()
            .find(|e| e.event_id == id)
            .ok_or(DeciderError::EventNotFound(id))
    }

    fn index_of(&self, id: EventId) -> Result<usize> {
        self.events
            .iter()
            .position(|e| e.event_id == id)
            .ok_or(DeciderError::EventNotFound(id))
    }

    /// The slice of events introduced since the previous round, up to and
    /// including this round's `DecisionTaskStarted` marker.
    ///
    /// The last two events of the slice are always the round-boundary
    /// bookkeeping pair (`DecisionTaskScheduled`, `DecisionTaskStarted`);
    /// callers exclude them from task logic.
    pub fn new_events(&self) -> Result<&[Event]> {
        let current = self.index_of(self.started_event_id)?;
        let first = match self.previous_started_event_id {
            Some(id) => self.index_of(id)? + 1,
            None => 0,
        };
        if first > current {
            return Err(DeciderError::RoundInconsistency(format!(
                "previous round marker {:?} lies after current marker {}",
                self.previous_started_event_id, self.started_event_id
            )));
        }

        let events = &self.events[first..=current];
        let boundary_ok = events.len() >= 2
            && matches!(
                events[events.len() - 2].attributes,
                EventAttributes::DecisionTaskScheduled
            )
            && matches!(
                events[events.len() - 1].attributes,
                EventAttributes::DecisionTaskStarted(_)
            );
        if !boundary_ok {
            return Err(DeciderError::RoundInconsistency(
                "new-event slice does not end with the decision round boundary pair".to_string(),
            ));
        }

        debug!(
            count = events.len(),
            first_id = events[0].event_id,
            last_id = events[events.len() - 1].event_id,
            "extracted new-event slice"
        );
        Ok(events)
    }

    /// Worker identity recorded on this round's `DecisionTaskStarted` event.
    pub fn current_identity(&self) -> Result<Option<&str>> {
        let started = self.find(self.started_event_id)?;
        match &started.attributes {
            EventAttributes::DecisionTaskStarted(attrs) => Ok(attrs.identity.as_deref()),
            other => Err(DeciderError::RoundInconsistency(format!(
                "startedEventId {} refers to a {} event, expected DecisionTaskStarted",
                self.started_event_id,
                other.type_name()
            ))),
        }
    }

    /// The workflow input payload, keyed by task id, carried by the
    /// `WorkflowExecutionStarted` event (always the first event of a
    /// well-formed history).
    pub fn workflow_input(&self) -> Result<&BTreeMap<TaskId, Value>> {
        match self.events.first().map(|e| &e.attributes) {
            Some(EventAttributes::WorkflowExecutionStarted(attrs)) => Ok(&attrs.input),
            _ => Err(DeciderError::RoundInconsistency(
                "history does not begin with WorkflowExecutionStarted".to_string(),
            )),
        }
    }
}
