// src/history/event.rs

//! Typed history events.
//!
//! Every event kind the engine consumes is a variant of [`EventAttributes`]
//! carrying its own typed attribute record; the transport tags events by
//! `eventType`, which maps onto the variant name. Event kinds the engine
//! does not know deserialize to [`EventAttributes::Unrecognized`] and are
//! ignored, not errors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::model::ActivityType;
use crate::types::{EventId, TaskId};

/// One history event of a workflow execution.
///
/// Events are immutable, append-only, and never reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub event_id: EventId,
    #[serde(flatten)]
    pub attributes: EventAttributes,
}

/// Event payload, tagged by event kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "eventType", content = "attributes")]
pub enum EventAttributes {
    WorkflowExecutionStarted(WorkflowExecutionStartedAttributes),
    WorkflowExecutionCancelRequested,
    WorkflowExecutionTimedOut,

    ActivityTaskScheduled(ActivityTaskScheduledAttributes),
    ActivityTaskStarted(ActivityTaskStartedAttributes),
    ActivityTaskCompleted(ActivityTaskCompletedAttributes),
    ActivityTaskFailed(ActivityTaskFailedAttributes),
    ActivityTaskTimedOut(ActivityTaskTimedOutAttributes),

    DecisionTaskScheduled,
    DecisionTaskStarted(DecisionTaskStartedAttributes),
    DecisionTaskCompleted(DecisionTaskCompletedAttributes),
    DecisionTaskTimedOut,

    // Rejections: a previously submitted decision was refused by the
    // orchestration backend.
    ScheduleActivityTaskFailed(DecisionRejectedAttributes),
    RequestCancelActivityTaskFailed(DecisionRejectedAttributes),
    StartTimerFailed(DecisionRejectedAttributes),
    CancelTimerFailed(DecisionRejectedAttributes),
    CompleteWorkflowExecutionFailed(DecisionRejectedAttributes),
    FailWorkflowExecutionFailed(DecisionRejectedAttributes),
    CancelWorkflowExecutionFailed(DecisionRejectedAttributes),

    MarkerRecorded(MarkerRecordedAttributes),
    RecordMarkerFailed(RecordMarkerFailedAttributes),

    /// Any event kind this engine does not consume.
    #[serde(other)]
    Unrecognized,
}

impl EventAttributes {
    /// Event kind name, for logs and error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            EventAttributes::WorkflowExecutionStarted(_) => "WorkflowExecutionStarted",
            EventAttributes::WorkflowExecutionCancelRequested => {
                "WorkflowExecutionCancelRequested"
            }
            EventAttributes::WorkflowExecutionTimedOut => "WorkflowExecutionTimedOut",
            EventAttributes::ActivityTaskScheduled(_) => "ActivityTaskScheduled",
            EventAttributes::ActivityTaskStarted(_) => "ActivityTaskStarted",
            EventAttributes::ActivityTaskCompleted(_) => "ActivityTaskCompleted",
            EventAttributes::ActivityTaskFailed(_) => "ActivityTaskFailed",
            EventAttributes::ActivityTaskTimedOut(_) => "ActivityTaskTimedOut",
            EventAttributes::DecisionTaskScheduled => "DecisionTaskScheduled",
            EventAttributes::DecisionTaskStarted(_) => "DecisionTaskStarted",
            EventAttributes::DecisionTaskCompleted(_) => "DecisionTaskCompleted",
            EventAttributes::DecisionTaskTimedOut => "DecisionTaskTimedOut",
            EventAttributes::ScheduleActivityTaskFailed(_) => "ScheduleActivityTaskFailed",
            EventAttributes::RequestCancelActivityTaskFailed(_) => {
                "RequestCancelActivityTaskFailed"
            }
            EventAttributes::StartTimerFailed(_) => "StartTimerFailed",
            EventAttributes::CancelTimerFailed(_) => "CancelTimerFailed",
            EventAttributes::CompleteWorkflowExecutionFailed(_) => {
                "CompleteWorkflowExecutionFailed"
            }
            EventAttributes::FailWorkflowExecutionFailed(_) => "FailWorkflowExecutionFailed",
            EventAttributes::CancelWorkflowExecutionFailed(_) => "CancelWorkflowExecutionFailed",
            EventAttributes::MarkerRecorded(_) => "MarkerRecorded",
            EventAttributes::RecordMarkerFailed(_) => "RecordMarkerFailed",
            EventAttributes::Unrecognized => "Unrecognized",
        }
    }

    /// Whether this event belongs to the activity task lifecycle
    /// (Scheduled → Started → Completed/Failed/TimedOut).
    pub fn is_activity_lifecycle(&self) -> bool {
        matches!(
            self,
            EventAttributes::ActivityTaskScheduled(_)
                | EventAttributes::ActivityTaskStarted(_)
                | EventAttributes::ActivityTaskCompleted(_)
                | EventAttributes::ActivityTaskFailed(_)
                | EventAttributes::ActivityTaskTimedOut(_)
        )
    }

    /// Back-reference to the scheduling event, for lifecycle events other
    /// than the scheduling event itself.
    pub fn scheduled_event_id(&self) -> Option<EventId> {
        match self {
            EventAttributes::ActivityTaskStarted(attrs) => Some(attrs.scheduled_event_id),
            EventAttributes::ActivityTaskCompleted(attrs) => Some(attrs.scheduled_event_id),
            EventAttributes::ActivityTaskFailed(attrs) => Some(attrs.scheduled_event_id),
            EventAttributes::ActivityTaskTimedOut(attrs) => Some(attrs.scheduled_event_id),
            _ => None,
        }
    }

    /// The rejection payload, if this is a decision-rejection event.
    pub fn rejection(&self) -> Option<&DecisionRejectedAttributes> {
        match self {
            EventAttributes::ScheduleActivityTaskFailed(attrs)
            | EventAttributes::RequestCancelActivityTaskFailed(attrs)
            | EventAttributes::StartTimerFailed(attrs)
            | EventAttributes::CancelTimerFailed(attrs)
            | EventAttributes::CompleteWorkflowExecutionFailed(attrs)
            | EventAttributes::FailWorkflowExecutionFailed(attrs)
            | EventAttributes::CancelWorkflowExecutionFailed(attrs) => Some(attrs),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExecutionStartedAttributes {
    /// Per-task input payloads keyed by task id; absent entries mean
    /// "no input" for that task.
    #[serde(default)]
    pub input: BTreeMap<TaskId, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTaskScheduledAttributes {
    /// Task id this scheduling event belongs to; the anchor every later
    /// lifecycle event resolves back to.
    pub activity_id: TaskId,
    pub activity_type: ActivityType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTaskStartedAttributes {
    pub scheduled_event_id: EventId,
    /// Identity of the worker that picked the task up.
    #[serde(default)]
    pub identity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTaskCompletedAttributes {
    pub scheduled_event_id: EventId,
    /// Completion payload; `None` means the task produced no result.
    #[serde(default)]
    pub result: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTaskFailedAttributes {
    pub scheduled_event_id: EventId,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTaskTimedOutAttributes {
    pub scheduled_event_id: EventId,
    pub timeout_type: TimeoutKind,
}

/// Which time-out elapsed for a timed-out activity task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeoutKind {
    StartToClose,
    ScheduleToStart,
    ScheduleToClose,
    Heartbeat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionTaskStartedAttributes {
    /// Identity of the worker computing this decision round.
    #[serde(default)]
    pub identity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionTaskCompletedAttributes {
    /// The `DecisionTaskStarted` event of the round that committed.
    pub started_event_id: EventId,
}

/// Payload shared by every decision-rejection event kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRejectedAttributes {
    pub cause: RejectionCause,
    /// The `DecisionTaskCompleted` event of the round whose decision was
    /// rejected.
    pub decision_task_completed_event_id: EventId,
}

/// Why the backend refused a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RejectionCause {
    /// Another decision round for the same execution already committed.
    OperationNotPermitted,
    UnhandledDecision,
    /// Any cause this engine does not interpret specially.
    Other(String),
}

impl From<String> for RejectionCause {
    fn from(cause: String) -> Self {
        match cause.as_str() {
            "OPERATION_NOT_PERMITTED" => RejectionCause::OperationNotPermitted,
            "UNHANDLED_DECISION" => RejectionCause::UnhandledDecision,
            _ => RejectionCause::Other(cause),
        }
    }
}

impl From<RejectionCause> for String {
    fn from(cause: RejectionCause) -> Self {
        match cause {
            RejectionCause::OperationNotPermitted => "OPERATION_NOT_PERMITTED".to_string(),
            RejectionCause::UnhandledDecision => "UNHANDLED_DECISION".to_string(),
            RejectionCause::Other(cause) => cause,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerRecordedAttributes {
    pub marker_name: String,
    #[serde(default)]
    pub details: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMarkerFailedAttributes {
    pub marker_name: String,
}
