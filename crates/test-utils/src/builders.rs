#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use dagdecider::config::{ActivityType, RawTaskSpec, RawWorkflowFile, WorkflowSpec};
use dagdecider::history::event::{
    ActivityTaskCompletedAttributes, ActivityTaskFailedAttributes,
    ActivityTaskScheduledAttributes, ActivityTaskStartedAttributes,
    ActivityTaskTimedOutAttributes, DecisionRejectedAttributes,
    DecisionTaskCompletedAttributes, DecisionTaskStartedAttributes, Event, EventAttributes,
    RecordMarkerFailedAttributes, RejectionCause, TimeoutKind,
    WorkflowExecutionStartedAttributes,
};
use dagdecider::history::DecisionTaskWindow;
use dagdecider::types::{EventId, TaskId};

/// Builder for `WorkflowSpec` to simplify test setup.
pub struct WorkflowFileBuilder {
    raw: RawWorkflowFile,
}

impl WorkflowFileBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            raw: RawWorkflowFile {
                name: name.to_string(),
                version: "1.0".to_string(),
                description: None,
                tasks: Vec::new(),
            },
        }
    }

    pub fn version(mut self, version: &str) -> Self {
        self.raw.version = version.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.raw.description = Some(description.to_string());
        self
    }

    pub fn with_task(mut self, task: RawTaskSpec) -> Self {
        self.raw.tasks.push(task);
        self
    }

    /// The raw, unvalidated file — for tests exercising validation errors.
    pub fn build_raw(self) -> RawWorkflowFile {
        self.raw
    }

    pub fn build(self) -> WorkflowSpec {
        WorkflowSpec::try_from(self.raw).expect("Failed to build valid workflow spec from builder")
    }
}

/// Builder for `RawTaskSpec`.
pub struct TaskSpecBuilder {
    task: RawTaskSpec,
}

impl TaskSpecBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            task: RawTaskSpec {
                id: id.to_string(),
                activity_type: ActivityType {
                    name: format!("{id}-activity"),
                    version: "1.0".to_string(),
                },
                heartbeat: None,
                timeout: None,
                task_queue: None,
                priority: None,
                dependencies: Vec::new(),
            },
        }
    }

    pub fn activity_type(mut self, name: &str, version: &str) -> Self {
        self.task.activity_type = ActivityType {
            name: name.to_string(),
            version: version.to_string(),
        };
        self
    }

    pub fn depends_on(mut self, dep: &str) -> Self {
        self.task.dependencies.push(dep.to_string());
        self
    }

    pub fn heartbeat(mut self, seconds: u64) -> Self {
        self.task.heartbeat = Some(seconds);
        self
    }

    pub fn timeout(mut self, seconds: u64) -> Self {
        self.task.timeout = Some(seconds);
        self
    }

    pub fn task_queue(mut self, queue: &str) -> Self {
        self.task.task_queue = Some(queue.to_string());
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.task.priority = Some(priority);
        self
    }

    pub fn build(self) -> RawTaskSpec {
        self.task
    }
}

/// Builder for execution histories and per-round decision task windows.
///
/// Event ids are assigned sequentially from 1. Scheduling events are
/// remembered per task so that later lifecycle events carry the right
/// back-reference. `window()` appends the round-boundary pair
/// (`DecisionTaskScheduled`, `DecisionTaskStarted`) and produces the
/// window for that round; the next `window()` call automatically uses the
/// previous round's started event as its cursor.
pub struct HistoryBuilder {
    events: Vec<Event>,
    next_id: EventId,
    scheduled: HashMap<TaskId, EventId>,
    previous_started: Option<EventId>,
    identity: String,
}

impl HistoryBuilder {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            next_id: 1,
            scheduled: HashMap::new(),
            previous_started: None,
            identity: "worker-1".to_string(),
        }
    }

    /// Identity stamped on this builder's `DecisionTaskStarted` events.
    pub fn with_identity(mut self, identity: &str) -> Self {
        self.identity = identity.to_string();
        self
    }

    /// Append an arbitrary event; escape hatch for unusual histories.
    pub fn push(&mut self, attributes: EventAttributes) -> EventId {
        let id = self.next_id;
        self.next_id += 1;
        self.events.push(Event {
            event_id: id,
            attributes,
        });
        id
    }

    /// `WorkflowExecutionStarted` with no input payloads.
    pub fn started(&mut self) -> &mut Self {
        self.started_with_input(BTreeMap::new())
    }

    pub fn started_with_input(&mut self, input: BTreeMap<TaskId, Value>) -> &mut Self {
        self.push(EventAttributes::WorkflowExecutionStarted(
            WorkflowExecutionStartedAttributes { input },
        ));
        self
    }

    pub fn schedule(&mut self, task: &str) -> &mut Self {
        let id = self.push(EventAttributes::ActivityTaskScheduled(
            ActivityTaskScheduledAttributes {
                activity_id: task.to_string(),
                activity_type: ActivityType {
                    name: format!("{task}-activity"),
                    version: "1.0".to_string(),
                },
            },
        ));
        self.scheduled.insert(task.to_string(), id);
        self
    }

    pub fn start_activity(&mut self, task: &str) -> &mut Self {
        let scheduled_event_id = self.scheduled_id(task);
        self.push(EventAttributes::ActivityTaskStarted(
            ActivityTaskStartedAttributes {
                scheduled_event_id,
                identity: None,
            },
        ));
        self
    }

    pub fn complete(&mut self, task: &str) -> &mut Self {
        self.complete_inner(task, None)
    }

    pub fn complete_with_result(&mut self, task: &str, result: Value) -> &mut Self {
        self.complete_inner(task, Some(result))
    }

    fn complete_inner(&mut self, task: &str, result: Option<Value>) -> &mut Self {
        let scheduled_event_id = self.scheduled_id(task);
        self.push(EventAttributes::ActivityTaskCompleted(
            ActivityTaskCompletedAttributes {
                scheduled_event_id,
                result,
            },
        ));
        self
    }

    pub fn fail_activity(&mut self, task: &str) -> &mut Self {
        let scheduled_event_id = self.scheduled_id(task);
        self.push(EventAttributes::ActivityTaskFailed(
            ActivityTaskFailedAttributes {
                scheduled_event_id,
                reason: None,
                details: None,
            },
        ));
        self
    }

    pub fn time_out_activity(&mut self, task: &str, timeout_type: TimeoutKind) -> &mut Self {
        let scheduled_event_id = self.scheduled_id(task);
        self.push(EventAttributes::ActivityTaskTimedOut(
            ActivityTaskTimedOutAttributes {
                scheduled_event_id,
                timeout_type,
            },
        ));
        self
    }

    pub fn cancel_requested(&mut self) -> &mut Self {
        self.push(EventAttributes::WorkflowExecutionCancelRequested);
        self
    }

    pub fn decision_timed_out(&mut self) -> &mut Self {
        self.push(EventAttributes::DecisionTaskTimedOut);
        self
    }

    pub fn marker_failed(&mut self, marker_name: &str) -> &mut Self {
        self.push(EventAttributes::RecordMarkerFailed(
            RecordMarkerFailedAttributes {
                marker_name: marker_name.to_string(),
            },
        ));
        self
    }

    /// A rejected `ScheduleTask` decision.
    pub fn schedule_rejected(
        &mut self,
        cause: RejectionCause,
        decision_task_completed_event_id: EventId,
    ) -> &mut Self {
        self.push(EventAttributes::ScheduleActivityTaskFailed(
            DecisionRejectedAttributes {
                cause,
                decision_task_completed_event_id,
            },
        ));
        self
    }

    /// A full decision round committed by `identity`: the boundary pair
    /// plus a `DecisionTaskCompleted`. Returns the completed event's id so
    /// rejection events can reference it.
    pub fn completed_round_by(&mut self, identity: &str) -> EventId {
        self.push(EventAttributes::DecisionTaskScheduled);
        let started = self.push(EventAttributes::DecisionTaskStarted(
            DecisionTaskStartedAttributes {
                identity: Some(identity.to_string()),
            },
        ));
        self.previous_started = Some(started);
        self.push(EventAttributes::DecisionTaskCompleted(
            DecisionTaskCompletedAttributes {
                started_event_id: started,
            },
        ))
    }

    /// Append the round boundary pair and produce this round's window.
    pub fn window(&mut self) -> DecisionTaskWindow {
        self.push(EventAttributes::DecisionTaskScheduled);
        let started = self.push(EventAttributes::DecisionTaskStarted(
            DecisionTaskStartedAttributes {
                identity: Some(self.identity.clone()),
            },
        ));
        let window = DecisionTaskWindow {
            events: self.events.clone(),
            started_event_id: started,
            previous_started_event_id: self.previous_started,
        };
        self.previous_started = Some(started);
        window
    }

    fn scheduled_id(&self, task: &str) -> EventId {
        *self
            .scheduled
            .get(task)
            .unwrap_or_else(|| panic!("task '{task}' has no ActivityTaskScheduled event yet"))
    }
}

impl Default for HistoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
