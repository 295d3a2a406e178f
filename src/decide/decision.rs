// src/decide/decision.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::model::ActivityType;
use crate::types::TaskId;

/// A single orchestration decision produced by one round.
///
/// Decisions are pure output values with no identity or lifecycle; a fresh
/// list is produced each round and nothing about them is retained by the
/// engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decisionType", content = "attributes")]
pub enum Decision {
    ScheduleTask(ScheduleTaskAttributes),
    CompleteWorkflow(CompleteWorkflowAttributes),
    FailWorkflow(FailWorkflowAttributes),
    CancelWorkflow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleTaskAttributes {
    pub task_id: TaskId,
    pub activity_type: ActivityType,
    /// This task's slice of the workflow input, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heartbeat_timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_queue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteWorkflowAttributes {
    /// Completion payloads keyed by task id; tasks that produced no payload
    /// are omitted.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub result: BTreeMap<TaskId, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailWorkflowAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
