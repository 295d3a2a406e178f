// src/config/model.rs

use serde::{Deserialize, Serialize};

use crate::dag::TaskGraph;
use crate::types::TaskId;

/// Activity type reference: which worker implementation runs a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityType {
    pub name: String,
    pub version: String,
}

/// Top-level workflow specification as read from a TOML file.
///
/// ```toml
/// name = "nightly-etl"
/// version = "1.0"
/// description = "extract, transform, load"
///
/// [[task]]
/// id = "extract"
/// type = { name = "extract-activity", version = "0.3" }
/// timeout = 300
///
/// [[task]]
/// id = "transform"
/// type = { name = "transform-activity", version = "0.3" }
/// dependencies = ["extract"]
/// ```
///
/// This is the raw, unvalidated shape; use
/// [`WorkflowSpec::try_from`](crate::config::model::WorkflowSpec) or
/// [`loader::load_and_validate`](crate::config::loader::load_and_validate)
/// to obtain a validated [`WorkflowSpec`].
#[derive(Debug, Clone, Deserialize)]
pub struct RawWorkflowFile {
    /// Workflow name.
    pub name: String,

    /// Workflow version.
    pub version: String,

    /// Optional human-readable description.
    #[serde(default)]
    pub description: Option<String>,

    /// All tasks from `[[task]]`, in declaration order.
    ///
    /// Declaration order is significant: it is the order in which
    /// independently-ready tasks are scheduled.
    #[serde(default, rename = "task")]
    pub tasks: Vec<RawTaskSpec>,
}

/// `[[task]]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTaskSpec {
    /// Task id, unique within the workflow.
    pub id: TaskId,

    /// Activity type implementing this task.
    #[serde(rename = "type")]
    pub activity_type: ActivityType,

    /// Heartbeat time-out in seconds; `None` means unlimited.
    #[serde(default)]
    pub heartbeat: Option<u64>,

    /// Start-to-close time-out in seconds; `None` means unlimited.
    #[serde(default)]
    pub timeout: Option<u64>,

    /// Queue to schedule the task on; `None` uses the backend default.
    #[serde(default)]
    pub task_queue: Option<String>,

    /// Scheduling priority; `None` uses the backend default.
    #[serde(default)]
    pub priority: Option<i32>,

    /// Dependency list: this task waits for all tasks listed here.
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
}

/// A single task of a validated workflow specification.
///
/// Owned by [`WorkflowSpec`]; immutable after load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    pub id: TaskId,
    pub activity_type: ActivityType,
    pub heartbeat_timeout: Option<u64>,
    pub task_timeout: Option<u64>,
    pub task_queue: Option<String>,
    pub priority: Option<i32>,
    pub dependencies: Vec<TaskId>,
}

impl TaskSpec {
    fn from_raw(raw: RawTaskSpec) -> Self {
        Self {
            id: raw.id,
            activity_type: raw.activity_type,
            heartbeat_timeout: raw.heartbeat,
            task_timeout: raw.timeout,
            task_queue: raw.task_queue,
            priority: raw.priority,
            dependencies: raw.dependencies,
        }
    }
}

/// Validated workflow specification plus its cached dependants index.
///
/// Loaded once and shared read-only across all decision rounds of all
/// executions of this workflow type. The engine assumes the dependency
/// graph is acyclic and fully resolved; `config::validate` guarantees both
/// at load time, which is why the only constructors are
/// `TryFrom<RawWorkflowFile>` and the loader.
#[derive(Debug, Clone)]
pub struct WorkflowSpec {
    name: String,
    version: String,
    description: Option<String>,
    tasks: Vec<TaskSpec>,
    graph: TaskGraph,
}

impl WorkflowSpec {
    /// Construct from an already-validated raw file. Callers other than
    /// `config::validate` must go through `TryFrom`.
    pub(crate) fn new_unchecked(raw: RawWorkflowFile) -> Self {
        let tasks: Vec<TaskSpec> = raw.tasks.into_iter().map(TaskSpec::from_raw).collect();
        let graph = TaskGraph::from_tasks(&tasks);
        Self {
            name: raw.name,
            version: raw.version,
            description: raw.description,
            tasks,
            graph,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Tasks in declaration order.
    pub fn tasks(&self) -> &[TaskSpec] {
        &self.tasks
    }

    /// Look up a task by id.
    pub fn task(&self, id: &str) -> Option<&TaskSpec> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// The dependants index, built once at load time.
    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }
}
