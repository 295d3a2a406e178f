// src/dag/graph.rs

use std::collections::HashMap;

use crate::config::model::TaskSpec;
use crate::types::TaskId;

/// Key into the dependants index.
///
/// `Root` stands in for "no dependency" and lists the tasks that become
/// ready the moment the execution starts. An explicit variant instead of a
/// sentinel task id keeps it impossible to collide with a real id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependantsKey<'a> {
    /// Tasks with no dependencies (the initial ready set).
    Root,
    /// Tasks unblocked when this task completes.
    Task(&'a str),
}

/// Internal node structure: stores immediate deps and dependants.
#[derive(Debug, Clone)]
struct GraphNode {
    /// Direct dependencies: tasks that must complete before this one runs.
    deps: Vec<TaskId>,
    /// Direct dependants: tasks that list this one in their `dependencies`.
    dependants: Vec<TaskId>,
}

/// Dependants index over the task DAG, keyed by task id.
///
/// This is intentionally lightweight; acyclicity and reference validity are
/// already checked in `config::validate`, so here we just keep adjacency
/// information for scheduling and diagnostics. Built once at spec-load time
/// and cached inside [`WorkflowSpec`](crate::config::model::WorkflowSpec).
#[derive(Debug, Clone)]
pub struct TaskGraph {
    nodes: HashMap<TaskId, GraphNode>,
    /// Tasks with an empty dependency list, in declaration order.
    roots: Vec<TaskId>,
}

impl TaskGraph {
    /// Build the index from validated task specs.
    ///
    /// Assumes that:
    /// - all `dependencies` references are valid
    /// - there are no cycles
    pub(crate) fn from_tasks(tasks: &[TaskSpec]) -> Self {
        let mut nodes: HashMap<TaskId, GraphNode> = HashMap::new();
        let mut roots: Vec<TaskId> = Vec::new();

        // First pass: create nodes with their dependency lists.
        for task in tasks {
            nodes.insert(
                task.id.clone(),
                GraphNode {
                    deps: task.dependencies.clone(),
                    dependants: Vec::new(),
                },
            );
            if task.dependencies.is_empty() {
                roots.push(task.id.clone());
            }
        }

        // Second pass: populate dependants based on deps. Iterating the
        // spec slice (not the map) keeps dependants in declaration order.
        for task in tasks {
            for dep in task.dependencies.iter() {
                if let Some(dep_node) = nodes.get_mut(dep) {
                    dep_node.dependants.push(task.id.clone());
                }
            }
        }

        Self { nodes, roots }
    }

    /// Return all task ids.
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    /// Immediate dependencies of a task (the ids listed in its `dependencies`).
    pub fn dependencies_of(&self, id: &str) -> &[TaskId] {
        self.nodes
            .get(id)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Tasks unblocked by the given key completing.
    ///
    /// `DependantsKey::Root` yields the initial ready set.
    pub fn dependants_of(&self, key: DependantsKey<'_>) -> &[TaskId] {
        match key {
            DependantsKey::Root => &self.roots,
            DependantsKey::Task(id) => self
                .nodes
                .get(id)
                .map(|n| n.dependants.as_slice())
                .unwrap_or(&[]),
        }
    }
}
