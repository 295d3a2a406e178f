// src/config/validate.rs

use std::collections::HashSet;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{RawWorkflowFile, WorkflowSpec};
use crate::errors::{DeciderError, Result};

impl TryFrom<RawWorkflowFile> for WorkflowSpec {
    type Error = DeciderError;

    fn try_from(raw: RawWorkflowFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_spec(&raw)?;
        Ok(WorkflowSpec::new_unchecked(raw))
    }
}

fn validate_raw_spec(raw: &RawWorkflowFile) -> Result<()> {
    ensure_has_tasks(raw)?;
    ensure_unique_ids(raw)?;
    validate_task_dependencies(raw)?;
    validate_dag(raw)?;
    Ok(())
}

fn ensure_has_tasks(raw: &RawWorkflowFile) -> Result<()> {
    if raw.tasks.is_empty() {
        return Err(DeciderError::ConfigError(
            "workflow must contain at least one [[task]] section".to_string(),
        ));
    }
    Ok(())
}

fn ensure_unique_ids(raw: &RawWorkflowFile) -> Result<()> {
    let mut seen = HashSet::new();
    for task in raw.tasks.iter() {
        if !seen.insert(task.id.as_str()) {
            return Err(DeciderError::ConfigError(format!(
                "duplicate task id '{}'",
                task.id
            )));
        }
    }
    Ok(())
}

fn validate_task_dependencies(raw: &RawWorkflowFile) -> Result<()> {
    let ids: HashSet<&str> = raw.tasks.iter().map(|t| t.id.as_str()).collect();

    for task in raw.tasks.iter() {
        for dep in task.dependencies.iter() {
            if !ids.contains(dep.as_str()) {
                return Err(DeciderError::ConfigError(format!(
                    "task '{}' has unknown dependency '{}' in `dependencies`",
                    task.id, dep
                )));
            }
            if dep == &task.id {
                return Err(DeciderError::ConfigError(format!(
                    "task '{}' cannot depend on itself in `dependencies`",
                    task.id
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(raw: &RawWorkflowFile) -> Result<()> {
    // Build a simple petgraph graph from the tasks and their dependencies.
    //
    // Edge direction: dep -> task
    // For:
    //   [[task]]
    //   id = "B"
    //   dependencies = ["A"]
    // we add edge A -> B.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for task in raw.tasks.iter() {
        graph.add_node(task.id.as_str());
    }

    for task in raw.tasks.iter() {
        for dep in task.dependencies.iter() {
            graph.add_edge(dep.as_str(), task.id.as_str(), ());
        }
    }

    // A topological sort will fail if there is a cycle.
    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(DeciderError::DagCycle(format!(
                "cycle detected in task DAG involving task '{}'",
                node
            )))
        }
    }
}
