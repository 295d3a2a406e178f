#![allow(dead_code)]

pub use dagdecider_test_utils::init_tracing;

use dagdecider::WorkflowSpec;
use dagdecider_test_utils::builders::{TaskSpecBuilder, WorkflowFileBuilder};

/// Spec with a single root task `A`.
pub fn single_task_spec() -> WorkflowSpec {
    WorkflowFileBuilder::new("single")
        .with_task(TaskSpecBuilder::new("A").build())
        .build()
}

/// `B` depends on `A`.
pub fn chain_spec() -> WorkflowSpec {
    WorkflowFileBuilder::new("chain")
        .with_task(TaskSpecBuilder::new("A").build())
        .with_task(TaskSpecBuilder::new("B").depends_on("A").build())
        .build()
}

/// Two independent root tasks `A` and `C`, declared in that order.
pub fn two_roots_spec() -> WorkflowSpec {
    WorkflowFileBuilder::new("two-roots")
        .with_task(TaskSpecBuilder::new("A").build())
        .with_task(TaskSpecBuilder::new("C").build())
        .build()
}

/// Diamond: `A` fans out to `B` and `C`, which join into `D`.
pub fn diamond_spec() -> WorkflowSpec {
    WorkflowFileBuilder::new("diamond")
        .with_task(TaskSpecBuilder::new("A").build())
        .with_task(TaskSpecBuilder::new("B").depends_on("A").build())
        .with_task(TaskSpecBuilder::new("C").depends_on("A").build())
        .with_task(
            TaskSpecBuilder::new("D")
                .depends_on("B")
                .depends_on("C")
                .build(),
        )
        .build()
}

/// Task ids of all `ScheduleTask` decisions, in emission order.
pub fn scheduled_ids(decisions: &[dagdecider::Decision]) -> Vec<String> {
    decisions
        .iter()
        .filter_map(|d| match d {
            dagdecider::Decision::ScheduleTask(attrs) => Some(attrs.task_id.clone()),
            _ => None,
        })
        .collect()
}
