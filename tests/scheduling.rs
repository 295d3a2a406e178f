mod common;

use std::collections::BTreeMap;

use serde_json::json;

use dagdecider::dag::{ReadyTracker, TaskState};
use dagdecider::decide::build_decisions;
use dagdecider::history::TaskTimelines;
use dagdecider::Decision;
use dagdecider_test_utils::builders::{HistoryBuilder, TaskSpecBuilder, WorkflowFileBuilder};

use common::{chain_spec, diamond_spec, init_tracing, scheduled_ids, single_task_spec, two_roots_spec};

#[test]
fn execution_start_schedules_the_root_task() {
    init_tracing();
    let spec = single_task_spec();

    let mut history = HistoryBuilder::new();
    history.started();
    let window = history.window();

    let decisions = build_decisions(&spec, &window).unwrap();

    assert_eq!(decisions.len(), 1);
    match &decisions[0] {
        Decision::ScheduleTask(attrs) => {
            assert_eq!(attrs.task_id, "A");
            assert_eq!(attrs.activity_type.name, "A-activity");
            assert_eq!(attrs.input, None);
        }
        other => panic!("expected ScheduleTask, got {:?}", other),
    }
}

#[test]
fn schedule_decision_carries_the_tasks_input_slice() {
    init_tracing();
    let spec = two_roots_spec();

    let mut input = BTreeMap::new();
    input.insert("A".to_string(), json!({"rows": 42}));

    let mut history = HistoryBuilder::new();
    history.started_with_input(input);
    let window = history.window();

    let decisions = build_decisions(&spec, &window).unwrap();
    assert_eq!(scheduled_ids(&decisions), vec!["A", "C"]);

    match (&decisions[0], &decisions[1]) {
        (Decision::ScheduleTask(a), Decision::ScheduleTask(c)) => {
            assert_eq!(a.input, Some(json!({"rows": 42})));
            // C has no entry in the input map, so it gets none.
            assert_eq!(c.input, None);
        }
        other => panic!("expected two ScheduleTask decisions, got {:?}", other),
    }
}

#[test]
fn schedule_decision_carries_task_overrides() {
    init_tracing();
    let spec = WorkflowFileBuilder::new("overrides")
        .with_task(
            TaskSpecBuilder::new("A")
                .heartbeat(30)
                .timeout(300)
                .task_queue("gpu")
                .priority(5)
                .build(),
        )
        .build();

    let mut history = HistoryBuilder::new();
    history.started();
    let window = history.window();

    let decisions = build_decisions(&spec, &window).unwrap();
    match &decisions[0] {
        Decision::ScheduleTask(attrs) => {
            assert_eq!(attrs.heartbeat_timeout, Some(30));
            assert_eq!(attrs.task_timeout, Some(300));
            assert_eq!(attrs.task_queue.as_deref(), Some("gpu"));
            assert_eq!(attrs.priority, Some(5));
        }
        other => panic!("expected ScheduleTask, got {:?}", other),
    }
}

#[test]
fn dependant_is_scheduled_once_its_dependency_completes() {
    init_tracing();
    let spec = chain_spec();

    let mut history = HistoryBuilder::new();
    history.started();
    let window = history.window();
    assert_eq!(scheduled_ids(&build_decisions(&spec, &window).unwrap()), vec!["A"]);

    history.schedule("A").start_activity("A").complete("A");
    let window = history.window();
    assert_eq!(scheduled_ids(&build_decisions(&spec, &window).unwrap()), vec!["B"]);
}

#[test]
fn dependant_is_not_scheduled_before_its_dependency_completes() {
    init_tracing();
    let spec = chain_spec();

    let mut history = HistoryBuilder::new();
    history.started();
    let _ = history.window();

    // A is running but has not completed.
    history.schedule("A").start_activity("A");
    let window = history.window();

    let decisions = build_decisions(&spec, &window).unwrap();
    assert!(decisions.is_empty(), "no new commitments expected, got {:?}", decisions);
}

#[test]
fn independent_roots_are_scheduled_in_declaration_order() {
    init_tracing();

    let spec = two_roots_spec();
    let mut history = HistoryBuilder::new();
    history.started();
    let window = history.window();
    assert_eq!(scheduled_ids(&build_decisions(&spec, &window).unwrap()), vec!["A", "C"]);

    // Reversing the declaration order reverses the emission order.
    let spec = WorkflowFileBuilder::new("two-roots-reversed")
        .with_task(TaskSpecBuilder::new("C").build())
        .with_task(TaskSpecBuilder::new("A").build())
        .build();
    let mut history = HistoryBuilder::new();
    history.started();
    let window = history.window();
    assert_eq!(scheduled_ids(&build_decisions(&spec, &window).unwrap()), vec!["C", "A"]);
}

#[test]
fn join_task_waits_for_all_of_its_dependencies() {
    init_tracing();
    let spec = diamond_spec();

    let mut history = HistoryBuilder::new();
    history.started();
    let _ = history.window();

    // A completes; the fan-out becomes ready but the join does not.
    history.schedule("A").start_activity("A").complete("A");
    let window = history.window();
    assert_eq!(scheduled_ids(&build_decisions(&spec, &window).unwrap()), vec!["B", "C"]);

    // Only B completes; D still waits on C.
    history.schedule("B").schedule("C");
    history.start_activity("B").complete("B");
    let window = history.window();
    assert!(build_decisions(&spec, &window).unwrap().is_empty());

    // C completes; D unblocks.
    history.start_activity("C").complete("C");
    let window = history.window();
    assert_eq!(scheduled_ids(&build_decisions(&spec, &window).unwrap()), vec!["D"]);
}

#[test]
fn already_scheduled_tasks_are_never_rescheduled() {
    init_tracing();
    let spec = chain_spec();

    let mut history = HistoryBuilder::new();
    history.started();
    let _ = history.window();

    // A's scheduling landed in history; a round observing no new task
    // events makes no new commitments.
    history.schedule("A");
    let window = history.window();
    assert!(build_decisions(&spec, &window).unwrap().is_empty());
}

#[test]
fn task_states_are_derived_from_timelines_and_ready_set() {
    init_tracing();
    let spec = diamond_spec();

    let mut history = HistoryBuilder::new();
    history.started();
    history.schedule("A").start_activity("A").complete("A");
    let window = history.window();

    let timelines = TaskTimelines::resolve(&spec, &window).unwrap();
    let mut tracker = ReadyTracker::new(&spec, &timelines);
    let new_events = window.new_events().unwrap();
    for event in &new_events[..new_events.len() - 2] {
        tracker.apply(event).unwrap();
    }

    assert_eq!(tracker.state_of("A"), TaskState::Completed);
    assert_eq!(tracker.state_of("B"), TaskState::Ready);
    assert_eq!(tracker.state_of("C"), TaskState::Ready);
    assert_eq!(tracker.state_of("D"), TaskState::Blocked);
}

#[test]
fn identical_windows_yield_identical_decisions() {
    init_tracing();
    let spec = diamond_spec();

    let mut history = HistoryBuilder::new();
    history.started();
    let _ = history.window();
    history.schedule("A").start_activity("A").complete("A");
    let window = history.window();

    let first = build_decisions(&spec, &window).unwrap();
    let second = build_decisions(&spec, &window).unwrap();
    assert_eq!(first, second);
    assert_eq!(scheduled_ids(&first), vec!["B", "C"]);
}
