mod common;

use dagdecider::decide::build_decisions;
use dagdecider::history::event::{RejectionCause, TimeoutKind};
use dagdecider::Decision;
use dagdecider_test_utils::builders::HistoryBuilder;

use common::{chain_spec, init_tracing, single_task_spec, two_roots_spec};

fn fail_details(decisions: &[Decision]) -> String {
    match decisions {
        [Decision::FailWorkflow(attrs)] => attrs.details.clone().expect("details must be set"),
        other => panic!("expected exactly one FailWorkflow, got {:?}", other),
    }
}

#[test]
fn single_activity_failure_fails_the_workflow() {
    init_tracing();
    let spec = single_task_spec();

    let mut history = HistoryBuilder::new();
    history.started();
    let _ = history.window();
    history.schedule("A").start_activity("A").fail_activity("A");
    let window = history.window();

    let decisions = build_decisions(&spec, &window).unwrap();
    assert_eq!(fail_details(&decisions), "1 activities failed");
    match &decisions[0] {
        Decision::FailWorkflow(attrs) => assert_eq!(attrs.reason, None),
        _ => unreachable!(),
    }
}

#[test]
fn heartbeat_timeout_counts_as_an_activity_failure() {
    init_tracing();
    let spec = single_task_spec();

    let mut history = HistoryBuilder::new();
    history.started();
    let _ = history.window();
    history
        .schedule("A")
        .start_activity("A")
        .time_out_activity("A", TimeoutKind::Heartbeat);
    let window = history.window();

    let decisions = build_decisions(&spec, &window).unwrap();
    assert_eq!(fail_details(&decisions), "1 activities failed");
}

#[test]
fn schedule_to_start_timeout_counts_as_a_timed_out_action() {
    init_tracing();
    let spec = single_task_spec();

    let mut history = HistoryBuilder::new();
    history.started();
    let _ = history.window();
    history
        .schedule("A")
        .time_out_activity("A", TimeoutKind::ScheduleToStart);
    let window = history.window();

    let decisions = build_decisions(&spec, &window).unwrap();
    assert_eq!(fail_details(&decisions), "1 actions timed-out");
}

#[test]
fn failure_details_aggregate_every_bucket_in_order() {
    init_tracing();
    let spec = two_roots_spec();

    let mut history = HistoryBuilder::new();
    history.started();
    let committed = history.completed_round_by("worker-2");
    history.schedule("A").schedule("C");
    history.start_activity("A").fail_activity("A");
    history.time_out_activity("C", TimeoutKind::ScheduleToClose);
    history.schedule_rejected(RejectionCause::UnhandledDecision, committed);
    history.marker_failed("checkpoint");
    let window = history.window();

    let decisions = build_decisions(&spec, &window).unwrap();
    assert_eq!(
        fail_details(&decisions),
        "1 activities failed, 1 decisions failed, 1 actions timed-out, 1 other actions failed"
    );
}

#[test]
fn same_bucket_failures_are_counted() {
    init_tracing();
    let spec = two_roots_spec();

    let mut history = HistoryBuilder::new();
    history.started();
    let _ = history.window();
    history.schedule("A").schedule("C");
    history.start_activity("A").fail_activity("A");
    history.start_activity("C").fail_activity("C");
    let window = history.window();

    let decisions = build_decisions(&spec, &window).unwrap();
    assert_eq!(fail_details(&decisions), "2 activities failed");
}

#[test]
fn failure_preempts_scheduling_in_the_same_round() {
    init_tracing();
    let spec = chain_spec();

    // A both completes its schedule-ready transition source (the execution
    // start) and fails, in one slice: the fail path must win and no
    // ScheduleTask may appear.
    let mut history = HistoryBuilder::new();
    history.started();
    history.schedule("A").start_activity("A").fail_activity("A");
    let window = history.window();

    let decisions = build_decisions(&spec, &window).unwrap();
    assert_eq!(fail_details(&decisions), "1 activities failed");
    assert_eq!(decisions.len(), 1);
}

#[test]
fn decision_task_timeout_fails_the_workflow() {
    init_tracing();
    let spec = single_task_spec();

    let mut history = HistoryBuilder::new();
    history.started();
    let _ = history.window();
    history.decision_timed_out();
    let window = history.window();

    let decisions = build_decisions(&spec, &window).unwrap();
    assert_eq!(fail_details(&decisions), "1 actions timed-out");
}
