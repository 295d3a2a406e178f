mod common;

use dagdecider::decide::build_decisions;
use dagdecider::history::event::RejectionCause;
use dagdecider::DeciderError;
use dagdecider_test_utils::builders::HistoryBuilder;

use common::{init_tracing, single_task_spec};

#[test]
fn rejection_by_a_competing_worker_is_a_benign_race() {
    init_tracing();
    let spec = single_task_spec();

    let mut history = HistoryBuilder::new().with_identity("worker-1");
    history.started();
    // Another worker committed a round for this execution, and the backend
    // rejected ours.
    let committed = history.completed_round_by("worker-2");
    history.schedule_rejected(RejectionCause::OperationNotPermitted, committed);
    let window = history.window();

    let decisions = build_decisions(&spec, &window).unwrap();
    assert!(
        decisions.is_empty(),
        "benign race must yield no decisions, got {:?}",
        decisions
    );
}

#[test]
fn rejection_against_our_own_identity_is_fatal() {
    init_tracing();
    let spec = single_task_spec();

    let mut history = HistoryBuilder::new().with_identity("worker-1");
    history.started();
    let committed = history.completed_round_by("worker-1");
    history.schedule_rejected(RejectionCause::OperationNotPermitted, committed);
    let window = history.window();

    let err = build_decisions(&spec, &window).unwrap_err();
    assert!(
        matches!(err, DeciderError::RoundInconsistency(_)),
        "expected RoundInconsistency, got {:?}",
        err
    );
}

#[test]
fn rejection_with_any_other_cause_fails_the_workflow() {
    init_tracing();
    let spec = single_task_spec();

    let mut history = HistoryBuilder::new();
    history.started();
    let committed = history.completed_round_by("worker-2");
    history.schedule_rejected(RejectionCause::UnhandledDecision, committed);
    let window = history.window();

    let decisions = build_decisions(&spec, &window).unwrap();
    match decisions.as_slice() {
        [dagdecider::Decision::FailWorkflow(attrs)] => {
            assert_eq!(attrs.details.as_deref(), Some("1 decisions failed"));
        }
        other => panic!("expected FailWorkflow, got {:?}", other),
    }
}

#[test]
fn benign_race_abandons_concurrent_error_events() {
    init_tracing();
    let spec = single_task_spec();

    // The competing worker's committed round is responsible for the other
    // events in this slice; losing the race abandons the whole round.
    let mut history = HistoryBuilder::new().with_identity("worker-1");
    history.started();
    let committed = history.completed_round_by("worker-2");
    history.schedule("A").start_activity("A").fail_activity("A");
    history.schedule_rejected(RejectionCause::OperationNotPermitted, committed);
    let window = history.window();

    let decisions = build_decisions(&spec, &window).unwrap();
    assert!(decisions.is_empty(), "got {:?}", decisions);
}
