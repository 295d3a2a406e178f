// src/decide/classifier.rs

//! Error classification over the new-event slice.
//!
//! Separates error-class events (failures, time-outs, rejected decisions,
//! cancellation requests) from normal progress events and decides whether
//! the round ends early: with a terminal decision, with nothing at all
//! (benign race), or not at all (normal scheduling proceeds).

use tracing::{debug, info, warn};

use crate::decide::decision::{Decision, FailWorkflowAttributes};
use crate::errors::{DeciderError, Result};
use crate::history::event::{
    DecisionRejectedAttributes, Event, EventAttributes, RejectionCause, TimeoutKind,
};
use crate::history::window::DecisionTaskWindow;

/// What the classifier decided about this round.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// No error-class events; normal scheduling proceeds.
    Proceed,
    /// A competing worker already committed this round's decisions; yield
    /// nothing and let a future round see the fresh history.
    BenignRace,
    /// The round ends with exactly this decision.
    Terminal(Decision),
}

fn process_rejection(
    window: &DecisionTaskWindow,
    event: &Event,
    rejection: &DecisionRejectedAttributes,
) -> Result<RejectionOutcome> {
    if rejection.cause != RejectionCause::OperationNotPermitted {
        warn!(
            event_id = event.event_id,
            kind = event.attributes.type_name(),
            cause = ?rejection.cause,
            "decision rejected by backend"
        );
        return Ok(RejectionOutcome::DecisionFailed);
    }

    // Another round already committed for this execution. Resolve whose:
    // rejection → DecisionTaskCompleted → DecisionTaskStarted → identity.
    let completed = window.find(rejection.decision_task_completed_event_id)?;
    let EventAttributes::DecisionTaskCompleted(completed_attrs) = &completed.attributes else {
        return Err(DeciderError::RoundInconsistency(format!(
            "rejection event {} references {} event {}, expected DecisionTaskCompleted",
            event.event_id,
            completed.attributes.type_name(),
            completed.event_id
        )));
    };
    let started = window.find(completed_attrs.started_event_id)?;
    let EventAttributes::DecisionTaskStarted(started_attrs) = &started.attributes else {
        return Err(DeciderError::RoundInconsistency(format!(
            "DecisionTaskCompleted event {} references {} event {}, expected DecisionTaskStarted",
            completed.event_id,
            started.attributes.type_name(),
            started.event_id
        )));
    };

    let ours = window.current_identity()?;
    if started_attrs.identity.as_deref() == ours {
        // The backend claims a competing round committed, yet it carries
        // our own identity. The engine cannot reconcile that.
        return Err(DeciderError::RoundInconsistency(
            "decision rejected as not permitted against our own worker identity".to_string(),
        ));
    }

    debug!(
        theirs = ?started_attrs.identity,
        ours = ?ours,
        "decision round lost to a competing worker; yielding no decisions"
    );
    Ok(RejectionOutcome::BenignRace)
}

enum RejectionOutcome {
    BenignRace,
    DecisionFailed,
}

/// Scan the new-event slice (round boundary pair already excluded) and
/// classify the round.
pub fn classify(window: &DecisionTaskWindow, new_events: &[Event]) -> Result<Classification> {
    // A cancellation request beats every other error-class event in the
    // slice, wherever it appears.
    if new_events
        .iter()
        .any(|e| matches!(e.attributes, EventAttributes::WorkflowExecutionCancelRequested))
    {
        info!("workflow cancellation requested; yielding CancelWorkflow");
        return Ok(Classification::Terminal(Decision::CancelWorkflow));
    }

    let mut activity_failures = 0usize;
    let mut decision_failures = 0usize;
    let mut timeouts = 0usize;
    let mut other_failures = 0usize;

    for event in new_events {
        if let Some(rejection) = event.attributes.rejection() {
            match process_rejection(window, event, rejection)? {
                RejectionOutcome::BenignRace => return Ok(Classification::BenignRace),
                RejectionOutcome::DecisionFailed => decision_failures += 1,
            }
            continue;
        }

        match &event.attributes {
            EventAttributes::ActivityTaskFailed(_) => activity_failures += 1,
            EventAttributes::ActivityTaskTimedOut(attrs) => match attrs.timeout_type {
                TimeoutKind::StartToClose | TimeoutKind::Heartbeat => activity_failures += 1,
                TimeoutKind::ScheduleToStart | TimeoutKind::ScheduleToClose => timeouts += 1,
            },
            EventAttributes::DecisionTaskTimedOut
            | EventAttributes::WorkflowExecutionTimedOut => timeouts += 1,
            EventAttributes::RecordMarkerFailed(_) => other_failures += 1,
            _ => {}
        }
    }

    if activity_failures + decision_failures + timeouts + other_failures == 0 {
        return Ok(Classification::Proceed);
    }

    let mut details = Vec::new();
    if activity_failures > 0 {
        details.push(format!("{activity_failures} activities failed"));
    }
    if decision_failures > 0 {
        details.push(format!("{decision_failures} decisions failed"));
    }
    if timeouts > 0 {
        details.push(format!("{timeouts} actions timed-out"));
    }
    if other_failures > 0 {
        details.push(format!("{other_failures} other actions failed"));
    }
    let details = details.join(", ");
    warn!(%details, "error events in new slice; failing workflow");

    Ok(Classification::Terminal(Decision::FailWorkflow(
        FailWorkflowAttributes {
            reason: None,
            details: Some(details),
        },
    )))
}
