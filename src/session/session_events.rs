//! Session event handling
//!
//! Drains the worker outcome channel without blocking. Called from the main
//! loop between renders; stale outcomes are filtered inside
//! [`SearchSession::apply_outcome`].

use std::sync::mpsc::TryRecvError;

use crate::error::SearchError;

use super::session_state::SearchSession;

/// Poll the outcome channel for finished searches
///
/// Uses try_recv() for non-blocking polling. Returns true if any session
/// state changed (an outcome was applied or the worker disconnected).
pub fn poll_session(session: &mut SearchSession) -> bool {
    if session.response_rx.is_none() {
        return false;
    }

    let mut outcomes = Vec::new();
    let mut disconnected = false;

    if let Some(ref rx) = session.response_rx {
        loop {
            match rx.try_recv() {
                Ok(outcome) => outcomes.push(outcome),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }
    }

    let mut changed = false;
    for outcome in outcomes {
        changed |= session.apply_outcome(outcome);
    }

    if disconnected && session.is_pending() {
        session.fail_pending(SearchError::Connection(
            "search worker disconnected unexpectedly".to_string(),
        ));
        changed = true;
    }

    changed
}

#[cfg(test)]
#[path = "session_events_tests.rs"]
mod session_events_tests;
