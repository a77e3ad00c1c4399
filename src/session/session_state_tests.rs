//! Tests for the search session state machine

use super::*;
use crate::error::SearchError;
use crate::response::SearchResponse;
use serde_json::json;
use std::sync::mpsc;

fn workbook() -> WorkbookFile {
    WorkbookFile {
        name: "book.xlsx".to_string(),
        bytes: vec![1, 2, 3],
    }
}

fn response_with_matches() -> SearchResponse {
    crate::response::validate_response(json!({
        "keyword_results": {
            "Sheet1": { "columns": ["id"], "data": [["1"], ["2"]] },
            "Sheet2": { "columns": ["id"], "data": [["3"]] }
        },
        "keyword_summary": {
            "total_matches": 3,
            "sheet_counts": { "Sheet1": 2, "Sheet2": 1, "Sheet3": 0 }
        }
    }))
    .unwrap()
}

/// Session wired to test-held channel ends
fn session_with_channels() -> (
    SearchSession,
    mpsc::Receiver<SearchRequest>,
    mpsc::Sender<SearchOutcome>,
) {
    let (request_tx, request_rx) = mpsc::channel();
    let (outcome_tx, outcome_rx) = mpsc::channel();
    let mut session = SearchSession::new();
    session.set_channels(request_tx, outcome_rx);
    (session, request_rx, outcome_tx)
}

#[test]
fn test_initial_state_is_idle() {
    let session = SearchSession::new();
    assert_eq!(*session.phase(), SearchPhase::Idle);
    assert!(session.file().is_none());
    assert_eq!(session.status_message(), "choose a workbook to search");
}

#[test]
fn test_start_search_without_file() {
    let (mut session, _request_rx, _outcome_tx) = session_with_channels();

    assert_eq!(session.start_search("widget"), Err(SearchError::NoFile));
    // Precondition failure: no request sent, phase untouched
    assert_eq!(*session.phase(), SearchPhase::Idle);
}

#[test]
fn test_start_search_with_blank_query() {
    let (mut session, request_rx, _outcome_tx) = session_with_channels();
    session.set_file(workbook());

    assert_eq!(session.start_search("   "), Err(SearchError::NoQuery));
    assert_eq!(*session.phase(), SearchPhase::Idle);
    assert!(request_rx.try_recv().is_err(), "no request should be sent");
}

#[test]
fn test_start_search_enters_pending_and_trims_query() {
    let (mut session, request_rx, _outcome_tx) = session_with_channels();
    session.set_file(workbook());

    session.start_search("  widget  ").unwrap();
    assert_eq!(
        *session.phase(),
        SearchPhase::Pending {
            query: "widget".to_string()
        }
    );

    let request = request_rx.try_recv().unwrap();
    assert_eq!(request.query, "widget");
    assert_eq!(request.request_id, session.current_request_id());
    assert_eq!(request.file, workbook());
}

#[test]
fn test_start_search_without_worker_fails() {
    let mut session = SearchSession::new();
    session.set_file(workbook());

    let result = session.start_search("widget");
    assert!(matches!(result, Err(SearchError::Connection(_))));
    assert!(matches!(session.phase(), SearchPhase::Failed { .. }));
}

#[test]
fn test_success_outcome_transitions_to_succeeded() {
    let (mut session, _request_rx, _outcome_tx) = session_with_channels();
    session.set_file(workbook());
    session.start_search("widget").unwrap();

    let changed = session.apply_outcome(SearchOutcome {
        request_id: session.current_request_id(),
        result: Ok(response_with_matches()),
    });

    assert!(changed);
    match session.phase() {
        SearchPhase::Succeeded { query, response } => {
            assert_eq!(query, "widget");
            assert_eq!(response.summary.total_matches, 3);
        }
        other => panic!("expected Succeeded, got {:?}", other),
    }
}

#[test]
fn test_error_outcome_transitions_to_failed() {
    let (mut session, _request_rx, _outcome_tx) = session_with_channels();
    session.set_file(workbook());
    session.start_search("widget").unwrap();

    session.apply_outcome(SearchOutcome {
        request_id: session.current_request_id(),
        result: Err(SearchError::Http {
            status: 500,
            status_text: "Internal Server Error".to_string(),
        }),
    });

    match session.phase() {
        SearchPhase::Failed { query, error } => {
            assert_eq!(query, "widget");
            assert!(matches!(error, SearchError::Http { status: 500, .. }));
        }
        other => panic!("expected Failed, got {:?}", other),
    }
}

#[test]
fn test_stale_outcome_is_dropped() {
    let (mut session, request_rx, _outcome_tx) = session_with_channels();
    session.set_file(workbook());

    session.start_search("first").unwrap();
    let first = request_rx.try_recv().unwrap();

    session.start_search("second").unwrap();
    let second = request_rx.try_recv().unwrap();
    assert!(second.request_id > first.request_id);

    // The superseded request's outcome must not touch the session
    let changed = session.apply_outcome(SearchOutcome {
        request_id: first.request_id,
        result: Ok(response_with_matches()),
    });
    assert!(!changed);
    assert_eq!(
        *session.phase(),
        SearchPhase::Pending {
            query: "second".to_string()
        }
    );
}

#[test]
fn test_set_file_resets_and_invalidates_in_flight() {
    let (mut session, request_rx, _outcome_tx) = session_with_channels();
    session.set_file(workbook());
    session.start_search("widget").unwrap();
    let request = request_rx.try_recv().unwrap();

    // Replacing the file discards the pending search entirely
    session.set_file(WorkbookFile {
        name: "other.xlsx".to_string(),
        bytes: vec![9],
    });
    assert_eq!(*session.phase(), SearchPhase::Idle);

    // The old request's outcome is now stale
    let changed = session.apply_outcome(SearchOutcome {
        request_id: request.request_id,
        result: Ok(response_with_matches()),
    });
    assert!(!changed);
    assert_eq!(*session.phase(), SearchPhase::Idle);
}

#[test]
fn test_clear_file_resets() {
    let (mut session, _request_rx, _outcome_tx) = session_with_channels();
    session.set_file(workbook());
    session.start_search("widget").unwrap();

    session.clear_file();
    assert!(session.file().is_none());
    assert_eq!(*session.phase(), SearchPhase::Idle);
    assert_eq!(session.start_search("widget"), Err(SearchError::NoFile));
}

#[test]
fn test_failed_is_not_terminal() {
    let (mut session, request_rx, _outcome_tx) = session_with_channels();
    session.set_file(workbook());
    session.start_search("widget").unwrap();
    request_rx.try_recv().unwrap();

    session.apply_outcome(SearchOutcome {
        request_id: session.current_request_id(),
        result: Err(SearchError::Connection("refused".to_string())),
    });
    assert!(matches!(session.phase(), SearchPhase::Failed { .. }));

    // Re-submission re-enters Pending
    session.start_search("widget").unwrap();
    assert!(session.is_pending());
}

#[test]
fn test_new_search_clears_export_payload() {
    let (mut session, _request_rx, _outcome_tx) = session_with_channels();
    session.set_file(workbook());
    session.start_search("widget").unwrap();
    session.apply_outcome(SearchOutcome {
        request_id: session.current_request_id(),
        result: Ok(response_with_matches()),
    });

    let results = match session.phase() {
        SearchPhase::Succeeded { response, .. } => response.results_by_sheet.clone(),
        other => panic!("expected Succeeded, got {:?}", other),
    };
    assert!(session.export.prepare(&results));
    assert!(session.export.payload().is_some());

    // The export belongs to the results being replaced
    session.start_search("other").unwrap();
    assert!(session.export.payload().is_none());
}

// =========================================================================
// Status messages
// =========================================================================

#[test]
fn test_status_idle_with_file() {
    let mut session = SearchSession::new();
    session.set_file(workbook());
    assert_eq!(session.status_message(), "ready to search");
}

#[test]
fn test_status_pending_names_query() {
    let (mut session, _request_rx, _outcome_tx) = session_with_channels();
    session.set_file(workbook());
    session.start_search("widget").unwrap();
    assert_eq!(session.status_message(), "searching for \"widget\"...");
}

#[test]
fn test_status_reports_match_and_sheet_counts() {
    let (mut session, _request_rx, _outcome_tx) = session_with_channels();
    session.set_file(workbook());
    session.start_search("widget").unwrap();
    session.apply_outcome(SearchOutcome {
        request_id: session.current_request_id(),
        result: Ok(response_with_matches()),
    });

    // Sheet3 has a zero count and must not be counted as matched
    assert_eq!(session.status_message(), "3 matches across 2 sheets");
}

#[test]
fn test_status_singular_forms() {
    let (mut session, _request_rx, _outcome_tx) = session_with_channels();
    session.set_file(workbook());
    session.start_search("widget").unwrap();

    let response = crate::response::validate_response(json!({
        "keyword_results": { "Sheet1": { "columns": ["id"], "data": [["1"]] } },
        "keyword_summary": { "total_matches": 1, "sheet_counts": { "Sheet1": 1 } }
    }))
    .unwrap();
    session.apply_outcome(SearchOutcome {
        request_id: session.current_request_id(),
        result: Ok(response),
    });

    assert_eq!(session.status_message(), "1 match across 1 sheet");
}

#[test]
fn test_status_no_matches_names_query() {
    let (mut session, _request_rx, _outcome_tx) = session_with_channels();
    session.set_file(workbook());
    session.start_search("nothing").unwrap();

    let response = crate::response::validate_response(json!({
        "keyword_results": {},
        "keyword_summary": { "total_matches": 0, "sheet_counts": {} }
    }))
    .unwrap();
    session.apply_outcome(SearchOutcome {
        request_id: session.current_request_id(),
        result: Ok(response),
    });

    assert_eq!(session.status_message(), "no matches for \"nothing\"");
}

#[test]
fn test_status_failed_names_error() {
    let (mut session, _request_rx, _outcome_tx) = session_with_channels();
    session.set_file(workbook());
    session.start_search("widget").unwrap();
    session.apply_outcome(SearchOutcome {
        request_id: session.current_request_id(),
        result: Err(SearchError::Connection("connection refused".to_string())),
    });

    let status = session.status_message();
    assert!(status.contains("search failed"));
    assert!(status.contains("connection refused"));
}
