//! Search session state machine

use std::sync::mpsc::{Receiver, Sender};

use crate::error::SearchError;
use crate::export::ExportState;
use crate::response::SearchResponse;

/// An uploaded workbook: opaque bytes plus a display name
///
/// The session only checks that a file exists; parsing the workbook is the
/// backend's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Request sent to the search worker
#[derive(Debug)]
pub struct SearchRequest {
    pub request_id: u64,
    pub query: String,
    pub file: WorkbookFile,
}

/// Outcome sent back from the search worker
#[derive(Debug)]
pub struct SearchOutcome {
    pub request_id: u64,
    pub result: Result<SearchResponse, SearchError>,
}

/// Where one logical search currently stands
///
/// Exactly one phase is active at a time. Succeeded and Failed are not
/// terminal: a subsequent search re-enters Pending.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPhase {
    Idle,
    Pending {
        query: String,
    },
    Succeeded {
        query: String,
        response: SearchResponse,
    },
    Failed {
        query: String,
        error: SearchError,
    },
}

/// State for one search lifecycle
///
/// Owns the current phase, the uploaded workbook, the worker channels, and
/// the transient CSV export payload. A new search started while one is
/// pending supersedes it: the request token is bumped and the stale outcome
/// is dropped when it eventually arrives.
pub struct SearchSession {
    phase: SearchPhase,
    file: Option<WorkbookFile>,

    /// Monotonically increasing token. Outcomes carrying any other value are
    /// stale and must not touch session state.
    request_id: u64,

    request_tx: Option<Sender<SearchRequest>>,
    pub(crate) response_rx: Option<Receiver<SearchOutcome>>,

    pub export: ExportState,
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            phase: SearchPhase::Idle,
            file: None,
            request_id: 0,
            request_tx: None,
            response_rx: None,
            export: ExportState::new(),
        }
    }

    /// Set the channel handles for communication with the worker thread
    pub fn set_channels(
        &mut self,
        request_tx: Sender<SearchRequest>,
        response_rx: Receiver<SearchOutcome>,
    ) {
        self.request_tx = Some(request_tx);
        self.response_rx = Some(response_rx);
    }

    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    pub fn file(&self) -> Option<&WorkbookFile> {
        self.file.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, SearchPhase::Pending { .. })
    }

    /// Token of the most recently issued request
    pub fn current_request_id(&self) -> u64 {
        self.request_id
    }

    /// Replace the uploaded workbook, discarding any prior result
    pub fn set_file(&mut self, file: WorkbookFile) {
        log::debug!("Workbook replaced: {} ({} bytes)", file.name, file.bytes.len());
        self.file = Some(file);
        self.reset();
    }

    /// Remove the uploaded workbook, discarding any prior result
    pub fn clear_file(&mut self) {
        self.file = None;
        self.reset();
    }

    /// Back to Idle, with any in-flight response made stale
    fn reset(&mut self) {
        self.request_id = self.request_id.wrapping_add(1);
        self.phase = SearchPhase::Idle;
        self.export.clear();
    }

    /// Start a search for the given term
    ///
    /// Precondition failures (`NoFile`, `NoQuery`) leave the phase untouched
    /// and send nothing to the worker; the caller surfaces them as guidance.
    /// Otherwise the session enters Pending and ships a request carrying a
    /// fresh token.
    pub fn start_search(&mut self, query: &str) -> Result<(), SearchError> {
        let Some(file) = self.file.clone() else {
            return Err(SearchError::NoFile);
        };
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::NoQuery);
        }

        // Supersede any in-flight request and drop the export derived from
        // the results being replaced
        self.request_id = self.request_id.wrapping_add(1);
        self.export.clear();
        self.phase = SearchPhase::Pending {
            query: query.to_string(),
        };

        if let Some(ref tx) = self.request_tx
            && tx
                .send(SearchRequest {
                    request_id: self.request_id,
                    query: query.to_string(),
                    file,
                })
                .is_ok()
        {
            return Ok(());
        }

        let error = SearchError::Connection("search worker unavailable".to_string());
        self.phase = SearchPhase::Failed {
            query: query.to_string(),
            error: error.clone(),
        };
        Err(error)
    }

    /// Apply a worker outcome, rejecting stale ones
    ///
    /// Returns true if the session state changed.
    pub fn apply_outcome(&mut self, outcome: SearchOutcome) -> bool {
        if outcome.request_id != self.request_id {
            log::debug!(
                "Ignoring stale search outcome {} (current: {})",
                outcome.request_id,
                self.request_id
            );
            return false;
        }

        let SearchPhase::Pending { query } = &self.phase else {
            log::debug!("Dropping outcome {}: session not pending", outcome.request_id);
            return false;
        };
        let query = query.clone();

        self.phase = match outcome.result {
            Ok(response) => SearchPhase::Succeeded { query, response },
            Err(error) => SearchPhase::Failed { query, error },
        };
        true
    }

    /// Resolve a pending search to a failure without a worker outcome
    pub(crate) fn fail_pending(&mut self, error: SearchError) {
        if let SearchPhase::Pending { query } = &self.phase {
            self.phase = SearchPhase::Failed {
                query: query.clone(),
                error,
            };
        }
    }

    /// Human-readable status for the current phase
    pub fn status_message(&self) -> String {
        match &self.phase {
            SearchPhase::Idle => {
                if self.file.is_some() {
                    "ready to search".to_string()
                } else {
                    "choose a workbook to search".to_string()
                }
            }
            SearchPhase::Pending { query } => format!("searching for \"{}\"...", query),
            SearchPhase::Succeeded { query, response } => {
                let total = response.summary.total_matches;
                if total == 0 {
                    return format!("no matches for \"{}\"", query);
                }
                let sheets = if response.summary.sheet_counts.is_empty() {
                    response.matched_sheet_count()
                } else {
                    response
                        .summary
                        .sheet_counts
                        .values()
                        .filter(|&&count| count > 0)
                        .count()
                };
                format!(
                    "{} match{} across {} sheet{}",
                    total,
                    if total == 1 { "" } else { "es" },
                    sheets,
                    if sheets == 1 { "" } else { "s" },
                )
            }
            SearchPhase::Failed { error, .. } => format!("search failed: {}", error),
        }
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "session_state_tests.rs"]
mod session_state_tests;
