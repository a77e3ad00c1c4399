use thiserror::Error;

/// Everything that can end a single search attempt
///
/// Precondition failures (`NoFile`, `NoQuery`) surface as guidance before any
/// request is sent; the rest resolve the session to its failed state. None of
/// these crash the session. Retry is a user-initiated re-submission.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("no workbook loaded. Choose a workbook file before searching")]
    NoFile,

    #[error("search term is empty. Type a keyword to search for")]
    NoQuery,

    #[error("search backend returned HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },

    #[error("could not reach the search backend: {0}")]
    Connection(String),

    #[error("search backend sent a malformed response: {0}")]
    MalformedResponse(String),
}
