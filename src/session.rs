//! Asynchronous search lifecycle
//!
//! One logical search moves through idle, pending, and succeeded/failed
//! phases. The HTTP round-trip runs on a dedicated worker thread; the session
//! owns a monotonically increasing request token and drops any outcome that
//! arrives for a superseded request, so overlapping searches always resolve
//! to the latest one issued.

pub mod client;
pub mod session_events;
pub mod session_state;
pub mod worker;

pub use client::BackendClient;
pub use session_events::poll_session;
pub use session_state::{SearchOutcome, SearchPhase, SearchRequest, SearchSession, WorkbookFile};
