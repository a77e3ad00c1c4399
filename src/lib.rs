//! sheetseek library - workbook keyword search client
//!
//! This library exposes the core functionality of sheetseek for testing purposes.

pub mod config;
pub mod error;
pub mod export;
pub mod highlight;
pub mod response;
pub mod session;

// Re-export commonly used types for convenience
pub use error::SearchError;
pub use response::{SearchResponse, SheetResult};
pub use session::{SearchPhase, SearchSession, WorkbookFile};
