//! HTTP client for the search backend
//!
//! One round-trip per search: multipart upload of the workbook and query,
//! status check, JSON decode, shape validation. Uses reqwest for HTTP.
//!
//! Failures map onto the session error taxonomy so the user can tell a down
//! server from a rejected request from a garbage payload:
//! - request never completed -> `Connection`
//! - non-success status      -> `Http`
//! - undecodable/invalid body -> `MalformedResponse`

use reqwest::Client;
use reqwest::multipart::{Form, Part};

use crate::error::SearchError;
use crate::response::{SearchResponse, validate_response};

use super::session_state::WorkbookFile;

/// Client bound to one backend endpoint
///
/// The endpoint is passed in at construction, not read from a global, so
/// tests and deployments can point sessions at different backends.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    endpoint: String,
    use_semantic: bool,
}

impl BackendClient {
    pub fn new(endpoint: String, use_semantic: bool) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            use_semantic,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run one keyword search against the backend
    pub async fn search(
        &self,
        query: &str,
        file: &WorkbookFile,
    ) -> Result<SearchResponse, SearchError> {
        let form = Form::new()
            .part(
                "file",
                Part::bytes(file.bytes.clone()).file_name(file.name.clone()),
            )
            .text("query", query.to_string())
            .text("use_semantic", if self.use_semantic { "true" } else { "false" });

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SearchError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Http {
                status: status.as_u16(),
                status_text: status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
            });
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SearchError::MalformedResponse(e.to_string()))?;

        validate_response(value).map_err(|e| SearchError::MalformedResponse(e.to_string()))
    }
}
