//! Configuration types

use serde::Deserialize;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Search backend settings
///
/// The endpoint is configuration, not a module constant, so sessions can be
/// pointed at different backends in tests and deployments.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// URL of the backend search endpoint
    #[serde(default = "BackendConfig::default_endpoint")]
    pub endpoint: String,

    /// Request semantic results in addition to keyword matches.
    /// Carried on the wire but fixed off; semantic ranking is out of scope.
    #[serde(default)]
    pub use_semantic: bool,
}

impl BackendConfig {
    pub const DEFAULT_ENDPOINT: &'static str = "http://127.0.0.1:8000/search";

    fn default_endpoint() -> String {
        Self::DEFAULT_ENDPOINT.to_string()
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::default_endpoint(),
            use_semantic: false,
        }
    }
}
