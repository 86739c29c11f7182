use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Holdings endpoint used when no other is configured.
pub const DEFAULT_ENDPOINT: &str = "https://canopy-frontend-task.now.sh/api/holdings";

/// Request timeout used when no other is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Record source configuration.
///
/// Every field has a default, so a partial JSON document is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Full URL of the holdings endpoint.
    pub endpoint: String,

    /// Per-request timeout in seconds (ignored on WASM).
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that could never produce a successful fetch.
    pub fn validate(&self) -> Result<(), CoreError> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(CoreError::InvalidSettings("endpoint must not be empty".into()));
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(CoreError::InvalidSettings(format!(
                "endpoint must be an http(s) URL, got '{endpoint}'"
            )));
        }
        if self.timeout_secs == 0 {
            return Err(CoreError::InvalidSettings(
                "timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
