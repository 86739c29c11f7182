use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::holding::{HoldingRecord, HoldingsResponse};
use crate::models::session::SessionId;
use super::traits::HoldingsSource;

/// In-memory holdings source for fixtures, demos and offline hosts.
///
/// Returns the same collection (cloned) on every fetch, or fails every
/// time with the configured message.
pub struct StaticHoldingsSource {
    outcome: Result<Vec<HoldingRecord>, String>,
}

impl StaticHoldingsSource {
    /// Source that always succeeds with `records`.
    pub fn new(records: Vec<HoldingRecord>) -> Self {
        Self {
            outcome: Ok(records),
        }
    }

    /// Source that always fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
        }
    }

    /// Source built from a raw endpoint body, e.g. a saved fixture file.
    pub fn from_json(body: &str) -> Result<Self, CoreError> {
        let records = HoldingsResponse::parse(body)?;
        Ok(Self::new(records))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl HoldingsSource for StaticHoldingsSource {
    fn name(&self) -> &str {
        "Static"
    }

    async fn fetch_holdings(&self, _session: SessionId) -> Result<Vec<HoldingRecord>, CoreError> {
        match &self.outcome {
            Ok(records) => Ok(records.clone()),
            Err(message) => Err(CoreError::Api {
                provider: "Static".into(),
                message: message.clone(),
            }),
        }
    }
}
