use async_trait::async_trait;
use log::debug;
use reqwest::Client;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::holding::{HoldingRecord, HoldingsResponse};
use crate::models::session::SessionId;
use crate::models::settings::Settings;
use super::traits::HoldingsSource;

const PROVIDER_NAME: &str = "HTTP";

/// Holdings source backed by a JSON endpoint.
///
/// - **Request**: a single `GET {endpoint}` per fetch, no retries.
/// - **Response**: `{ "payload": [ { "name", "ticker", "asset_class", ... } ] }`
/// - Any non-2xx status or unparseable body is an error.
pub struct HttpHoldingsSource {
    client: Client,
    endpoint: String,
}

impl HttpHoldingsSource {
    /// Build a source from validated settings.
    pub fn new(settings: &Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.timeout_secs));
        Ok(Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            endpoint: settings.endpoint.trim().to_string(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Decode a response body into records, keeping payload order.
    /// Parse failures are reported as an API error of this source.
    pub fn parse_response(body: &str) -> Result<Vec<HoldingRecord>, CoreError> {
        HoldingsResponse::parse(body).map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Failed to parse holdings payload: {e}"),
        })
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl HoldingsSource for HttpHoldingsSource {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch_holdings(&self, session: SessionId) -> Result<Vec<HoldingRecord>, CoreError> {
        debug!("Fetching holdings for session {session} from {}", self.endpoint);

        let resp = self.client.get(&self.endpoint).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("Unexpected status {status}"),
            });
        }

        let body = resp.text().await?;
        let records = Self::parse_response(&body)?;
        debug!("Received {} holdings for session {session}", records.len());
        Ok(records)
    }
}
