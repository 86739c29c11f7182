use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::holding::HoldingRecord;
use crate::models::session::SessionId;

/// Trait abstraction for the record source the holdings come from.
///
/// The session only needs "one call, a collection of records or an error".
/// Transport, retries and auth stay behind this trait.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait HoldingsSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the full holdings collection once.
    /// Records must be returned in source order, unmodified.
    async fn fetch_holdings(&self, session: SessionId) -> Result<Vec<HoldingRecord>, CoreError>;
}
