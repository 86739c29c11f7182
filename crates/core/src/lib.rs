pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use chrono::{DateTime, Utc};
use models::{
    expansion::ExpansionStore,
    group::{GroupKey, GroupedCollection},
    holding::HoldingRecord,
    render::RenderPlan,
    session::{SessionId, SessionStatus},
    settings::Settings,
};
use providers::{http::HttpHoldingsSource, traits::HoldingsSource};
use services::{
    grouping_service::GroupingService, projection_service::ProjectionService,
    session_service::{LoadTicket, SessionController},
};

use errors::CoreError;

/// Main entry point for the holdings table core library.
/// Holds the session, the expansion flags and the grouped view of the
/// last successful load.
#[must_use]
pub struct HoldingsTable {
    session: SessionController,
    expansion: ExpansionStore,
    grouping_service: GroupingService,
    projection_service: ProjectionService,
    /// Grouping of the current collection. Rebuilt only when a load
    /// succeeds; `None` whenever the session is not in `Success`.
    grouped: Option<GroupedCollection>,
}

impl std::fmt::Debug for HoldingsTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoldingsTable")
            .field("session", &self.session)
            .field("groups", &self.grouped.as_ref().map(GroupedCollection::len))
            .field("toggled_keys", &self.expansion.len())
            .finish()
    }
}

impl HoldingsTable {
    /// Create a table over any record source. Nothing is fetched until `load()`.
    pub fn new(source: Box<dyn HoldingsSource>) -> Self {
        Self {
            session: SessionController::new(source),
            expansion: ExpansionStore::new(),
            grouping_service: GroupingService::new(),
            projection_service: ProjectionService::new(),
            grouped: None,
        }
    }

    /// Create a table backed by the HTTP holdings endpoint from `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self, CoreError> {
        let source = HttpHoldingsSource::new(settings)?;
        Ok(Self::new(Box::new(source)))
    }

    // ── Session ─────────────────────────────────────────────────────

    /// Fetch holdings once. On success the groups are rebuilt; on failure
    /// the error description replaces any previous data.
    /// Expansion flags are never touched by a load.
    pub async fn load(&mut self) -> SessionStatus {
        self.grouped = None;
        let status = self.session.load().await;
        self.regroup();
        status
    }

    /// Start a request without awaiting it, for hosts that run the fetch on
    /// their own event loop. Pair with `complete_load`.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.grouped = None;
        self.session.begin_load()
    }

    /// Apply a fetch result. Stale tickets are ignored and return false.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<HoldingRecord>, CoreError>,
    ) -> bool {
        let applied = self.session.complete_load(ticket, result);
        if applied {
            self.regroup();
        }
        applied
    }

    /// The record source, for hosts driving `begin_load` / `complete_load`.
    #[must_use]
    pub fn source(&self) -> &dyn HoldingsSource {
        self.session.source()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    /// Error description, only when the status is `Error`.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.session.error()
    }

    /// Loaded records in source order, only when the status is `Success`.
    #[must_use]
    pub fn records(&self) -> Option<&[HoldingRecord]> {
        self.session.records()
    }

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session.session_id()
    }

    #[must_use]
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.session.loaded_at()
    }

    // ── Expansion ───────────────────────────────────────────────────

    /// Flip one group between expanded and collapsed. Works in any session
    /// state; a key with no matching group is remembered until it appears.
    pub fn toggle(&mut self, key: &GroupKey) -> bool {
        self.expansion.toggle(key)
    }

    #[must_use]
    pub fn is_expanded(&self, key: &GroupKey) -> bool {
        self.expansion.is_expanded(key)
    }

    #[must_use]
    pub fn expansion(&self) -> &ExpansionStore {
        &self.expansion
    }

    // ── View ────────────────────────────────────────────────────────

    /// Grouped holdings of the current collection, if loaded.
    #[must_use]
    pub fn grouped(&self) -> Option<&GroupedCollection> {
        self.grouped.as_ref()
    }

    /// Render plan for the current state, or `None` unless the session is
    /// in `Success`. Cheap to call after every toggle.
    #[must_use]
    pub fn render_plan(&self) -> Option<RenderPlan<'_>> {
        let grouped = self.grouped.as_ref()?;
        Some(self.projection_service.project(grouped, &self.expansion))
    }

    fn regroup(&mut self) {
        self.grouped = self
            .session
            .records()
            .map(|records| self.grouping_service.group(records));
    }
}
