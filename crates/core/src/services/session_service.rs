use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::errors::CoreError;
use crate::models::holding::HoldingRecord;
use crate::models::session::{SessionId, SessionStatus};
use crate::providers::traits::HoldingsSource;

/// Prefix of every stored error description.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch data";

/// Handle for one fetch attempt, issued by [`SessionController::begin_load`].
///
/// Sequence numbers only grow, so a ticket from an older request can be
/// recognised and discarded when it completes late.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct LoadTicket {
    seq: u64,
}

impl LoadTicket {
    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug)]
enum SessionState {
    Idle,
    Loading,
    Success(Vec<HoldingRecord>),
    Error(String),
}

/// Owns the fetch lifecycle for one session.
///
/// Exactly one source call per `load()`, no automatic retry, no polling.
/// If several requests overlap, only the most recently started one may
/// change the state (last call wins).
pub struct SessionController {
    source: Box<dyn HoldingsSource>,
    id: SessionId,
    state: SessionState,
    last_seq: u64,
    in_flight: Option<u64>,
    loaded_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("source", &self.source.name())
            .field("id", &self.id)
            .field("status", &self.status())
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

impl SessionController {
    pub fn new(source: Box<dyn HoldingsSource>) -> Self {
        Self {
            source,
            id: SessionId::new(),
            state: SessionState::Idle,
            last_seq: 0,
            in_flight: None,
            loaded_at: None,
        }
    }

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.id
    }

    /// The record source, for hosts that drive `begin_load`/`complete_load` themselves.
    #[must_use]
    pub fn source(&self) -> &dyn HoldingsSource {
        self.source.as_ref()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        match self.state {
            SessionState::Idle => SessionStatus::Idle,
            SessionState::Loading => SessionStatus::Loading,
            SessionState::Success(_) => SessionStatus::Success,
            SessionState::Error(_) => SessionStatus::Error,
        }
    }

    /// The loaded collection, only while the status is `Success`.
    #[must_use]
    pub fn records(&self) -> Option<&[HoldingRecord]> {
        match &self.state {
            SessionState::Success(records) => Some(records.as_slice()),
            _ => None,
        }
    }

    /// The error description, only while the status is `Error`.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SessionState::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// When the currently held collection was received.
    #[must_use]
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start a new request and move to `Loading`.
    /// Any request still in flight is superseded by this one.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.last_seq += 1;
        if let Some(previous) = self.in_flight.replace(self.last_seq) {
            debug!("Request #{previous} superseded by #{}", self.last_seq);
        }
        self.state = SessionState::Loading;
        self.loaded_at = None;
        LoadTicket { seq: self.last_seq }
    }

    /// Apply the outcome of a request started with `begin_load`.
    ///
    /// Returns false (and changes nothing) when the ticket is stale,
    /// i.e. a later request was started or has already completed.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<HoldingRecord>, CoreError>,
    ) -> bool {
        if self.in_flight != Some(ticket.seq) {
            warn!(
                "Discarding stale response for request #{} (current: #{})",
                ticket.seq, self.last_seq
            );
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(records) => {
                debug!("Session {} loaded {} holdings", self.id, records.len());
                self.state = SessionState::Success(records);
                self.loaded_at = Some(Utc::now());
            }
            Err(e) => {
                warn!("Session {} failed to load holdings: {e}", self.id);
                self.state = SessionState::Error(describe_failure(&e));
            }
        }
        true
    }

    /// Fetch once from the source and settle the session state.
    pub async fn load(&mut self) -> SessionStatus {
        let ticket = self.begin_load();
        debug!(
            "Loading holdings from {} (request #{})",
            self.source.name(),
            ticket.seq
        );
        let result = self.source.fetch_holdings(self.id).await;
        self.complete_load(ticket, result);
        self.status()
    }
}

fn describe_failure(error: &CoreError) -> String {
    format!("{FETCH_FAILED_MESSAGE}: {error}")
}
