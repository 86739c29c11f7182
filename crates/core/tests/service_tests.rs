// ═══════════════════════════════════════════════════════════════════
// Service Tests: GroupingService, ProjectionService, SessionController
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use holdings_table_core::errors::CoreError;
use holdings_table_core::models::expansion::ExpansionStore;
use holdings_table_core::models::group::{GroupKey, GroupedCollection};
use holdings_table_core::models::holding::{HoldingRecord, HoldingsResponse};
use holdings_table_core::models::session::{SessionId, SessionStatus};
use holdings_table_core::providers::traits::HoldingsSource;
use holdings_table_core::services::grouping_service::GroupingService;
use holdings_table_core::services::projection_service::ProjectionService;
use holdings_table_core::services::session_service::{SessionController, FETCH_FAILED_MESSAGE};

// ═══════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════

fn holding(name: &str, asset_class: &str) -> HoldingRecord {
    HoldingRecord::new(name, name, asset_class, 10.0, 11.0, 0.5, 110.0)
}

fn key(value: &str) -> GroupKey {
    GroupKey::from(value)
}

fn names(records: &[HoldingRecord]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}

/// Scenario input: A/Equity, B/Bond, C/Equity.
fn mixed_holdings() -> Vec<HoldingRecord> {
    vec![
        holding("A", "Equity"),
        holding("B", "Bond"),
        holding("C", "Equity"),
    ]
}

/// Source that replays queued outcomes and counts calls.
struct ScriptedSource {
    outcomes: Mutex<VecDeque<Result<Vec<HoldingRecord>, String>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSource {
    fn new(outcomes: Vec<Result<Vec<HoldingRecord>, String>>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: Arc::clone(&calls),
        };
        (source, calls)
    }
}

#[async_trait]
impl HoldingsSource for ScriptedSource {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn fetch_holdings(&self, _session: SessionId) -> Result<Vec<HoldingRecord>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no more outcomes".into()));
        next.map_err(CoreError::Network)
    }
}

fn controller(outcomes: Vec<Result<Vec<HoldingRecord>, String>>) -> (SessionController, Arc<AtomicUsize>) {
    let (source, calls) = ScriptedSource::new(outcomes);
    (SessionController::new(Box::new(source)), calls)
}

// ═══════════════════════════════════════════════════════════════════
// GroupingService
// ═══════════════════════════════════════════════════════════════════

mod grouping {
    use super::*;

    fn group(records: &[HoldingRecord]) -> GroupedCollection {
        GroupingService::new().group(records)
    }

    #[test]
    fn groups_in_first_appearance_order() {
        let grouped = group(&mixed_holdings());
        let keys: Vec<&GroupKey> = grouped.keys().collect();
        assert_eq!(keys, vec![&key("Equity"), &key("Bond")]);
        assert_eq!(names(grouped.get(&key("Equity")).unwrap()), vec!["A", "C"]);
        assert_eq!(names(grouped.get(&key("Bond")).unwrap()), vec!["B"]);
    }

    #[test]
    fn empty_input_gives_empty_collection() {
        let grouped = group(&[]);
        assert!(grouped.is_empty());
        assert_eq!(grouped.len(), 0);
        assert_eq!(grouped.total_records(), 0);
    }

    #[test]
    fn empty_asset_class_is_its_own_group() {
        let grouped = group(&[holding("Orphan", "")]);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped.get(&key("")).map(<[HoldingRecord]>::len), Some(1));
    }

    #[test]
    fn empty_null_and_missing_asset_class_are_separate_groups() {
        let records = HoldingsResponse::parse(
            r#"{"payload": [
                {"name": "E", "asset_class": ""},
                {"name": "N", "asset_class": null},
                {"name": "M"},
                {"name": "N2", "asset_class": null},
                {"name": "E2", "asset_class": ""}
            ]}"#,
        )
        .unwrap();
        let grouped = group(&records);

        let keys: Vec<&GroupKey> = grouped.keys().collect();
        assert_eq!(keys, vec![&key(""), &GroupKey::null(), &GroupKey::missing()]);
        assert_eq!(names(grouped.get(&key("")).unwrap()), vec!["E", "E2"]);
        assert_eq!(names(grouped.get(&GroupKey::null()).unwrap()), vec!["N", "N2"]);
        assert_eq!(names(grouped.get(&GroupKey::missing()).unwrap()), vec!["M"]);
    }

    #[test]
    fn every_record_lands_exactly_once() {
        let input = vec![
            holding("A", "Equity"),
            holding("B", "Bond"),
            holding("C", "Cash"),
            holding("D", "Equity"),
            holding("E", "Bond"),
            holding("F", "Equity"),
        ];
        let grouped = group(&input);
        assert_eq!(grouped.total_records(), input.len());

        let mut seen: Vec<&str> = grouped
            .iter()
            .flat_map(|g| g.records.iter().map(|r| r.name.as_str()))
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec!["A", "B", "C", "D", "E", "F"]);

        for g in &grouped {
            assert!(g.records.iter().all(|r| r.group_key() == g.key));
        }
    }

    #[test]
    fn preserves_relative_order_within_groups() {
        let input = vec![
            holding("z", "Equity"),
            holding("y", "Bond"),
            holding("a", "Equity"),
            holding("m", "Equity"),
            holding("b", "Bond"),
        ];
        let grouped = group(&input);
        assert_eq!(names(grouped.get(&key("Equity")).unwrap()), vec!["z", "a", "m"]);
        assert_eq!(names(grouped.get(&key("Bond")).unwrap()), vec!["y", "b"]);
    }

    #[test]
    fn is_not_a_sort() {
        let input = vec![holding("1", "Zeta"), holding("2", "Alpha"), holding("3", "Mu")];
        let grouped = group(&input);
        let keys: Vec<String> = grouped.keys().map(GroupKey::to_string).collect();
        assert_eq!(keys, vec!["Zeta", "Alpha", "Mu"]);
    }

    #[test]
    fn duplicate_records_are_kept() {
        let input = vec![holding("A", "Equity"), holding("A", "Equity")];
        let grouped = group(&input);
        assert_eq!(grouped.get(&key("Equity")).unwrap().len(), 2);
    }

    #[test]
    fn regrouping_is_idempotent() {
        let input = mixed_holdings();
        assert_eq!(group(&input), group(&input));
    }

    #[test]
    fn does_not_mutate_input() {
        let input = mixed_holdings();
        let before = input.clone();
        let _ = group(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn casing_and_whitespace_variants_are_distinct() {
        let input = vec![
            holding("A", "Equity"),
            holding("B", "equity"),
            holding("C", "Equity "),
        ];
        assert_eq!(group(&input).len(), 3);
    }

    #[test]
    fn unknown_key_lookup_is_none() {
        assert!(group(&mixed_holdings()).get(&key("Cash")).is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
// ProjectionService
// ═══════════════════════════════════════════════════════════════════

mod projection {
    use super::*;

    #[test]
    fn all_collapsed_by_default() {
        let grouped = GroupingService::new().group(&mixed_holdings());
        let expansion = ExpansionStore::new();
        let plan = ProjectionService::new().project(&grouped, &expansion);

        assert_eq!(plan.len(), 2);
        for entry in plan.iter() {
            assert!(!entry.expanded);
            assert!(entry.rows.is_empty());
        }
        assert_eq!(plan.entries[0].count, 2);
        assert_eq!(plan.entries[1].count, 1);
    }

    #[test]
    fn expanded_group_carries_rows_in_order() {
        let grouped = GroupingService::new().group(&mixed_holdings());
        let mut expansion = ExpansionStore::new();
        expansion.toggle(&key("Equity"));
        let plan = ProjectionService::new().project(&grouped, &expansion);

        let equity = plan.entry(&key("Equity")).unwrap();
        assert!(equity.expanded);
        assert_eq!(names(equity.rows), vec!["A", "C"]);

        let bond = plan.entry(&key("Bond")).unwrap();
        assert!(!bond.expanded);
        assert!(bond.rows.is_empty());
        assert_eq!(bond.count, 1);
    }

    #[test]
    fn entries_follow_grouping_order() {
        let grouped = GroupingService::new().group(&mixed_holdings());
        let plan = ProjectionService::new().project(&grouped, &ExpansionStore::new());
        let labels: Vec<String> = plan.iter().map(|e| e.header_label()).collect();
        assert_eq!(labels, vec!["Equity (2)", "Bond (1)"]);
    }

    #[test]
    fn collapsed_large_group_has_no_rows() {
        let input: Vec<HoldingRecord> = (0..10_000)
            .map(|i| holding(&format!("H{i}"), "Equity"))
            .collect();
        let grouped = GroupingService::new().group(&input);
        let plan = ProjectionService::new().project(&grouped, &ExpansionStore::new());
        assert_eq!(plan.entries[0].count, 10_000);
        assert!(plan.entries[0].rows.is_empty());
    }

    #[test]
    fn empty_grouping_gives_empty_plan() {
        let grouped = GroupingService::new().group(&[]);
        let plan = ProjectionService::new().project(&grouped, &ExpansionStore::new());
        assert!(plan.is_empty());
    }

    #[test]
    fn keys_without_groups_are_inert() {
        let grouped = GroupingService::new().group(&mixed_holdings());
        let mut expansion = ExpansionStore::new();
        expansion.toggle(&key("Cash"));
        let plan = ProjectionService::new().project(&grouped, &expansion);
        assert_eq!(plan.len(), 2);
        assert!(plan.iter().all(|e| !e.expanded));
        assert!(plan.entry(&key("Cash")).is_none());
    }

    #[test]
    fn same_inputs_same_plan() {
        let grouped = GroupingService::new().group(&mixed_holdings());
        let mut expansion = ExpansionStore::new();
        expansion.toggle(&key("Bond"));
        let service = ProjectionService::new();
        assert_eq!(service.project(&grouped, &expansion), service.project(&grouped, &expansion));
    }

    #[test]
    fn does_not_change_expansion_state() {
        let grouped = GroupingService::new().group(&mixed_holdings());
        let mut expansion = ExpansionStore::new();
        expansion.toggle(&key("Equity"));
        let before = expansion.clone();
        let _ = ProjectionService::new().project(&grouped, &expansion);
        assert_eq!(expansion, before);
    }
}

// ═══════════════════════════════════════════════════════════════════
// SessionController
// ═══════════════════════════════════════════════════════════════════

mod session {
    use super::*;

    #[test]
    fn starts_idle() {
        let (session, calls) = controller(vec![]);
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(session.records().is_none());
        assert!(session.error().is_none());
        assert!(session.loaded_at().is_none());
        assert!(!session.is_loading());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_load_stores_records_verbatim() {
        let (mut session, calls) = controller(vec![Ok(mixed_holdings())]);
        let status = session.load().await;

        assert_eq!(status, SessionStatus::Success);
        assert_eq!(session.records().unwrap(), mixed_holdings().as_slice());
        assert!(session.error().is_none());
        assert!(session.loaded_at().is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_load_stores_description() {
        let (mut session, calls) = controller(vec![Err("connection reset".into())]);
        let status = session.load().await;

        assert_eq!(status, SessionStatus::Error);
        assert!(session.records().is_none());
        let message = session.error().unwrap();
        assert!(message.starts_with(FETCH_FAILED_MESSAGE));
        assert!(message.contains("connection reset"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_is_not_retried_automatically() {
        let (mut session, calls) = controller(vec![Err("down".into()), Ok(mixed_holdings())]);
        session.load().await;
        assert_eq!(session.status(), SessionStatus::Error);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retry_after_error() {
        let (mut session, calls) = controller(vec![Err("down".into()), Ok(mixed_holdings())]);
        session.load().await;
        let status = session.load().await;
        assert_eq!(status, SessionStatus::Success);
        assert!(session.error().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn refresh_replaces_collection() {
        let (mut session, _) = controller(vec![
            Ok(mixed_holdings()),
            Ok(vec![holding("Z", "Cash")]),
        ]);
        session.load().await;
        session.load().await;
        assert_eq!(names(session.records().unwrap()), vec!["Z"]);
    }

    #[tokio::test]
    async fn refresh_failure_drops_previous_data() {
        let (mut session, _) = controller(vec![Ok(mixed_holdings()), Err("gone".into())]);
        session.load().await;
        session.load().await;
        assert_eq!(session.status(), SessionStatus::Error);
        assert!(session.records().is_none());
        assert!(session.loaded_at().is_none());
    }

    #[test]
    fn begin_load_moves_to_loading() {
        let (mut session, _) = controller(vec![]);
        let ticket = session.begin_load();
        assert_eq!(session.status(), SessionStatus::Loading);
        assert!(session.is_loading());
        assert_eq!(ticket.seq(), 1);
    }

    #[test]
    fn tickets_are_monotonic() {
        let (mut session, _) = controller(vec![]);
        let first = session.begin_load();
        let second = session.begin_load();
        assert!(second.seq() > first.seq());
    }

    #[test]
    fn stale_response_cannot_overwrite_newer_request() {
        let (mut session, _) = controller(vec![]);
        let slow = session.begin_load();
        let fast = session.begin_load();

        assert!(session.complete_load(fast, Ok(mixed_holdings())));
        assert_eq!(session.status(), SessionStatus::Success);

        assert!(!session.complete_load(slow, Err(CoreError::Network("timeout".into()))));
        assert_eq!(session.status(), SessionStatus::Success);
        assert_eq!(names(session.records().unwrap()), vec!["A", "B", "C"]);
    }

    #[test]
    fn stale_response_ignored_while_newer_in_flight() {
        let (mut session, _) = controller(vec![]);
        let old = session.begin_load();
        let _new = session.begin_load();

        assert!(!session.complete_load(old, Ok(mixed_holdings())));
        assert_eq!(session.status(), SessionStatus::Loading);
        assert!(session.is_loading());
    }

    #[test]
    fn ticket_cannot_complete_twice() {
        let (mut session, _) = controller(vec![]);
        let ticket = session.begin_load();
        assert!(session.complete_load(ticket, Ok(vec![])));
        assert!(!session.complete_load(ticket, Err(CoreError::Network("late".into()))));
        assert_eq!(session.status(), SessionStatus::Success);
    }

    #[test]
    fn debug_output_names_source() {
        let (session, _) = controller(vec![]);
        let debug = format!("{session:?}");
        assert!(debug.contains("Scripted"));
        assert!(debug.contains("Idle"));
    }
}
