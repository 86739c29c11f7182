use log::debug;

use crate::models::group::GroupedCollection;
use crate::models::holding::HoldingRecord;

/// Partitions holdings into groups keyed by `asset_class`.
///
/// Pure business logic: no I/O, no state. This is a stable partition,
/// not a sort:
/// - every input record lands in exactly one group, under its own key;
/// - groups appear in the order their key is first seen;
/// - records keep their relative input order inside a group.
pub struct GroupingService;

impl GroupingService {
    pub fn new() -> Self {
        Self
    }

    /// Group `records` without modifying them. Total: an empty input
    /// yields an empty collection, and an empty `asset_class` is just
    /// another key.
    pub fn group(&self, records: &[HoldingRecord]) -> GroupedCollection {
        let mut grouped = GroupedCollection::new();
        for record in records {
            grouped.push(record.clone());
        }
        debug!(
            "Grouped {} holdings into {} asset classes",
            records.len(),
            grouped.len()
        );
        grouped
    }
}

impl Default for GroupingService {
    fn default() -> Self {
        Self::new()
    }
}
