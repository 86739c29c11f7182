use crate::models::expansion::ExpansionStore;
use crate::models::group::GroupedCollection;
use crate::models::holding::HoldingRecord;
use crate::models::render::{RenderEntry, RenderPlan};

/// Combines grouped holdings with expansion flags into a render plan.
///
/// Read-only: never fetches, never touches the expansion store, and the
/// same inputs always give the same plan.
pub struct ProjectionService;

impl ProjectionService {
    pub fn new() -> Self {
        Self
    }

    /// One entry per group, in grouping order. Rows are attached only
    /// for expanded groups; collapsed groups get an empty slice.
    pub fn project<'a>(
        &self,
        grouped: &'a GroupedCollection,
        expansion: &ExpansionStore,
    ) -> RenderPlan<'a> {
        let entries = grouped
            .iter()
            .map(|group| {
                let expanded = expansion.is_expanded(&group.key);
                let rows: &'a [HoldingRecord] = if expanded { &group.records } else { &[] };
                RenderEntry {
                    group_key: &group.key,
                    count: group.records.len(),
                    expanded,
                    rows,
                }
            })
            .collect();
        RenderPlan { entries }
    }
}

impl Default for ProjectionService {
    fn default() -> Self {
        Self::new()
    }
}
