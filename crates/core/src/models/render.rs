use serde::Serialize;

use super::group::GroupKey;
use super::holding::HoldingRecord;

/// One group header in the render plan, optionally followed by its rows.
///
/// `rows` borrows from the `GroupedCollection` and is an empty slice
/// whenever `expanded` is false, whatever the group size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderEntry<'a> {
    pub group_key: &'a GroupKey,
    pub count: usize,
    pub expanded: bool,
    pub rows: &'a [HoldingRecord],
}

impl RenderEntry<'_> {
    /// Header text, e.g. `"Equity (2)"`.
    #[must_use]
    pub fn header_label(&self) -> String {
        format!("{} ({})", self.group_key, self.count)
    }
}

/// Ordered list of entries, one per group, in grouping order.
/// This is the only structure presentation layers consume.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RenderPlan<'a> {
    pub entries: Vec<RenderEntry<'a>>,
}

impl<'a> RenderPlan<'a> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenderEntry<'a>> {
        self.entries.iter()
    }

    /// Entry for a given group key, if that group exists.
    #[must_use]
    pub fn entry(&self, key: &GroupKey) -> Option<&RenderEntry<'a>> {
        self.entries.iter().find(|e| e.group_key == key)
    }
}
