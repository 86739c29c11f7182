use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::group::GroupKey;

/// Per-group expanded/collapsed flags.
///
/// - A key that was never toggled reads as collapsed.
/// - Entries are created lazily on the first toggle and are kept for the
///   lifetime of the store, even if the group disappears from a later
///   grouping. Keys for groups that do not exist yet are stored but inert.
/// - Only `toggle` mutates; there is no expand-all / collapse-all.
///
/// Serializes as a list of `(key, expanded)` pairs sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<(GroupKey, bool)>", into = "Vec<(GroupKey, bool)>")]
pub struct ExpansionStore {
    flags: HashMap<GroupKey, bool>,
}

impl ExpansionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the flag for `key`. Unrelated keys are untouched.
    /// Returns the new value.
    pub fn toggle(&mut self, key: &GroupKey) -> bool {
        let flag = self.flags.entry(key.clone()).or_insert(false);
        *flag = !*flag;
        *flag
    }

    #[must_use]
    pub fn is_expanded(&self, key: &GroupKey) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    /// Keys currently expanded, sorted for a deterministic snapshot.
    #[must_use]
    pub fn expanded_keys(&self) -> Vec<&GroupKey> {
        let mut keys: Vec<&GroupKey> = self
            .flags
            .iter()
            .filter(|(_, &expanded)| expanded)
            .map(|(key, _)| key)
            .collect();
        keys.sort();
        keys
    }

    /// Number of keys ever toggled (expanded or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl From<Vec<(GroupKey, bool)>> for ExpansionStore {
    fn from(entries: Vec<(GroupKey, bool)>) -> Self {
        Self {
            flags: entries.into_iter().collect(),
        }
    }
}

impl From<ExpansionStore> for Vec<(GroupKey, bool)> {
    fn from(store: ExpansionStore) -> Self {
        let mut entries: Vec<(GroupKey, bool)> = store.flags.into_iter().collect();
        entries.sort();
        entries
    }
}
