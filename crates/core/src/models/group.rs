use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::holding::{AssetClass, HoldingRecord};

/// Distinct `asset_class` value observed in the source collection.
///
/// Compared exactly: "Equity" and "equity " are different keys, and the
/// empty string, `null` and a missing field are three different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(AssetClass);

impl GroupKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(AssetClass::Value(value.into()))
    }

    /// Key of records whose `asset_class` was sent as `null`.
    pub fn null() -> Self {
        Self(AssetClass::Null)
    }

    /// Key of records sent without an `asset_class` field.
    pub fn missing() -> Self {
        Self(AssetClass::Missing)
    }

    /// The asset class string, or None for the null / missing keys.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    #[must_use]
    pub fn asset_class(&self) -> &AssetClass {
        &self.0
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for GroupKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for GroupKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<AssetClass> for GroupKey {
    fn from(value: AssetClass) -> Self {
        Self(value)
    }
}

/// One group: its key and its members in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub key: GroupKey,
    pub records: Vec<HoldingRecord>,
}

/// Ordered mapping GroupKey → records.
///
/// Groups are kept in first-appearance order of their key, and records inside
/// a group keep their relative source order. The key index is only a lookup
/// aid; iteration always follows `groups`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupedCollection {
    groups: Vec<Group>,
    #[serde(skip)]
    index: HashMap<GroupKey, usize>,
}

impl GroupedCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to its group, opening a new group at the end
    /// if the key has not been seen yet.
    pub(crate) fn push(&mut self, record: HoldingRecord) {
        let key = record.group_key();
        match self.index.get(&key) {
            Some(&pos) => self.groups[pos].records.push(record),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push(Group {
                    key,
                    records: vec![record],
                });
            }
        }
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group keys in display order.
    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.groups.iter().map(|g| &g.key)
    }

    /// Members of a group, or None if the key is not present.
    #[must_use]
    pub fn get(&self, key: &GroupKey) -> Option<&[HoldingRecord]> {
        self.index
            .get(key)
            .map(|&pos| self.groups[pos].records.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    /// Total number of records across all groups.
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.groups.iter().map(|g| g.records.len()).sum()
    }
}

impl PartialEq for GroupedCollection {
    fn eq(&self, other: &Self) -> bool {
        // The index is derived from `groups`, so comparing groups is enough.
        self.groups == other.groups
    }
}

impl<'a> IntoIterator for &'a GroupedCollection {
    type Item = &'a Group;
    type IntoIter = std::slice::Iter<'a, Group>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}
