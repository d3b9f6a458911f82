use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::FilterState;

/// A named, savable filter state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub filter: FilterState,
}

impl FilterSet {
    pub fn new(name: impl Into<String>, filter: FilterState) -> Self {
        Self {
            name: name.into(),
            filter,
            ..Self::default()
        }
    }
}

/// Snapshot of the filter-sets a user has open, keyed by filter-set id.
///
/// Callers hand one consistent snapshot to each resolve call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Workspace {
    filter_sets: IndexMap<String, FilterSet>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&FilterSet> {
        self.filter_sets.get(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, filter_set: FilterSet) -> Option<FilterSet> {
        self.filter_sets.insert(id.into(), filter_set)
    }

    pub fn with(mut self, id: impl Into<String>, filter_set: FilterSet) -> Self {
        self.insert(id, filter_set);
        self
    }

    pub fn len(&self) -> usize {
        self.filter_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filter_sets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterSet)> {
        self.filter_sets
            .iter()
            .map(|(id, filter_set)| (id.as_str(), filter_set))
    }
}

impl FromIterator<(String, FilterSet)> for Workspace {
    fn from_iter<I: IntoIterator<Item = (String, FilterSet)>>(iter: I) -> Self {
        Self {
            filter_sets: iter.into_iter().collect(),
        }
    }
}
