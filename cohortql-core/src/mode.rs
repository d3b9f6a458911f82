use std::fmt;

use serde::{Deserialize, Serialize};

/// How sibling clauses are joined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombineMode {
    #[default]
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

impl CombineMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CombineMode::And => "AND",
            CombineMode::Or => "OR",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "AND" => Some(CombineMode::And),
            "OR" => Some(CombineMode::Or),
            _ => None,
        }
    }
}

impl fmt::Display for CombineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Matching mode of an option filter. The `Excludes*` variants are the
/// exclusion ("must not match") counterparts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterMode {
    #[default]
    ContainsAny,
    ContainsAll,
    ExcludesAny,
    ExcludesAll,
}

impl FilterMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterMode::ContainsAny => "CONTAINS_ANY",
            FilterMode::ContainsAll => "CONTAINS_ALL",
            FilterMode::ExcludesAny => "EXCLUDES_ANY",
            FilterMode::ExcludesAll => "EXCLUDES_ALL",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "CONTAINS_ANY" => Some(FilterMode::ContainsAny),
            "CONTAINS_ALL" => Some(FilterMode::ContainsAll),
            "EXCLUDES_ANY" => Some(FilterMode::ExcludesAny),
            "EXCLUDES_ALL" => Some(FilterMode::ExcludesAll),
            _ => None,
        }
    }

    pub fn is_exclusion(self) -> bool {
        matches!(self, FilterMode::ExcludesAny | FilterMode::ExcludesAll)
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
