use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Number, Value};

use crate::{CombineMode, FilterError, FilterMode};

/// Boolean expression tree sent to the query backend as the `filter`
/// variable.
///
/// Wire shapes:
/// `{"AND": [..]}`, `{"OR": [..]}`, `{"CONTAINS_ANY": {field: [..]}}` (and the
/// other [`FilterMode`] tags), `{"GTE": {field: n}}`, `{"LTE": {field: n}}`,
/// `{"nested": {"path": p, "AND"|"OR": [..]}}`.
#[derive(Clone, Debug, PartialEq)]
pub enum GqlFilter {
    Group {
        mode: CombineMode,
        clauses: Vec<GqlFilter>,
    },
    Values {
        op: FilterMode,
        field: String,
        values: Vec<String>,
    },
    Gte {
        field: String,
        value: Number,
    },
    Lte {
        field: String,
        value: Number,
    },
    Nested {
        path: String,
        mode: CombineMode,
        clauses: Vec<GqlFilter>,
    },
}

impl GqlFilter {
    pub fn group(mode: CombineMode, clauses: Vec<GqlFilter>) -> Self {
        GqlFilter::Group { mode, clauses }
    }

    pub fn and(clauses: Vec<GqlFilter>) -> Self {
        Self::group(CombineMode::And, clauses)
    }

    pub fn or(clauses: Vec<GqlFilter>) -> Self {
        Self::group(CombineMode::Or, clauses)
    }

    pub fn values<I, S>(op: FilterMode, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GqlFilter::Values {
            op,
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains_any<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::values(FilterMode::ContainsAny, field, values)
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Number>) -> Self {
        GqlFilter::Gte {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Number>) -> Self {
        GqlFilter::Lte {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn nested(path: impl Into<String>, mode: CombineMode, clauses: Vec<GqlFilter>) -> Self {
        GqlFilter::Nested {
            path: path.into(),
            mode,
            clauses,
        }
    }

    pub fn nested_path(&self) -> Option<&str> {
        match self {
            GqlFilter::Nested { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Result<Value, FilterError> {
        Ok(serde_json::to_value(self)?)
    }
}

struct Entry<'a, V: ?Sized>(&'a str, &'a V);

impl<V: Serialize + ?Sized> Serialize for Entry<'_, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.0, self.1)?;
        map.end()
    }
}

struct NestedBody<'a> {
    path: &'a str,
    mode: CombineMode,
    clauses: &'a [GqlFilter],
}

impl Serialize for NestedBody<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("path", self.path)?;
        map.serialize_entry(self.mode.as_str(), self.clauses)?;
        map.end()
    }
}

impl Serialize for GqlFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GqlFilter::Group { mode, clauses } => {
                Entry(mode.as_str(), clauses.as_slice()).serialize(serializer)
            }
            GqlFilter::Values { op, field, values } => {
                Entry(op.as_str(), &Entry(field, values.as_slice())).serialize(serializer)
            }
            GqlFilter::Gte { field, value } => {
                Entry("GTE", &Entry(field, value)).serialize(serializer)
            }
            GqlFilter::Lte { field, value } => {
                Entry("LTE", &Entry(field, value)).serialize(serializer)
            }
            GqlFilter::Nested {
                path,
                mode,
                clauses,
            } => Entry(
                "nested",
                &NestedBody {
                    path,
                    mode: *mode,
                    clauses,
                },
            )
            .serialize(serializer),
        }
    }
}
