use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Number, Value};

use crate::decode;
use crate::{CombineMode, FilterError, FilterMode};

/// Constraint on one field, keyed by field name in a standard filter.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldFilter {
    Option(OptionFilter),
    Range(RangeFilter),
    /// Only valid under an `<anchorField>:<anchorValue>` key.
    Anchored(AnchoredFilter),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OptionFilter {
    /// `None` only for a combine-mode-only placeholder; `Some(vec![])` is a
    /// real clause over no values.
    pub selected_values: Option<Vec<String>>,
    pub filter_mode: FilterMode,
    pub combine_mode: Option<CombineMode>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RangeFilter {
    pub lower_bound: Number,
    pub upper_bound: Number,
}

/// Sub-filter scoped to related records where `anchor_field == anchor_value`.
#[derive(Clone, Debug, PartialEq)]
pub struct AnchoredFilter {
    pub anchor_field: String,
    pub anchor_value: String,
    pub combine_mode: Option<CombineMode>,
    pub value: IndexMap<String, FieldFilter>,
}

impl FieldFilter {
    pub fn from_json(key: &str, value: &Value) -> Result<Self, FilterError> {
        let Value::Object(obj) = value else {
            return Err(FilterError::invalid_value(key, value));
        };

        match decode::tag(obj) {
            Some("OPTION") => OptionFilter::from_object(key, obj).map(FieldFilter::Option),
            Some("RANGE") => RangeFilter::from_object(key, obj).map(FieldFilter::Range),
            Some("ANCHORED") => AnchoredFilter::from_object(key, obj).map(FieldFilter::Anchored),
            Some(_) => Err(FilterError::invalid_value(key, value)),
            None if obj.contains_key("selectedValues") => {
                OptionFilter::from_object(key, obj).map(FieldFilter::Option)
            }
            None if obj.contains_key("lowerBound") || obj.contains_key("upperBound") => {
                RangeFilter::from_object(key, obj).map(FieldFilter::Range)
            }
            None if obj.get("value").is_some_and(Value::is_object) => {
                AnchoredFilter::from_object(key, obj).map(FieldFilter::Anchored)
            }
            None if obj.contains_key("filterMode")
                || obj.contains_key("isExclusion")
                || obj.keys().any(|name| decode::is_combine_mode_key(name)) =>
            {
                OptionFilter::from_object(key, obj).map(FieldFilter::Option)
            }
            None => Err(FilterError::invalid_value(key, value)),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldFilter::Option(filter) => filter.to_json(),
            FieldFilter::Range(filter) => filter.to_json(),
            FieldFilter::Anchored(filter) => filter.to_json(),
        }
    }
}

impl Serialize for FieldFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl OptionFilter {
    pub fn new<I, S>(selected_values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected_values: Some(selected_values.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn placeholder(combine_mode: CombineMode) -> Self {
        Self {
            combine_mode: Some(combine_mode),
            ..Self::default()
        }
    }

    pub fn values(&self) -> &[String] {
        self.selected_values.as_deref().unwrap_or_default()
    }

    pub fn with_filter_mode(mut self, filter_mode: FilterMode) -> Self {
        self.filter_mode = filter_mode;
        self
    }

    pub fn with_combine_mode(mut self, combine_mode: CombineMode) -> Self {
        self.combine_mode = Some(combine_mode);
        self
    }

    /// An option filter without a `selectedValues` list only signals an
    /// intended combine mode and contributes no clauses.
    pub fn is_placeholder(&self) -> bool {
        self.selected_values.is_none()
    }

    fn from_object(key: &str, obj: &Map<String, Value>) -> Result<Self, FilterError> {
        let invalid = || FilterError::invalid_value(key, &Value::Object(obj.clone()));

        let selected_values = match obj.get("selectedValues") {
            None | Some(Value::Null) => None,
            Some(Value::Array(values)) => Some(
                values
                    .iter()
                    .map(|value| value.as_str().map(str::to_string).ok_or_else(invalid))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Some(_) => return Err(invalid()),
        };
        let combine_mode = decode::combine_mode(key, obj)?;

        // without values, only a combine mode makes this a placeholder
        if selected_values.is_none() && combine_mode.is_none() {
            return Err(invalid());
        }

        let filter_mode = match obj.get("filterMode") {
            None | Some(Value::Null) => {
                if obj.get("isExclusion").and_then(Value::as_bool) == Some(true) {
                    FilterMode::ExcludesAny
                } else {
                    FilterMode::ContainsAny
                }
            }
            Some(value) => value
                .as_str()
                .and_then(FilterMode::parse)
                .ok_or_else(invalid)?,
        };

        Ok(Self {
            selected_values,
            filter_mode,
            combine_mode,
        })
    }

    fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("__type".to_string(), json!("OPTION"));
        if let Some(values) = &self.selected_values {
            out.insert("selectedValues".to_string(), json!(values));
        }
        out.insert("filterMode".to_string(), json!(self.filter_mode.as_str()));
        if let Some(mode) = self.combine_mode {
            out.insert("__combineMode".to_string(), json!(mode.as_str()));
        }
        Value::Object(out)
    }
}

impl RangeFilter {
    pub fn new(lower_bound: impl Into<Number>, upper_bound: impl Into<Number>) -> Self {
        Self {
            lower_bound: lower_bound.into(),
            upper_bound: upper_bound.into(),
        }
    }

    fn from_object(key: &str, obj: &Map<String, Value>) -> Result<Self, FilterError> {
        let bound = |name: &str| match obj.get(name) {
            Some(Value::Number(number)) => Ok(number.clone()),
            _ => Err(FilterError::invalid_value(key, &Value::Object(obj.clone()))),
        };

        Ok(Self {
            lower_bound: bound("lowerBound")?,
            upper_bound: bound("upperBound")?,
        })
    }

    fn to_json(&self) -> Value {
        json!({
            "__type": "RANGE",
            "lowerBound": self.lower_bound,
            "upperBound": self.upper_bound,
        })
    }
}

impl AnchoredFilter {
    /// Splits an `<anchorField>:<anchorValue>` key.
    pub fn split_key(key: &str) -> Option<(&str, &str)> {
        key.split_once(':')
            .filter(|(field, value)| !field.is_empty() && !value.is_empty())
    }

    pub fn key(&self) -> String {
        format!("{}:{}", self.anchor_field, self.anchor_value)
    }

    pub fn from_json(key: &str, value: &Value) -> Result<Self, FilterError> {
        match value {
            Value::Object(obj) => Self::from_object(key, obj),
            other => Err(FilterError::invalid_value(key, other)),
        }
    }

    fn from_object(key: &str, obj: &Map<String, Value>) -> Result<Self, FilterError> {
        let invalid = || FilterError::invalid_value(key, &Value::Object(obj.clone()));

        let (anchor_field, anchor_value) = Self::split_key(key).ok_or_else(invalid)?;
        let Some(Value::Object(inner)) = obj.get("value") else {
            return Err(invalid());
        };

        let mut combine_mode = decode::combine_mode(key, obj)?;
        let mut value = IndexMap::with_capacity(inner.len());
        for (field, field_value) in inner {
            if decode::is_combine_mode_key(field) {
                if combine_mode.is_none() {
                    combine_mode = Some(decode::parse_combine_mode(key, field_value)?);
                }
                continue;
            }

            match FieldFilter::from_json(field, field_value)? {
                FieldFilter::Anchored(_) => {
                    return Err(FilterError::invalid_value(field, field_value));
                }
                filter => {
                    value.insert(field.clone(), filter);
                }
            }
        }

        Ok(Self {
            anchor_field: anchor_field.to_string(),
            anchor_value: anchor_value.to_string(),
            combine_mode,
            value,
        })
    }

    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("__type".to_string(), json!("ANCHORED"));
        if let Some(mode) = self.combine_mode {
            out.insert("__combineMode".to_string(), json!(mode.as_str()));
        }
        let value = self
            .value
            .iter()
            .map(|(field, filter)| (field.clone(), filter.to_json()))
            .collect::<Map<_, _>>();
        out.insert("value".to_string(), Value::Object(value));
        Value::Object(out)
    }
}
