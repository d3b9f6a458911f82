use indexmap::IndexMap;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::decode;
use crate::{AnchoredFilter, CombineMode, FieldFilter, FilterError};

/// A serializable, user-built filter tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum FilterState {
    #[default]
    Empty,
    Standard {
        combine_mode: Option<CombineMode>,
        value: IndexMap<String, FieldFilter>,
    },
    Anchored {
        combine_mode: Option<CombineMode>,
        value: IndexMap<String, AnchoredFilter>,
    },
    Composed {
        combine_mode: Option<CombineMode>,
        ref_ids: Vec<String>,
        value: Vec<FilterState>,
    },
    Ref(FilterRef),
}

/// Placeholder pointing at a named filter-set in the workspace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRef {
    pub id: String,
    #[serde(default)]
    pub label: String,
}

impl FilterState {
    pub fn standard<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldFilter)>,
        K: Into<String>,
    {
        FilterState::Standard {
            combine_mode: None,
            value: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn composed(combine_mode: CombineMode, value: Vec<FilterState>) -> Self {
        FilterState::Composed {
            combine_mode: Some(combine_mode),
            ref_ids: Vec::new(),
            value,
        }
    }

    pub fn reference(id: impl Into<String>, label: impl Into<String>) -> Self {
        FilterState::Ref(FilterRef {
            id: id.into(),
            label: label.into(),
        })
    }

    pub fn with_combine_mode(mut self, mode: CombineMode) -> Self {
        match &mut self {
            FilterState::Standard { combine_mode, .. }
            | FilterState::Anchored { combine_mode, .. }
            | FilterState::Composed { combine_mode, .. } => *combine_mode = Some(mode),
            FilterState::Empty | FilterState::Ref(_) => {}
        }
        self
    }

    /// Effective combine mode; `AND` when unset.
    pub fn combine_mode(&self) -> CombineMode {
        match self {
            FilterState::Standard { combine_mode, .. }
            | FilterState::Anchored { combine_mode, .. }
            | FilterState::Composed { combine_mode, .. } => combine_mode.unwrap_or_default(),
            FilterState::Empty | FilterState::Ref(_) => CombineMode::And,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FilterState::Empty => "EMPTY",
            FilterState::Standard { .. } => "STANDARD",
            FilterState::Anchored { .. } => "ANCHORED",
            FilterState::Composed { .. } => "COMPOSED",
            FilterState::Ref(_) => "REF",
        }
    }

    /// True when the state carries no constraints at all.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterState::Empty => true,
            FilterState::Standard { value, .. } => value.is_empty(),
            FilterState::Anchored { value, .. } => value.is_empty(),
            FilterState::Composed { value, .. } => value.is_empty(),
            FilterState::Ref(_) => false,
        }
    }

    pub fn from_json(value: &Value) -> Result<Self, FilterError> {
        match value {
            Value::Null => Ok(FilterState::Empty),
            Value::Object(obj) => Self::from_object(obj),
            other => Err(FilterError::InvalidFilterState(format!(
                "expected an object, got {other}"
            ))),
        }
    }

    pub fn from_json_str(input: &str) -> Result<Self, FilterError> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_json(&value)
    }

    fn from_object(obj: &Map<String, Value>) -> Result<Self, FilterError> {
        let combine_mode = decode::combine_mode("__combineMode", obj)?;

        match decode::tag(obj) {
            Some("STANDARD") => standard_from_object(obj, combine_mode),
            Some("ANCHORED") => anchored_from_object(obj, combine_mode),
            Some("COMPOSED") => composed_from_object(obj, combine_mode),
            Some("REF") => ref_from_object(obj),
            Some(other) => Err(FilterError::InvalidFilterState(format!(
                "unknown filter type '{other}'"
            ))),
            None => match obj.get("value") {
                None | Some(Value::Null) => {
                    if let Some(key) = obj.keys().find(|key| !decode::is_marker_key(key)) {
                        return Err(FilterError::InvalidFilterState(format!(
                            "unexpected key '{key}' outside of 'value'"
                        )));
                    }
                    Ok(FilterState::Empty)
                }
                Some(Value::Array(_)) => composed_from_object(obj, combine_mode),
                Some(Value::Object(inner)) if inner.get("id").is_some_and(Value::is_string) => {
                    ref_from_object(obj)
                }
                Some(Value::Object(_)) => standard_from_object(obj, combine_mode),
                Some(other) => Err(FilterError::InvalidFilterState(format!(
                    "'value' must be an object or an array, got {other}"
                ))),
            },
        }
    }

    /// Canonical tagged JSON shape; `Empty` becomes `null`.
    pub fn to_json(&self) -> Value {
        match self {
            FilterState::Empty => Value::Null,
            FilterState::Standard {
                combine_mode,
                value,
            } => {
                let value = value
                    .iter()
                    .map(|(key, filter)| (key.clone(), filter.to_json()))
                    .collect::<Map<_, _>>();
                tagged("STANDARD", *combine_mode, Value::Object(value))
            }
            FilterState::Anchored {
                combine_mode,
                value,
            } => {
                let value = value
                    .iter()
                    .map(|(key, filter)| (key.clone(), filter.to_json()))
                    .collect::<Map<_, _>>();
                tagged("ANCHORED", *combine_mode, Value::Object(value))
            }
            FilterState::Composed {
                combine_mode,
                ref_ids,
                value,
            } => {
                let mut out = tagged(
                    "COMPOSED",
                    *combine_mode,
                    Value::Array(value.iter().map(FilterState::to_json).collect()),
                );
                if let Value::Object(obj) = &mut out {
                    obj.insert("refIds".to_string(), json!(ref_ids));
                }
                out
            }
            FilterState::Ref(reference) => json!({
                "__type": "REF",
                "value": { "id": reference.id, "label": reference.label },
            }),
        }
    }
}

fn tagged(tag: &str, combine_mode: Option<CombineMode>, value: Value) -> Value {
    let mut out = Map::new();
    out.insert("__type".to_string(), json!(tag));
    if let Some(mode) = combine_mode {
        out.insert("__combineMode".to_string(), json!(mode.as_str()));
    }
    out.insert("value".to_string(), value);
    Value::Object(out)
}

fn value_object<'a>(
    obj: &'a Map<String, Value>,
    kind: &str,
) -> Result<Option<&'a Map<String, Value>>, FilterError> {
    match obj.get("value") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(inner)) => Ok(Some(inner)),
        Some(other) => Err(FilterError::InvalidFilterState(format!(
            "{kind} filter 'value' must be an object, got {other}"
        ))),
    }
}

fn standard_from_object(
    obj: &Map<String, Value>,
    mut combine_mode: Option<CombineMode>,
) -> Result<FilterState, FilterError> {
    let mut value = IndexMap::new();

    for (key, field_value) in value_object(obj, "standard")?.into_iter().flatten() {
        if decode::is_combine_mode_key(key) {
            if combine_mode.is_none() {
                combine_mode = Some(decode::parse_combine_mode(key, field_value)?);
            }
            continue;
        }
        value.insert(key.clone(), FieldFilter::from_json(key, field_value)?);
    }

    Ok(FilterState::Standard {
        combine_mode,
        value,
    })
}

fn anchored_from_object(
    obj: &Map<String, Value>,
    mut combine_mode: Option<CombineMode>,
) -> Result<FilterState, FilterError> {
    let mut value = IndexMap::new();

    for (key, anchored_value) in value_object(obj, "anchored")?.into_iter().flatten() {
        if decode::is_combine_mode_key(key) {
            if combine_mode.is_none() {
                combine_mode = Some(decode::parse_combine_mode(key, anchored_value)?);
            }
            continue;
        }
        value.insert(key.clone(), AnchoredFilter::from_json(key, anchored_value)?);
    }

    Ok(FilterState::Anchored {
        combine_mode,
        value,
    })
}

fn composed_from_object(
    obj: &Map<String, Value>,
    combine_mode: Option<CombineMode>,
) -> Result<FilterState, FilterError> {
    let value = match obj.get("value") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(members)) => members
            .iter()
            .map(FilterState::from_json)
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(FilterError::InvalidFilterState(format!(
                "composed filter 'value' must be an array, got {other}"
            )))
        }
    };

    let ref_ids = match obj.get("refIds") {
        None | Some(Value::Null) => Vec::new(),
        Some(ids) => serde_json::from_value::<Vec<String>>(ids.clone())?,
    };

    Ok(FilterState::Composed {
        combine_mode,
        ref_ids,
        value,
    })
}

fn ref_from_object(obj: &Map<String, Value>) -> Result<FilterState, FilterError> {
    let inner = obj.get("value").cloned().unwrap_or(Value::Null);
    let reference = serde_json::from_value::<FilterRef>(inner).map_err(|err| {
        FilterError::InvalidFilterState(format!("invalid filter-set reference: {err}"))
    })?;
    Ok(FilterState::Ref(reference))
}

impl Serialize for FilterState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FilterState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        FilterState::from_json(&value).map_err(D::Error::custom)
    }
}
