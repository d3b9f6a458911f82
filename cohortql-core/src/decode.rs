use serde_json::{Map, Value};

use crate::{CombineMode, FilterError};

pub(crate) const TYPE_KEYS: [&str; 2] = ["__type", "type"];
pub(crate) const COMBINE_MODE_KEYS: [&str; 2] = ["__combineMode", "combineMode"];

pub(crate) fn tag(obj: &Map<String, Value>) -> Option<&str> {
    TYPE_KEYS
        .iter()
        .find_map(|key| obj.get(*key))
        .and_then(Value::as_str)
}

pub(crate) fn is_combine_mode_key(key: &str) -> bool {
    COMBINE_MODE_KEYS.contains(&key)
}

pub(crate) fn is_marker_key(key: &str) -> bool {
    TYPE_KEYS.contains(&key) || is_combine_mode_key(key)
}

/// Reads `__combineMode`/`combineMode` from `obj`. `key` names the owner in
/// the error when the mode is not `AND`/`OR`.
pub(crate) fn combine_mode(
    key: &str,
    obj: &Map<String, Value>,
) -> Result<Option<CombineMode>, FilterError> {
    match COMBINE_MODE_KEYS.iter().find_map(|name| obj.get(*name)) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => parse_combine_mode(key, value).map(Some),
    }
}

pub(crate) fn parse_combine_mode(key: &str, value: &Value) -> Result<CombineMode, FilterError> {
    value
        .as_str()
        .and_then(CombineMode::parse)
        .ok_or_else(|| FilterError::invalid_value(key, value))
}
