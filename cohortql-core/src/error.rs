use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid filter value for key '{key}': {value}")]
    InvalidFilterValue { key: String, value: String },
    #[error("invalid filter state: {0}")]
    InvalidFilterState(String),
    #[error("filter-set '{id}' is not present in the workspace")]
    UnknownFilterSet { id: String },
    #[error("cyclic filter-set reference: {}", chain.join(" -> "))]
    CyclicReference { id: String, chain: Vec<String> },
    #[error("reference depth exceeded: reached {reached}, limit {max}")]
    MaxDepthExceeded { max: usize, reached: usize },
    #[error("filter-set reference '{id}' must be dereferenced before compiling")]
    UnresolvedReference { id: String },
    #[error("serialization/deserialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl FilterError {
    pub fn invalid_value(key: &str, value: &serde_json::Value) -> Self {
        FilterError::InvalidFilterValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}
