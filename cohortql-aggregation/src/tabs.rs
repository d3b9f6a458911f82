use serde::{Deserialize, Serialize};

/// A titled group of filterable fields as shown in the portal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterTab {
    pub title: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl FilterTab {
    pub fn new<I, S>(title: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// Which field anchors nested records, its selectable values, and the tab
/// titles the anchor applies to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorConfig {
    pub field: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub tabs: Vec<String>,
}

impl AnchorConfig {
    pub fn applies_to(&self, tab: &FilterTab) -> bool {
        self.tabs.iter().any(|title| title == &tab.title)
    }
}
