use cohortql_core::{CombineMode, GqlFilter};
use cohortql_gql::grouper::group_fields;
use indexmap::IndexMap;
use serde::Serialize;

use crate::{AnchorConfig, FilterTab};

pub const MAIN_GROUP: &str = "main";

pub fn filter_key(group: &str) -> String {
    format!("filter_{group}")
}

#[derive(Clone, Copy, Debug)]
pub struct QueryInfoArgs<'a> {
    pub filter_tabs: &'a [FilterTab],
    pub anchor_config: Option<&'a AnchorConfig>,
    pub anchor_value: Option<&'a str>,
    pub gql_filter: Option<&'a GqlFilter>,
}

impl<'a> QueryInfoArgs<'a> {
    pub fn new(filter_tabs: &'a [FilterTab]) -> Self {
        Self {
            filter_tabs,
            anchor_config: None,
            anchor_value: None,
            gql_filter: None,
        }
    }

    pub fn anchor(mut self, config: &'a AnchorConfig, value: &'a str) -> Self {
        self.anchor_config = Some(config);
        self.anchor_value = Some(value);
        self
    }

    pub fn gql_filter(mut self, filter: Option<&'a GqlFilter>) -> Self {
        self.gql_filter = filter;
        self
    }

    fn active_anchor(&self) -> Option<(&'a AnchorConfig, &'a str)> {
        match (self.anchor_config, self.anchor_value) {
            (Some(config), Some(value)) if !value.is_empty() => Some((config, value)),
            _ => None,
        }
    }
}

/// Fields to request and filter to apply, per aggregation group.
///
/// `main` is always the first group. Filters are keyed `filter_<group>`;
/// a missing filter serializes as `null`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryInfo {
    pub fields_by_group: IndexMap<String, Vec<String>>,
    pub gql_filter_by_group: IndexMap<String, Option<GqlFilter>>,
}

pub fn build_query_info(args: &QueryInfoArgs<'_>) -> QueryInfo {
    let anchor = args.active_anchor();
    tracing::debug!(
        tabs = args.filter_tabs.len(),
        anchored = anchor.is_some(),
        has_filter = args.gql_filter.is_some(),
        "building aggregation query info"
    );

    let mut fields_by_group = IndexMap::new();
    fields_by_group.insert(MAIN_GROUP.to_string(), Vec::new());

    for tab in args.filter_tabs {
        match anchor {
            Some((config, _)) if config.applies_to(tab) => {
                let groups = group_fields(
                    tab.fields
                        .iter()
                        .map(|field| (field.as_str(), field.as_str())),
                );
                for (_, field) in groups.main {
                    push_field(&mut fields_by_group, MAIN_GROUP, field);
                }
                for (path, members) in groups.nested {
                    if path == MAIN_GROUP {
                        tracing::warn!(
                            tab = %tab.title,
                            fields = members.len(),
                            "path group 'main' collides with the main group; fields stay unanchored"
                        );
                    }
                    for (_, field) in members {
                        push_field(&mut fields_by_group, path, field);
                    }
                }
            }
            _ => {
                for field in &tab.fields {
                    push_field(&mut fields_by_group, MAIN_GROUP, field);
                }
            }
        }
    }

    let mut gql_filter_by_group = IndexMap::with_capacity(fields_by_group.len());
    gql_filter_by_group.insert(filter_key(MAIN_GROUP), args.gql_filter.cloned());

    if let Some((config, value)) = anchor {
        for path in fields_by_group.keys().filter(|group| *group != MAIN_GROUP) {
            let filter = anchored_group_filter(args.gql_filter, path, &config.field, value);
            gql_filter_by_group.insert(filter_key(path), Some(filter));
        }
    }

    QueryInfo {
        fields_by_group,
        gql_filter_by_group,
    }
}

fn push_field(groups: &mut IndexMap<String, Vec<String>>, group: &str, field: &str) {
    match groups.get_mut(group) {
        Some(fields) => fields.push(field.to_string()),
        None => {
            groups.insert(group.to_string(), vec![field.to_string()]);
        }
    }
}

/// The caller's filter, restricted so that records under `path` only count
/// when they carry the anchor value.
fn anchored_group_filter(
    gql_filter: Option<&GqlFilter>,
    path: &str,
    anchor_field: &str,
    anchor_value: &str,
) -> GqlFilter {
    let anchor = GqlFilter::contains_any(anchor_field, [anchor_value]);

    let mut clauses = match gql_filter {
        Some(GqlFilter::Group {
            mode: CombineMode::And,
            clauses,
        }) => clauses.clone(),
        Some(other) => vec![other.clone()],
        None => Vec::new(),
    };

    match clauses
        .iter()
        .position(|clause| clause.nested_path() == Some(path))
    {
        Some(idx) => merge_anchor(&mut clauses[idx], anchor),
        None => clauses.push(GqlFilter::nested(path, CombineMode::And, vec![anchor])),
    }

    GqlFilter::and(clauses)
}

fn merge_anchor(node: &mut GqlFilter, anchor: GqlFilter) {
    if let GqlFilter::Nested { mode, clauses, .. } = node {
        if *mode == CombineMode::Or {
            let existing = std::mem::take(clauses);
            clauses.push(GqlFilter::group(CombineMode::Or, existing));
            *mode = CombineMode::And;
        }
        clauses.push(anchor);
    }
}
