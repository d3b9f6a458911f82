use cohortql_core::{
    AnchoredFilter, CombineMode, FieldFilter, FilterError, FilterState, GqlFilter, Value,
    Workspace,
};
use indexmap::IndexMap;

use crate::clause::build_clauses;
use crate::grouper::{group_fields, parent_path};
use crate::resolver::dereference;

/// Compiles a filter state into the backend filter expression.
///
/// Returns `Ok(None)` for an absent or empty filter. Any `Ref` must already
/// be inlined with [`dereference`].
pub fn get_gql_filter(state: &FilterState) -> Result<Option<GqlFilter>, FilterError> {
    tracing::debug!(kind = state.kind(), "compiling filter state");
    compile_state(state)
}

/// Decodes, compiles and serializes in one step for JSON-only callers.
pub fn get_gql_filter_json(state: &Value) -> Result<Option<Value>, FilterError> {
    let state = FilterState::from_json(state)?;
    get_gql_filter(&state)?
        .map(|filter| filter.to_json())
        .transpose()
}

pub fn resolve_and_compile(
    state: &FilterState,
    workspace: &Workspace,
) -> Result<Option<GqlFilter>, FilterError> {
    let state = dereference(state, workspace)?;
    get_gql_filter(&state)
}

fn compile_state(state: &FilterState) -> Result<Option<GqlFilter>, FilterError> {
    if state.is_empty() {
        return Ok(None);
    }

    let mode = state.combine_mode();
    match state {
        FilterState::Empty => Ok(None),
        FilterState::Standard { value, .. } => {
            let entries = value
                .iter()
                .map(|(key, filter)| (key.as_str(), filter))
                .collect::<Vec<_>>();
            Ok(Some(GqlFilter::group(mode, compile_fields(&entries, mode)?)))
        }
        FilterState::Anchored { value, .. } => {
            // each anchor key keeps its own node per path, even when paths repeat
            let mut clauses = Vec::new();
            for anchored in value.values() {
                for (path, clause) in compile_anchored(anchored)? {
                    clauses.push(GqlFilter::nested(path, mode, vec![clause]));
                }
            }
            Ok(Some(GqlFilter::group(mode, clauses)))
        }
        FilterState::Composed { value, .. } => {
            let members = value
                .iter()
                .map(|member| {
                    // An empty member matches everything.
                    Ok(compile_state(member)?.unwrap_or_else(|| GqlFilter::and(Vec::new())))
                })
                .collect::<Result<Vec<_>, FilterError>>()?;
            Ok(Some(GqlFilter::group(mode, members)))
        }
        FilterState::Ref(reference) => Err(FilterError::UnresolvedReference {
            id: reference.id.clone(),
        }),
    }
}

/// Main-field clauses followed by one `nested` node per parent path.
#[derive(Default)]
struct ClauseList {
    main: Vec<GqlFilter>,
    nested: IndexMap<String, Vec<GqlFilter>>,
}

impl ClauseList {
    fn reserve(&mut self, path: &str) {
        if !self.nested.contains_key(path) {
            self.nested.insert(path.to_string(), Vec::new());
        }
    }

    fn push_nested(&mut self, path: String, clause: GqlFilter) {
        self.nested.entry(path).or_default().push(clause);
    }

    fn extend_nested(&mut self, path: &str, clauses: Vec<GqlFilter>) {
        self.reserve(path);
        if let Some(existing) = self.nested.get_mut(path) {
            existing.extend(clauses);
        }
    }

    fn finish(self, mode: CombineMode) -> Vec<GqlFilter> {
        let mut out = self.main;
        out.extend(
            self.nested
                .into_iter()
                .map(|(path, clauses)| GqlFilter::nested(path, mode, clauses)),
        );
        out
    }
}

fn compile_fields(
    entries: &[(&str, &FieldFilter)],
    mode: CombineMode,
) -> Result<Vec<GqlFilter>, FilterError> {
    let mut clauses = ClauseList::default();

    // nested nodes follow the first occurrence of their path, whether it came
    // from a dotted key or from inside an anchored entry
    for (key, filter) in entries {
        match filter {
            FieldFilter::Anchored(anchored) => {
                for path in anchored.value.keys().filter_map(|key| parent_path(key)) {
                    clauses.reserve(path);
                }
            }
            _ => {
                if let Some(path) = parent_path(key) {
                    clauses.reserve(path);
                }
            }
        }
    }

    let groups = group_fields(
        entries
            .iter()
            .filter(|(_, filter)| !matches!(filter, FieldFilter::Anchored(_)))
            .copied(),
    );

    for (field, filter) in groups.main {
        clauses.main.extend(build_clauses(field, filter)?);
    }

    for (path, members) in groups.nested {
        tracing::trace!(path, members = members.len(), "compiling nested group");
        clauses.extend_nested(path, compile_fields(&members, mode)?);
    }

    for (_, filter) in entries {
        if let FieldFilter::Anchored(anchored) = filter {
            for (path, clause) in compile_anchored(anchored)? {
                clauses.push_nested(path, clause);
            }
        }
    }

    Ok(clauses.finish(mode))
}

/// One `AND[anchor, group]` clause per nested path of the anchored filter,
/// paired with the path it belongs under.
fn compile_anchored(anchored: &AnchoredFilter) -> Result<Vec<(String, GqlFilter)>, FilterError> {
    let inner = anchored.combine_mode.unwrap_or_default();
    let groups = group_fields(
        anchored
            .value
            .iter()
            .map(|(key, filter)| (key.as_str(), filter)),
    );

    if !groups.main.is_empty() {
        let fields = groups
            .main
            .iter()
            .map(|(field, _)| *field)
            .collect::<Vec<_>>();
        tracing::warn!(
            anchor = %anchored.key(),
            ?fields,
            "anchored filter fields outside a nested path are ignored"
        );
    }

    let anchor = GqlFilter::contains_any(
        anchored.anchor_field.as_str(),
        [anchored.anchor_value.as_str()],
    );

    let mut out = Vec::with_capacity(groups.nested.len());
    for (path, members) in groups.nested {
        let clauses = compile_fields(&members, inner)?;
        out.push((
            path.to_string(),
            GqlFilter::and(vec![anchor.clone(), GqlFilter::group(inner, clauses)]),
        ));
    }

    Ok(out)
}
