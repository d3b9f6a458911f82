use cohortql_core::{FilterError, FilterState, Workspace};

use crate::ResolverConfig;

/// Inlines every filter-set reference in `state` using one workspace
/// snapshot. The workspace is only read.
pub fn dereference(state: &FilterState, workspace: &Workspace) -> Result<FilterState, FilterError> {
    dereference_with_config(state, workspace, &ResolverConfig::default())
}

pub fn dereference_with_config(
    state: &FilterState,
    workspace: &Workspace,
    config: &ResolverConfig,
) -> Result<FilterState, FilterError> {
    tracing::debug!(
        kind = state.kind(),
        filter_sets = workspace.len(),
        max_depth = ?config.max_depth,
        "dereferencing filter state"
    );

    Resolver {
        workspace,
        config,
        stack: Vec::new(),
    }
    .resolve(state)
}

struct Resolver<'a> {
    workspace: &'a Workspace,
    config: &'a ResolverConfig,
    /// Ids currently being inlined, outermost first.
    stack: Vec<String>,
}

impl Resolver<'_> {
    fn resolve(&mut self, state: &FilterState) -> Result<FilterState, FilterError> {
        match state {
            FilterState::Empty | FilterState::Standard { .. } | FilterState::Anchored { .. } => {
                Ok(state.clone())
            }
            FilterState::Composed {
                combine_mode,
                ref_ids,
                value,
            } => {
                let value = value
                    .iter()
                    .map(|member| self.resolve(member))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(FilterState::Composed {
                    combine_mode: *combine_mode,
                    ref_ids: ref_ids.clone(),
                    value,
                })
            }
            FilterState::Ref(reference) => self.resolve_ref(&reference.id),
        }
    }

    fn resolve_ref(&mut self, id: &str) -> Result<FilterState, FilterError> {
        if self.stack.iter().any(|active| active == id) {
            let mut chain = self.stack.clone();
            chain.push(id.to_string());
            return Err(FilterError::CyclicReference {
                id: id.to_string(),
                chain,
            });
        }

        if let Some(max) = self.config.max_depth {
            if self.stack.len() >= max {
                return Err(FilterError::MaxDepthExceeded {
                    max,
                    reached: self.stack.len() + 1,
                });
            }
        }

        let filter_set =
            self.workspace
                .get(id)
                .ok_or_else(|| FilterError::UnknownFilterSet { id: id.to_string() })?;

        tracing::trace!(id, depth = self.stack.len(), "inlining filter-set reference");
        self.stack.push(id.to_string());
        let resolved = self.resolve(&filter_set.filter);
        self.stack.pop();
        resolved
    }
}
