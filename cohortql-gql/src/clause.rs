use cohortql_core::{CombineMode, FieldFilter, FilterError, FilterMode, GqlFilter, OptionFilter};

/// Builds the primitive clauses for one field.
///
/// Returns an empty list for a combine-mode-only option placeholder. An empty
/// `selectedValues` list still yields its tag clause, so it matches nothing
/// rather than everything. An `AND`-combined `CONTAINS_ANY` option and a
/// range each come back as a single `AND` group.
pub fn build_clauses(field: &str, filter: &FieldFilter) -> Result<Vec<GqlFilter>, FilterError> {
    match filter {
        FieldFilter::Option(option) => Ok(option_clauses(field, option)),
        FieldFilter::Range(range) => Ok(vec![GqlFilter::and(vec![
            GqlFilter::gte(field, range.lower_bound.clone()),
            GqlFilter::lte(field, range.upper_bound.clone()),
        ])]),
        FieldFilter::Anchored(_) => Err(FilterError::InvalidFilterValue {
            key: field.to_string(),
            value: filter.to_json().to_string(),
        }),
    }
}

fn option_clauses(field: &str, option: &OptionFilter) -> Vec<GqlFilter> {
    if option.is_placeholder() {
        return Vec::new();
    }

    match (option.filter_mode, option.combine_mode.unwrap_or(CombineMode::Or)) {
        (FilterMode::ContainsAny, CombineMode::And) if !option.values().is_empty() => {
            vec![GqlFilter::and(
                option
                    .values()
                    .iter()
                    .map(|value| GqlFilter::contains_any(field, [value.as_str()]))
                    .collect(),
            )]
        }
        (mode, _) => vec![GqlFilter::values(
            mode,
            field,
            option.values().iter().map(String::as_str),
        )],
    }
}
