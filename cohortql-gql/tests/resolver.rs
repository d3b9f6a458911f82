use cohortql_core::{
    CombineMode, FieldFilter, FilterError, FilterSet, FilterState, OptionFilter, Workspace,
};
use cohortql_gql::{
    dereference, dereference_with_config, get_gql_filter, resolve_and_compile, ResolverConfig,
    ResolverOptions,
};
use serde_json::json;

fn option(field: &str, value: &str) -> FilterState {
    FilterState::standard([(field, FieldFilter::Option(OptionFilter::new([value])))])
}

fn workspace() -> Workspace {
    Workspace::new()
        .with("base", FilterSet::new("Base", option("a", "x")))
        .with(
            "combo",
            FilterSet::new(
                "Combo",
                FilterState::composed(
                    CombineMode::Or,
                    vec![FilterState::reference("base", "Base"), option("b", "y")],
                ),
            ),
        )
}

#[test]
fn standard_and_empty_states_are_returned_unchanged() {
    let workspace = workspace();

    for state in [FilterState::Empty, option("a", "x")] {
        let out = dereference(&state, &workspace).expect("plain state should resolve");
        assert_eq!(out, state);
    }
}

#[test]
fn substitutes_references_recursively() {
    let state = FilterState::composed(
        CombineMode::And,
        vec![
            FilterState::reference("combo", "Combo"),
            FilterState::reference("base", "Base"),
        ],
    );

    let out = dereference(&state, &workspace()).expect("references should resolve");

    assert_eq!(
        out,
        FilterState::composed(
            CombineMode::And,
            vec![
                FilterState::composed(CombineMode::Or, vec![option("a", "x"), option("b", "y")]),
                option("a", "x"),
            ],
        )
    );
}

#[test]
fn resolved_state_compiles_to_combined_filter() {
    let state = FilterState::composed(
        CombineMode::And,
        vec![FilterState::reference("combo", "Combo"), option("c", "z")],
    );

    let out = resolve_and_compile(&state, &workspace())
        .expect("state should resolve and compile")
        .expect("state should not be empty");

    assert_eq!(
        out.to_json().expect("compiled filter should serialize"),
        json!({ "AND": [
            { "OR": [
                { "AND": [{ "CONTAINS_ANY": { "a": ["x"] } }] },
                { "AND": [{ "CONTAINS_ANY": { "b": ["y"] } }] },
            ] },
            { "AND": [{ "CONTAINS_ANY": { "c": ["z"] } }] },
        ] })
    );
}

#[test]
fn compiling_a_dereferenced_state_is_deterministic() {
    let state = FilterState::composed(
        CombineMode::Or,
        vec![
            FilterState::reference("combo", "Combo"),
            FilterState::reference("base", "Base"),
        ],
    );
    let workspace = workspace();

    let first = get_gql_filter(&dereference(&state, &workspace).expect("first resolve"))
        .expect("first compile");
    let second = get_gql_filter(&dereference(&state, &workspace).expect("second resolve"))
        .expect("second compile");

    assert_eq!(
        serde_json::to_string(&first).expect("first serialize"),
        serde_json::to_string(&second).expect("second serialize")
    );
}

#[test]
fn unknown_reference_fails() {
    let state = FilterState::composed(CombineMode::And, vec![FilterState::reference("nope", "")]);

    let err = dereference(&state, &workspace()).expect_err("unknown id should fail");

    assert!(matches!(err, FilterError::UnknownFilterSet { ref id } if id == "nope"));
}

#[test]
fn detects_cyclic_references() {
    let workspace = Workspace::new()
        .with(
            "a",
            FilterSet::new(
                "A",
                FilterState::composed(CombineMode::And, vec![FilterState::reference("b", "B")]),
            ),
        )
        .with(
            "b",
            FilterSet::new(
                "B",
                FilterState::composed(CombineMode::And, vec![FilterState::reference("a", "A")]),
            ),
        );

    let err = dereference(&FilterState::reference("a", "A"), &workspace)
        .expect_err("cycle should fail");

    match err {
        FilterError::CyclicReference { id, chain } => {
            assert_eq!(id, "a");
            assert_eq!(chain, vec!["a", "b", "a"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn detects_self_reference() {
    let workspace = Workspace::new().with(
        "self",
        FilterSet::new(
            "Self",
            FilterState::composed(
                CombineMode::Or,
                vec![option("a", "x"), FilterState::reference("self", "Self")],
            ),
        ),
    );

    let err = dereference(&FilterState::reference("self", "Self"), &workspace)
        .expect_err("self reference should fail");

    assert!(matches!(err, FilterError::CyclicReference { ref id, .. } if id == "self"));
    assert!(err.to_string().contains("self -> self"));
}

#[test]
fn repeated_reference_without_cycle_is_allowed() {
    let state = FilterState::composed(
        CombineMode::Or,
        vec![
            FilterState::reference("base", "Base"),
            FilterState::reference("base", "Base"),
        ],
    );

    let out = dereference(&state, &workspace()).expect("diamond references should resolve");

    assert_eq!(
        out,
        FilterState::composed(CombineMode::Or, vec![option("a", "x"), option("a", "x")])
    );
}

#[test]
fn depth_limit_is_configurable() {
    let state = FilterState::composed(CombineMode::And, vec![FilterState::reference("combo", "")]);
    let config = ResolverConfig::default().merge(&ResolverOptions { max_depth: Some(1) });

    let err = dereference_with_config(&state, &workspace(), &config)
        .expect_err("two levels of references exceed a limit of one");

    assert!(matches!(
        err,
        FilterError::MaxDepthExceeded { max: 1, reached: 2 }
    ));

    let relaxed = ResolverConfig { max_depth: None };
    dereference_with_config(&state, &workspace(), &relaxed).expect("unlimited depth resolves");
}
