use cohortql_core::{CombineMode, FilterMode, GqlFilter};
use serde_json::json;

#[test]
fn serializes_wire_shapes() {
    let filter = GqlFilter::or(vec![
        GqlFilter::contains_any("a", ["foo", "bar"]),
        GqlFilter::values(FilterMode::ExcludesAll, "b", ["baz"]),
        GqlFilter::and(vec![GqlFilter::gte("age", 0), GqlFilter::lte("age", 18)]),
        GqlFilter::nested(
            "tumor",
            CombineMode::And,
            vec![GqlFilter::contains_any("site", ["Bone"])],
        ),
    ]);

    assert_eq!(
        filter.to_json().expect("compiled filter should serialize"),
        json!({
            "OR": [
                { "CONTAINS_ANY": { "a": ["foo", "bar"] } },
                { "EXCLUDES_ALL": { "b": ["baz"] } },
                { "AND": [{ "GTE": { "age": 0 } }, { "LTE": { "age": 18 } }] },
                { "nested": { "path": "tumor", "AND": [{ "CONTAINS_ANY": { "site": ["Bone"] } }] } },
            ]
        })
    );
}

#[test]
fn nested_body_keeps_path_first() {
    let filter = GqlFilter::nested("p", CombineMode::Or, Vec::new());
    let text = serde_json::to_string(&filter).expect("filter should serialize");
    assert_eq!(text, r#"{"nested":{"path":"p","OR":[]}}"#);
}

#[test]
fn nested_path_accessor() {
    assert_eq!(
        GqlFilter::nested("p", CombineMode::And, Vec::new()).nested_path(),
        Some("p")
    );
    assert_eq!(GqlFilter::and(Vec::new()).nested_path(), None);
}
