use std::fs;
use std::path::PathBuf;

use clap::Parser;
use cohortql_cli::{run, Cli};
use serde_json::{json, Value};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, value: Value) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, value.to_string()).expect("fixture should be writable");
    path
}

fn run_args(args: &[&str]) -> anyhow::Result<Value> {
    let cli = Cli::try_parse_from(std::iter::once("cohortql").chain(args.iter().copied()))
        .expect("arguments should parse");
    let output = run(&cli)?;
    Ok(serde_json::from_str(&output).expect("output should be JSON"))
}

fn fixtures() -> (TempDir, PathBuf, PathBuf) {
    let dir = TempDir::new().expect("temp dir should be created");
    let workspace = write(
        &dir,
        "workspace.json",
        json!({
            "base": { "name": "Base", "filter": { "value": { "a": { "selectedValues": ["x"] } } } },
        }),
    );
    let filter = write(
        &dir,
        "filter.json",
        json!({
            "__type": "COMPOSED",
            "__combineMode": "OR",
            "value": [
                { "__type": "REF", "value": { "id": "base", "label": "Base" } },
                { "value": { "b": { "lowerBound": 1, "upperBound": 5 } } },
            ],
        }),
    );
    (dir, filter, workspace)
}

#[test]
fn compile_resolves_references_with_workspace() {
    let (_dir, filter, workspace) = fixtures();

    let out = run_args(&[
        "compile",
        "--filter",
        filter.to_str().expect("utf-8 path"),
        "--workspace",
        workspace.to_str().expect("utf-8 path"),
    ])
    .expect("compile should succeed");

    assert_eq!(
        out,
        json!({ "OR": [
            { "AND": [{ "CONTAINS_ANY": { "a": ["x"] } }] },
            { "AND": [{ "AND": [{ "GTE": { "b": 1 } }, { "LTE": { "b": 5 } }] }] },
        ] })
    );
}

#[test]
fn compile_without_workspace_rejects_references() {
    let (_dir, filter, _workspace) = fixtures();

    let err = run_args(&["compile", "--filter", filter.to_str().expect("utf-8 path")])
        .expect_err("unresolved reference should fail");

    assert!(err.to_string().contains("base"), "error: {err}");
}

#[test]
fn compile_prints_null_for_empty_filter() {
    let dir = TempDir::new().expect("temp dir should be created");
    let filter = write(&dir, "empty.json", json!({ "value": {} }));

    let out = run_args(&["compile", "-f", filter.to_str().expect("utf-8 path")])
        .expect("compile should succeed");

    assert_eq!(out, Value::Null);
}

#[test]
fn resolve_prints_inlined_state() {
    let (_dir, filter, workspace) = fixtures();

    let out = run_args(&[
        "resolve",
        "-f",
        filter.to_str().expect("utf-8 path"),
        "-w",
        workspace.to_str().expect("utf-8 path"),
    ])
    .expect("resolve should succeed");

    assert_eq!(out["__type"], json!("COMPOSED"));
    assert_eq!(out["value"][0]["__type"], json!("STANDARD"));
    assert_eq!(out["value"][0]["value"]["a"]["selectedValues"], json!(["x"]));
}

#[test]
fn max_depth_flag_limits_resolution() {
    let (_dir, filter, workspace) = fixtures();

    let err = run_args(&[
        "resolve",
        "-f",
        filter.to_str().expect("utf-8 path"),
        "-w",
        workspace.to_str().expect("utf-8 path"),
        "--max-depth",
        "0",
    ])
    .expect_err("depth zero forbids references");

    assert!(format!("{err:#}").contains("depth"), "error: {err:#}");
}

#[test]
fn query_info_applies_anchor() {
    let dir = TempDir::new().expect("temp dir should be created");
    let tabs = write(
        &dir,
        "tabs.json",
        json!([{ "title": "Disease", "fields": ["stage", "tumor.site"] }]),
    );
    let anchor = write(
        &dir,
        "anchor.json",
        json!({ "field": "disease_phase", "options": ["Relapse"], "tabs": ["Disease"] }),
    );

    let out = run_args(&[
        "query-info",
        "--tabs",
        tabs.to_str().expect("utf-8 path"),
        "--anchor-config",
        anchor.to_str().expect("utf-8 path"),
        "--anchor-value",
        "Relapse",
    ])
    .expect("query-info should succeed");

    assert_eq!(
        out,
        json!({
            "fieldsByGroup": { "main": ["stage"], "tumor": ["tumor.site"] },
            "gqlFilterByGroup": {
                "filter_main": null,
                "filter_tumor": { "AND": [{ "nested": { "path": "tumor", "AND": [
                    { "CONTAINS_ANY": { "disease_phase": ["Relapse"] } },
                ] } }] },
            },
        })
    );
}
