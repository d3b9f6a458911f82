use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cohortql_aggregation::{build_query_info, AnchorConfig, FilterTab, QueryInfoArgs};
use cohortql_core::{FilterState, Workspace};
use cohortql_gql::{dereference_with_config, get_gql_filter, ResolverConfig, ResolverOptions};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Cli, Command};

/// Runs one command and returns the JSON text to print.
pub fn run(cli: &Cli) -> Result<String> {
    let config = ResolverConfig::default().merge(&ResolverOptions {
        max_depth: cli.max_depth,
    });

    let output = match &cli.command {
        Command::Compile { filter, workspace } => {
            tracing::info!(filter = %filter.display(), "compiling filter state");
            let state = load_state(filter, workspace.as_deref(), &config)?;
            serde_json::to_value(get_gql_filter(&state)?)?
        }
        Command::Resolve { filter, workspace } => {
            tracing::info!(filter = %filter.display(), "resolving filter-set references");
            load_state(filter, Some(workspace.as_path()), &config)?.to_json()
        }
        Command::QueryInfo {
            tabs,
            anchor_config,
            anchor_value,
            filter,
            workspace,
        } => {
            let tabs: Vec<FilterTab> = read_json(tabs)?;
            let anchor_config: Option<AnchorConfig> =
                anchor_config.as_deref().map(read_json::<AnchorConfig>).transpose()?;
            let gql_filter = match filter {
                Some(path) => get_gql_filter(&load_state(path, workspace.as_deref(), &config)?)?,
                None => None,
            };
            tracing::info!(
                tabs = tabs.len(),
                anchored = anchor_config.is_some(),
                "planning aggregation queries"
            );

            let mut args = QueryInfoArgs::new(&tabs).gql_filter(gql_filter.as_ref());
            if let (Some(anchor), Some(value)) = (anchor_config.as_ref(), anchor_value.as_deref()) {
                args = args.anchor(anchor, value);
            }
            serde_json::to_value(build_query_info(&args))?
        }
    };

    render(&output, cli.pretty)
}

fn load_state(
    filter: &Path,
    workspace: Option<&Path>,
    config: &ResolverConfig,
) -> Result<FilterState> {
    let state: FilterState = read_json(filter)?;
    match workspace {
        Some(path) => {
            let workspace: Workspace = read_json(path)?;
            dereference_with_config(&state, &workspace, config)
                .with_context(|| format!("failed to resolve references in {}", filter.display()))
        }
        None => Ok(state),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn render(value: &Value, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}
