use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub const ENV_LOG: &str = "COHORTQL_LOG";
pub const ENV_MAX_DEPTH: &str = "COHORTQL_MAX_DEPTH";

#[derive(Debug, Parser)]
#[command(name = "cohortql")]
#[command(version, about = "Compile cohort filter states into GraphQL filters", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log filter directive, e.g. `info` or `cohortql_gql=trace`
    #[arg(long, global = true, env = ENV_LOG, default_value = "warn")]
    pub log_level: String,

    /// Maximum nesting of filter-set references
    #[arg(long, global = true, env = ENV_MAX_DEPTH)]
    pub max_depth: Option<usize>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile a filter state; prints `null` for an empty filter
    Compile {
        /// Filter state JSON file
        #[arg(long, short = 'f')]
        filter: PathBuf,

        /// Workspace JSON file used to inline filter-set references
        #[arg(long, short = 'w')]
        workspace: Option<PathBuf>,
    },
    /// Inline every filter-set reference and print the resulting filter state
    Resolve {
        #[arg(long, short = 'f')]
        filter: PathBuf,

        #[arg(long, short = 'w')]
        workspace: PathBuf,
    },
    /// Plan per-group aggregation requests for a set of filter tabs
    QueryInfo {
        /// Filter tabs JSON file: `[{"title": .., "fields": [..]}]`
        #[arg(long, short = 't')]
        tabs: PathBuf,

        /// Anchor configuration JSON file: `{"field": .., "options": [..], "tabs": [..]}`
        #[arg(long)]
        anchor_config: Option<PathBuf>,

        /// Selected anchor value
        #[arg(long)]
        anchor_value: Option<String>,

        #[arg(long, short = 'f')]
        filter: Option<PathBuf>,

        #[arg(long, short = 'w')]
        workspace: Option<PathBuf>,
    },
}
