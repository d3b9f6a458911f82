//! Library half of the `cohortql` binary so commands can be driven from tests.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Command};
pub use commands::run;
