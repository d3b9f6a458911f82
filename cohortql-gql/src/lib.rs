//! Filter-state to GraphQL filter compiler.
//!
//! This crate has no UI or transport dependencies so it can be used from
//! export jobs as well as from the portal.

pub mod clause;
mod compiler;
mod config;
pub mod grouper;
mod resolver;

pub use compiler::{get_gql_filter, get_gql_filter_json, resolve_and_compile};
pub use config::{ResolverConfig, ResolverOptions};
pub use resolver::{dereference, dereference_with_config};
